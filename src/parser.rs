/*
    ALICE-SWIFT
    Copyright (C) 2026 Moroya Sakamoto
*/

//! SWIFT FIN message parser.
//!
//! Parses the text of a single FIN message into a [`SwiftMessage`].
//!
//! ## Parsing Rules
//!
//! 1. A message is a run of `{name:content}` blocks; whitespace between
//!    blocks is ignored.
//! 2. Blocks 1 and 2 are fixed-layout headers ([`Block1`], [`Block2`]).
//! 3. Blocks 3 and 5 and user blocks (`{S:...}`) are `{name:value}` lists.
//! 4. Block 4 is normally the text form: lines starting with `:NN[A]:`
//!    open a tag, any other line continues the previous tag's value, and the
//!    block ends with a line holding `-}`. System messages (ACK/NAK) carry
//!    block 4 as a `{name:value}` list instead.
//! 5. A second block 1 starts another message (e.g. the original message
//!    appended to an ACK); everything from there on is kept verbatim in
//!    [`SwiftMessage::unparsed_texts`].
//!
//! Blocks are located by brace depth, so the parser never splits on a `}`
//! nested inside a tag list.

use thiserror::Error;
use tracing::{debug, warn};

use crate::block::{Block1, Block2, TagList, UserBlock};
use crate::config::ParserConfig;
use crate::message::SwiftMessage;
use crate::tag::{is_valid_field_name, Tag};

/// Errors that can occur while parsing a FIN message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input is empty or whitespace only.
    #[error("empty input")]
    EmptyInput,
    /// The input exceeds [`ParserConfig::max_message_len`].
    #[error("message of {actual} bytes exceeds the limit of {max} bytes")]
    TooLarge { max: usize, actual: usize },
    /// Text outside of any block.
    #[error("unexpected text outside blocks at offset {0}")]
    StrayText(usize),
    /// A block has no `:` after its identifier.
    #[error("block at offset {0} has no identifier")]
    MissingBlockName(usize),
    /// The closing brace of a block was not found.
    #[error("block {name} starting at offset {offset} is not terminated")]
    UnterminatedBlock { name: String, offset: usize },
    /// Block 4 text form without its `-}` terminator.
    #[error("text block is not terminated by \"-}}\"")]
    UnterminatedTextBlock,
    /// The same standard block appears twice.
    #[error("duplicate block {0}")]
    DuplicateBlock(String),
    /// The basic header block has an invalid layout.
    #[error("invalid basic header block: {0:?}")]
    InvalidBlock1(String),
    /// The application header block has an invalid layout.
    #[error("invalid application header block: {0:?}")]
    InvalidBlock2(String),
    /// A tag inside a block could not be parsed.
    #[error("malformed tag in block {block}: {text:?}")]
    MalformedTag { block: String, text: String },
}

/// A block located in the input, before its content is interpreted.
struct RawBlock<'a> {
    name: &'a str,
    content: &'a str,
    /// Offset right after the closing brace.
    end: usize,
    /// `true` when block 4 uses the `:NN:` line form.
    text_form: bool,
}

/// Parse a FIN message with the default (lenient) configuration.
pub fn parse(input: &str) -> Result<SwiftMessage, ParseError> {
    parse_with(input, &ParserConfig::default())
}

/// Parse a FIN message.
pub fn parse_with(input: &str, config: &ParserConfig) -> Result<SwiftMessage, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }
    if input.len() > config.max_message_len {
        return Err(ParseError::TooLarge {
            max: config.max_message_len,
            actual: input.len(),
        });
    }

    let bytes = input.as_bytes();
    let mut msg = SwiftMessage::new();
    let mut pos = 0;

    loop {
        pos = skip_whitespace(bytes, pos);
        if pos >= bytes.len() {
            break;
        }
        if bytes[pos] != b'{' {
            if !config.lenient {
                return Err(ParseError::StrayText(pos));
            }
            warn!(offset = pos, "ignoring text outside blocks");
            if config.keep_unparsed_texts {
                msg.unparsed_texts.push(input[pos..].trim_end().to_string());
            }
            break;
        }

        if msg.block1.is_some() && input[pos..].starts_with("{1:") {
            debug!(offset = pos, "second basic header, keeping remainder as unparsed text");
            if config.keep_unparsed_texts {
                msg.unparsed_texts.push(input[pos..].trim_end().to_string());
            }
            break;
        }
        let raw = next_block(input, pos, config.lenient)?;
        pos = raw.end;
        apply_block(&mut msg, &raw, config)?;
    }

    debug!(
        message_type = msg.message_type().unwrap_or("-"),
        body_tags = msg.block4.as_ref().map_or(0, TagList::len),
        "parsed FIN message"
    );
    Ok(msg)
}

#[inline]
fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

/// Locate the block whose opening brace is at `start`.
fn next_block(input: &str, start: usize, lenient: bool) -> Result<RawBlock<'_>, ParseError> {
    let bytes = input.as_bytes();
    let colon = bytes[start + 1..]
        .iter()
        .position(|&b| b == b':' || b == b'{' || b == b'}')
        .map(|i| start + 1 + i)
        .filter(|&i| bytes[i] == b':' && i > start + 1)
        .ok_or(ParseError::MissingBlockName(start))?;
    let name = &input[start + 1..colon];
    let content_start = colon + 1;
    let rest = &input[content_start..];

    // `{4:}` and `{4:{177:...}}` are brace form.
    let text_form = name == "4" && !rest.trim_start().starts_with(['{', '}']);
    if text_form {
        let end_rel = if rest.starts_with("-}") {
            Some(0)
        } else {
            rest.find("\n-}").map(|i| i + 1)
        };
        let end_rel = match end_rel {
            Some(e) => e,
            None if lenient => {
                let e = rest.find("-}").ok_or(ParseError::UnterminatedTextBlock)?;
                warn!("text block terminator not on its own line");
                e
            }
            None => return Err(ParseError::UnterminatedTextBlock),
        };
        return Ok(RawBlock {
            name,
            content: &rest[..end_rel],
            end: content_start + end_rel + 2,
            text_form,
        });
    }

    let close = matching_brace(bytes, content_start).ok_or_else(|| {
        ParseError::UnterminatedBlock {
            name: name.to_string(),
            offset: start,
        }
    })?;
    Ok(RawBlock {
        name,
        content: &input[content_start..close],
        end: close + 1,
        text_form,
    })
}

/// Index of the `}` closing a block whose content begins at `from`
/// (the opening brace has already been consumed).
fn matching_brace(bytes: &[u8], from: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (i, &b) in bytes.iter().enumerate().skip(from) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Store an already located block into `msg`.
fn apply_block(msg: &mut SwiftMessage, raw: &RawBlock<'_>, config: &ParserConfig) -> Result<(), ParseError> {
    let lenient = config.lenient;
    let occupied = match raw.name {
        "2" => msg.block2.is_some(),
        "3" => msg.block3.is_some(),
        "4" => msg.block4.is_some(),
        "5" => msg.block5.is_some(),
        _ => false,
    };
    if occupied {
        if !lenient {
            return Err(ParseError::DuplicateBlock(raw.name.to_string()));
        }
        warn!(block = raw.name, "ignoring duplicate block");
        return Ok(());
    }

    match raw.name {
        "1" => msg.block1 = Some(Block1::parse(raw.content.trim(), lenient)?),
        "2" => msg.block2 = Some(Block2::parse(raw.content.trim(), lenient)?),
        "3" => msg.block3 = Some(parse_tag_list("3", raw.content, lenient)?),
        "4" if raw.text_form => msg.block4 = Some(parse_text_block(raw.content, lenient)?),
        "4" => msg.block4 = Some(parse_tag_list("4", raw.content, lenient)?),
        "5" => msg.block5 = Some(parse_tag_list("5", raw.content, lenient)?),
        name => msg.user_blocks.push(UserBlock {
            name: name.to_string(),
            tags: parse_tag_list(name, raw.content, lenient)?,
        }),
    }
    Ok(())
}

/// Parse a `{name:value}{name:value}` list, as found in blocks 3 and 5.
///
/// A tag without a `:` (e.g. `{PDE}`) yields an empty value.
pub fn parse_tag_list(block: &str, content: &str, lenient: bool) -> Result<TagList, ParseError> {
    let bytes = content.as_bytes();
    let mut list = TagList::new();
    let mut pos = 0;
    loop {
        pos = skip_whitespace(bytes, pos);
        if pos >= bytes.len() {
            break;
        }
        let malformed = || ParseError::MalformedTag {
            block: block.to_string(),
            text: content[pos..].to_string(),
        };
        if bytes[pos] != b'{' {
            if lenient {
                warn!(block, "ignoring text between tags");
                break;
            }
            return Err(malformed());
        }
        let close = match matching_brace(bytes, pos + 1) {
            Some(c) => c,
            None if lenient => {
                warn!(block, "unterminated tag at end of block");
                break;
            }
            None => return Err(malformed()),
        };
        let inner = &content[pos + 1..close];
        let tag = match inner.split_once(':') {
            Some((name, value)) => Tag::new(name, value),
            None => Tag::new(inner, ""),
        };
        list.append(tag);
        pos = close + 1;
    }
    Ok(list)
}

/// Split `:NAME:value` into its name and value when `line` opens a tag.
fn split_tag_line(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix(':')?;
    let colon = rest.find(':')?;
    let name = &rest[..colon];
    is_valid_field_name(name).then(|| (name, &rest[colon + 1..]))
}

/// Parse the text form of block 4 (content between `{4:` and `-}`).
pub fn parse_text_block(content: &str, lenient: bool) -> Result<TagList, ParseError> {
    let body = content.trim_end_matches(['\r', '\n']);
    let mut list = TagList::new();
    let mut current: Option<(String, String)> = None;

    for line in body.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if let Some((name, value)) = split_tag_line(line) {
            if let Some((n, v)) = current.take() {
                list.append(Tag::new(&n, &v));
            }
            current = Some((name.to_string(), value.to_string()));
        } else if let Some((_, v)) = current.as_mut() {
            v.push_str("\r\n");
            v.push_str(line);
        } else if line.is_empty() {
            continue;
        } else if lenient {
            warn!(text = line, "ignoring text before the first tag of block 4");
        } else {
            return Err(ParseError::MalformedTag {
                block: "4".to_string(),
                text: line.to_string(),
            });
        }
    }
    if let Some((n, v)) = current {
        list.append(Tag::new(&n, &v));
    }
    Ok(list)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
