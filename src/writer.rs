/*
    ALICE-SWIFT
    Copyright (C) 2026 Moroya Sakamoto
*/

//! FIN message writer.
//!
//! Serialises a [`SwiftMessage`] back to FIN text. Absent blocks are simply
//! omitted, so a body-only message writes as a lone `{4:...-}`.
//!
//! ## Write Flow
//!
//! 1. `{1:...}` and `{2:...}` from their fixed-layout headers.
//! 2. `{3:{name:value}...}` for the user header.
//! 3. Block 4 in text form (`{4:` EOL `:name:value` EOL ... `-}`), or in
//!    brace form for system messages.
//! 4. `{5:...}`, then user blocks, then any unparsed texts verbatim.

use crate::block::TagList;
use crate::config::WriterConfig;
use crate::message::SwiftMessage;

/// Write a message with the default configuration (CRLF line endings).
pub fn write(msg: &SwiftMessage) -> String {
    write_with(msg, &WriterConfig::default())
}

/// Write a message to FIN text.
pub fn write_with(msg: &SwiftMessage, config: &WriterConfig) -> String {
    let eol = config.line_ending.as_str();
    let mut out = String::with_capacity(512);

    if let Some(b1) = &msg.block1 {
        out.push_str("{1:");
        out.push_str(&b1.to_fin());
        out.push('}');
    }
    if let Some(b2) = &msg.block2 {
        out.push_str("{2:");
        out.push_str(&b2.to_fin());
        out.push('}');
    }
    if let Some(b3) = &msg.block3 {
        append_tag_list_block(&mut out, "3", b3);
    }
    if let Some(b4) = &msg.block4 {
        if msg.is_system_message() {
            append_tag_list_block(&mut out, "4", b4);
        } else {
            out.push_str("{4:");
            out.push_str(eol);
            for tag in b4 {
                out.push(':');
                out.push_str(&tag.name);
                out.push(':');
                out.push_str(&tag.value.replace("\r\n", eol));
                out.push_str(eol);
            }
            out.push_str("-}");
        }
    }
    if let Some(b5) = &msg.block5 {
        append_tag_list_block(&mut out, "5", b5);
    }
    for ub in &msg.user_blocks {
        append_tag_list_block(&mut out, &ub.name, &ub.tags);
    }
    for text in &msg.unparsed_texts {
        out.push_str(text);
    }
    out
}

/// Append `{<name>:{t:v}{t:v}}` to `out`.
fn append_tag_list_block(out: &mut String, name: &str, tags: &TagList) {
    out.push('{');
    out.push_str(name);
    out.push(':');
    for tag in tags {
        out.push('{');
        out.push_str(&tag.name);
        out.push(':');
        out.push_str(&tag.value);
        out.push('}');
    }
    out.push('}');
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
