/*
    ALICE-SWIFT
    Copyright (C) 2026 Moroya Sakamoto
*/

//! Message validation.
//!
//! [`validate`] runs two passes and collects every problem instead of
//! stopping at the first:
//!
//! 1. **Structure** — header blocks present, header BICs well formed, block 4
//!    field names and character set, UETR format.
//! 2. **Layout** — for message types with a registered [`MtLayout`]:
//!    mandatory sequences and fields, `15X` order, and repetition counters.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::block::{Block2, TagList};
use crate::convert::is_valid_bic;
use crate::layout::{self, MtLayout, SequenceLayout};
use crate::message::SwiftMessage;
use crate::mt::{MtView, Sequence};
use crate::sequence::split_by_field15;
use crate::tag::is_valid_field_name;

/// Maximum length of the block 4 text, in characters.
pub const MAX_TEXT_LEN: usize = 10_000;

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "problem", content = "detail", rename_all = "snake_case")]
pub enum ValidationProblem {
    #[error("block {0} is missing")]
    MissingBlock(u8),
    #[error("invalid BIC {value:?} in {location}")]
    InvalidBic { location: &'static str, value: String },
    #[error("invalid field name {0:?}")]
    InvalidFieldName(String),
    #[error("field {field} contains characters outside the SWIFT X character set")]
    InvalidCharset { field: String },
    #[error("text block is {actual} characters, above the limit of {max}")]
    TextTooLong { max: usize, actual: usize },
    #[error("invalid UETR {0:?}, expected a lowercase UUID v4")]
    InvalidUetr(String),
    #[error("no layout is registered for MT{0}")]
    UnknownMessageType(String),
    #[error("mandatory sequence {0} is missing")]
    MissingSequence(String),
    #[error("sequence {0} must not repeat")]
    RepeatedSequence(String),
    #[error("mandatory field {field} is missing in sequence {sequence}")]
    MissingField { sequence: String, field: String },
    #[error("sequence {found} appears after sequence {after}")]
    SequenceOrder { found: String, after: String },
    #[error("sequence {sequence} occurs {actual} times but field {counter} declares {declared:?}")]
    RepetitionMismatch {
        sequence: String,
        counter: String,
        declared: String,
        actual: usize,
    },
}

/// `true` if `c` belongs to the SWIFT X character set.
pub fn is_x_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "/-?:().,'+ \r\n".contains(c)
}

/// Run structural and layout validation.
pub fn validate(msg: &SwiftMessage) -> Vec<ValidationProblem> {
    let mut problems = validate_structure(msg);
    if let Some(mt) = msg.message_type() {
        match MtView::new(msg) {
            Some(view) => problems.extend(validate_layout(&view)),
            None if layout::lookup(mt).is_none() => {
                problems.push(ValidationProblem::UnknownMessageType(mt.to_string()))
            }
            None => {}
        }
    }
    debug!(
        message_type = msg.message_type().unwrap_or("-"),
        problems = problems.len(),
        "validated message"
    );
    problems
}

/// Header, character-set and field-name checks.
pub fn validate_structure(msg: &SwiftMessage) -> Vec<ValidationProblem> {
    let mut problems = Vec::new();

    match &msg.block1 {
        None => problems.push(ValidationProblem::MissingBlock(1)),
        Some(b1) => check_lt(&mut problems, "block 1", &b1.lt_address),
    }
    if msg.is_system_message() {
        return problems;
    }
    match &msg.block2 {
        None => problems.push(ValidationProblem::MissingBlock(2)),
        Some(Block2::Input(i)) => check_lt(&mut problems, "block 2", &i.receiver_address),
        Some(Block2::Output(o)) => {
            check_lt(&mut problems, "block 2 MIR", o.mir_lt_address().unwrap_or(""))
        }
    }

    if let Some(uetr) = msg.uetr() {
        let valid = Uuid::parse_str(uetr)
            .map(|u| u.get_version_num() == 4 && u.hyphenated().to_string() == uetr)
            .unwrap_or(false);
        if !valid {
            problems.push(ValidationProblem::InvalidUetr(uetr.to_string()));
        }
    }

    match &msg.block4 {
        None => problems.push(ValidationProblem::MissingBlock(4)),
        Some(body) => check_body(&mut problems, body),
    }
    problems
}

fn check_lt(problems: &mut Vec<ValidationProblem>, location: &'static str, lt: &str) {
    let bic = if lt.len() == 12 && lt.is_ascii() {
        format!("{}{}", &lt[..8], &lt[9..])
    } else {
        lt.to_string()
    };
    if !is_valid_bic(&bic) {
        problems.push(ValidationProblem::InvalidBic {
            location,
            value: lt.to_string(),
        });
    }
}

fn check_body(problems: &mut Vec<ValidationProblem>, body: &TagList) {
    let mut text_len = 0;
    for tag in body {
        // ":" + name + ":" + value + CRLF
        text_len += tag.name.len() + tag.value.len() + 4;
        if !is_valid_field_name(&tag.name) {
            problems.push(ValidationProblem::InvalidFieldName(tag.name.clone()));
        }
        if !tag.value.chars().all(is_x_char) {
            problems.push(ValidationProblem::InvalidCharset {
                field: tag.name.clone(),
            });
        }
    }
    if text_len > MAX_TEXT_LEN {
        problems.push(ValidationProblem::TextTooLong {
            max: MAX_TEXT_LEN,
            actual: text_len,
        });
    }
}

/// Sequence and mandatory-field checks against the view's layout.
pub fn validate_layout(view: &MtView<'_>) -> Vec<ValidationProblem> {
    let layout = view.layout();
    let mut problems = Vec::new();
    check_field15_order(&mut problems, layout, view.body());

    for seq in layout.top_level() {
        let found = view.sequences(seq.name);
        check_occurrences(&mut problems, seq, found.len(), None);
        for occurrence in &found {
            check_sequence(&mut problems, view, occurrence);
        }
    }
    problems
}

/// Mandatory fields of one occurrence, then its subsequences recursively.
fn check_sequence(problems: &mut Vec<ValidationProblem>, view: &MtView<'_>, occurrence: &Sequence) {
    for field in occurrence.layout.mandatory_fields {
        if occurrence.field(field).is_none() {
            problems.push(ValidationProblem::MissingField {
                sequence: occurrence.name().to_string(),
                field: field.to_string(),
            });
        }
    }
    for child in view.layout().children(occurrence.name()) {
        let found = view.sequences_within(child.name, occurrence);
        check_occurrences(problems, child, found.len(), Some(occurrence));
        for c in &found {
            check_sequence(problems, view, c);
        }
    }
}

fn check_occurrences(
    problems: &mut Vec<ValidationProblem>,
    seq: &SequenceLayout,
    count: usize,
    parent: Option<&Sequence>,
) {
    if count == 0 && seq.mandatory {
        problems.push(ValidationProblem::MissingSequence(seq.name.to_string()));
    }
    if count > 1 && !seq.repetitive {
        problems.push(ValidationProblem::RepeatedSequence(seq.name.to_string()));
    }
    let (Some(counter), Some(parent)) = (seq.counter, parent) else {
        return;
    };
    if let Some(declared) = parent.field(counter) {
        if declared.parse::<usize>().ok() != Some(count) {
            problems.push(ValidationProblem::RepetitionMismatch {
                sequence: seq.name.to_string(),
                counter: counter.to_string(),
                declared: declared.to_string(),
                actual: count,
            });
        }
    }
}

/// Top-level `15X` markers must follow layout order.
fn check_field15_order(problems: &mut Vec<ValidationProblem>, layout: &MtLayout, body: &TagList) {
    let mut last: Option<(usize, String)> = None;
    for block in split_by_field15(body) {
        let Some(rank) = layout.field15_rank(&block.letter) else {
            continue;
        };
        if let Some((last_rank, last_letter)) = &last {
            if rank < *last_rank {
                problems.push(ValidationProblem::SequenceOrder {
                    found: block.letter.clone(),
                    after: last_letter.clone(),
                });
                continue;
            }
        }
        last = Some((rank, block.letter));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
