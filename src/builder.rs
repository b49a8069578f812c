/*
    ALICE-SWIFT
    Copyright (C) 2026 Moroya Sakamoto
*/

//! MT message builder.
//!
//! [`MessageBuilder`] accumulates body fields and header options and produces
//! a [`SwiftMessage`] (or its FIN text) with the basic and application
//! headers derived from the sender and receiver BICs.
//!
//! ## Build Flow
//!
//! 1. Expand the sender BIC into the block 1 LT address (terminal `A`).
//! 2. Expand the receiver BIC into the block 2 address (terminal `X`).
//! 3. Add block 3 only when a MUR or UETR was supplied.
//! 4. Append the body fields in the order [`MessageBuilder::field`] was called.

use uuid::Uuid;

use crate::block::{lt_address, Block1, Block2, Block2Input, TagList};
use crate::message::SwiftMessage;
use crate::tag;
use crate::writer;

/// Builder for outgoing (input direction) MT messages.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    sender: String,
    receiver: String,
    message_type: String,
    priority: Option<char>,
    session_number: String,
    sequence_number: String,
    mur: Option<String>,
    uetr: Option<String>,
    /// Body fields, in insertion order.
    fields: Vec<(String, String)>,
}

impl MessageBuilder {
    /// Create a builder for a message of type `message_type` (e.g. `"320"`)
    /// from `sender` to `receiver` (BIC8 or BIC11).
    pub fn new(sender: &str, receiver: &str, message_type: &str) -> Self {
        Self {
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            message_type: message_type.to_string(),
            priority: Some('N'),
            session_number: "0000".to_string(),
            sequence_number: "000000".to_string(),
            mur: None,
            uetr: None,
            fields: Vec::new(),
        }
    }

    /// Append a body field. Returns `&mut self` for method chaining.
    pub fn field(&mut self, name: &str, value: &str) -> &mut Self {
        self.fields.push((name.to_string(), value.to_string()));
        self
    }

    /// Append an empty `15<letter>` marker opening a sequence.
    pub fn sequence(&mut self, letter: &str) -> &mut Self {
        self.field(&format!("15{letter}"), "")
    }

    /// Block 2 priority (`N`, `U` or `S`); `None` omits it.
    pub fn priority(&mut self, priority: Option<char>) -> &mut Self {
        self.priority = priority;
        self
    }

    /// Block 1 session and sequence numbers.
    pub fn session(&mut self, session: u16, sequence: u32) -> &mut Self {
        self.session_number = format!("{:04}", session % 10_000);
        self.sequence_number = format!("{:06}", sequence % 1_000_000);
        self
    }

    /// Message User Reference (block 3, tag 108).
    pub fn mur(&mut self, mur: &str) -> &mut Self {
        self.mur = Some(mur.to_string());
        self
    }

    /// UETR (block 3, tag 121).
    pub fn uetr(&mut self, uetr: &str) -> &mut Self {
        self.uetr = Some(uetr.to_string());
        self
    }

    /// Assign a fresh random UETR (UUID v4, lowercase hyphenated).
    pub fn generate_uetr(&mut self) -> &mut Self {
        self.uetr = Some(Uuid::new_v4().to_string());
        self
    }

    /// Assemble the message.
    ///
    /// BICs that are not 8 or 11 characters long are used verbatim as the
    /// LT address; the validator reports them.
    pub fn build(&self) -> SwiftMessage {
        let sender_lt = lt_address(&self.sender, 'A').unwrap_or_else(|| self.sender.clone());
        let receiver_lt =
            lt_address(&self.receiver, 'X').unwrap_or_else(|| self.receiver.clone());

        let mut block1 = Block1::new(&sender_lt);
        block1.session_number = self.session_number.clone();
        block1.sequence_number = self.sequence_number.clone();

        let block3 = if self.mur.is_some() || self.uetr.is_some() {
            let mut b3 = TagList::new();
            if let Some(mur) = &self.mur {
                b3.push(tag::MUR, mur);
            }
            if let Some(uetr) = &self.uetr {
                b3.push(tag::UETR, uetr);
            }
            Some(b3)
        } else {
            None
        };

        let block4 = self
            .fields
            .iter()
            .map(|(n, v)| tag::Tag::new(n, v))
            .collect::<TagList>();

        SwiftMessage {
            block1: Some(block1),
            block2: Some(Block2::Input(Block2Input {
                message_type: self.message_type.clone(),
                receiver_address: receiver_lt,
                priority: self.priority,
                delivery_monitoring: None,
                obsolescence_period: None,
            })),
            block3,
            block4: Some(block4),
            block5: None,
            user_blocks: Vec::new(),
            unparsed_texts: Vec::new(),
        }
    }

    /// Assemble the message and write it as FIN text (CRLF).
    pub fn build_fin(&self) -> String {
        writer::write(&self.build())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    #[test]
    fn test_build_headers() {
        let msg = MessageBuilder::new("BANKBEBB", "BANKDEFF", "320")
            .field(tag::F20, "REF")
            .build();
        let b1 = msg.block1.as_ref().unwrap();
        assert_eq!(b1.lt_address, "BANKBEBBAXXX");
        assert_eq!(b1.session_number, "0000");
        assert_eq!(msg.message_type(), Some("320"));
        assert_eq!(msg.sender().as_deref(), Some("BANKBEBBXXX"));
        assert_eq!(msg.receiver().as_deref(), Some("BANKDEFFXXX"));
        assert_eq!(msg.block3, None);
    }

    #[test]
    fn test_build_fin_round_trip() {
        let fin = MessageBuilder::new("BANKBEBB", "BANKDEFF", "320")
            .session(12, 345)
            .mur("MYMUR")
            .sequence("A")
            .field(tag::F20, "REF-1")
            .field("72", "/BNF/LINE1\nLINE2")
            .build_fin();
        assert!(fin.starts_with("{1:F01BANKBEBBAXXX0012000345}{2:I320BANKDEFFXXXXN}{3:{108:MYMUR}}"));

        let msg = parser::parse(&fin).unwrap();
        assert_eq!(msg.mur(), Some("MYMUR"));
        assert_eq!(msg.field(tag::F15A), Some(""));
        assert_eq!(msg.field("72"), Some("/BNF/LINE1\r\nLINE2"));
    }

    #[test]
    fn test_generated_uetr_is_v4() {
        let msg = MessageBuilder::new("BANKBEBB", "BANKDEFF", "320")
            .generate_uetr()
            .build();
        let uetr = msg.uetr().unwrap();
        let parsed = Uuid::parse_str(uetr).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn test_priority_omitted() {
        let fin = MessageBuilder::new("BANKBEBB", "BANKDEFF", "361")
            .priority(None)
            .build_fin();
        assert!(fin.contains("{2:I361BANKDEFFXXXX}"));
    }

    #[test]
    fn test_bic11_branch_kept() {
        let msg = MessageBuilder::new("BANKBEBB001", "BANKDEFF", "360").build();
        assert_eq!(msg.block1.unwrap().lt_address, "BANKBEBBA001");
    }
}
