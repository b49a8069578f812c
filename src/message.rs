/*
    ALICE-SWIFT
    Copyright (C) 2026 Moroya Sakamoto
*/

//! SWIFT MT message representation.
//!
//! A [`SwiftMessage`] holds the parsed blocks of a single FIN message. Every
//! block is optional so that partial messages (a body without headers, an
//! ACK carrying only blocks 1 and 4) can still be represented and written
//! back out.

use serde::{Deserialize, Serialize};

use crate::block::{Block1, Block2, TagList, UserBlock};
use crate::tag;

/// A parsed SWIFT MT message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwiftMessage {
    pub block1: Option<Block1>,
    pub block2: Option<Block2>,
    /// User header, e.g. `{108:MUR}{121:uuid}`.
    pub block3: Option<TagList>,
    /// Text block (message body).
    pub block4: Option<TagList>,
    /// Trailer, e.g. `{CHK:...}`.
    pub block5: Option<TagList>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_blocks: Vec<UserBlock>,
    /// Raw text following the message, such as the original message
    /// appended to an ACK/NAK.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unparsed_texts: Vec<String>,
}

impl SwiftMessage {
    /// Create an empty message.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Three-digit message type from block 2 (e.g. `"320"`).
    pub fn message_type(&self) -> Option<&str> {
        self.block2.as_ref().map(Block2::message_type)
    }

    /// `true` if block 2 is present and is the `I` direction.
    pub fn is_input(&self) -> bool {
        self.block2.as_ref().is_some_and(Block2::is_input)
    }

    /// `true` if block 2 is present and is the `O` direction.
    pub fn is_output(&self) -> bool {
        self.block2.as_ref().is_some_and(|b| !b.is_input())
    }

    /// `true` for service messages (service id other than `01`).
    pub fn is_system_message(&self) -> bool {
        self.block1.as_ref().is_some_and(|b| b.service_id != "01")
    }

    /// `true` for a positive acknowledgement (service 21, tag 451 = `0`).
    pub fn is_ack(&self) -> bool {
        self.ack_flag() == Some("0")
    }

    /// `true` for a negative acknowledgement (service 21, tag 451 = `1`).
    pub fn is_nack(&self) -> bool {
        self.ack_flag() == Some("1")
    }

    fn ack_flag(&self) -> Option<&str> {
        let b1 = self.block1.as_ref()?;
        if b1.service_id != "21" {
            return None;
        }
        self.block4.as_ref()?.get(tag::ACCEPT_REJECT)
    }

    /// BIC11 of the sender: block 1 for input messages, the MIR in block 2
    /// for output messages.
    pub fn sender(&self) -> Option<String> {
        match self.block2.as_ref()? {
            Block2::Input(_) => self.block1.as_ref()?.bic(),
            Block2::Output(o) => o.sender_bic(),
        }
    }

    /// BIC11 of the receiver: block 2 for input messages, block 1 for output
    /// messages.
    pub fn receiver(&self) -> Option<String> {
        match self.block2.as_ref()? {
            Block2::Input(i) => i.receiver_bic(),
            Block2::Output(_) => self.block1.as_ref()?.bic(),
        }
    }

    /// Message User Reference (block 3, tag 108).
    pub fn mur(&self) -> Option<&str> {
        self.block3.as_ref()?.get(tag::MUR)
    }

    /// Unique End-to-end Transaction Reference (block 3, tag 121).
    pub fn uetr(&self) -> Option<&str> {
        self.block3.as_ref()?.get(tag::UETR)
    }

    /// First value of a block 4 field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.block4.as_ref()?.get(name)
    }

    /// All values of a block 4 field, in order.
    pub fn fields(&self, name: &str) -> Vec<&str> {
        self.block4
            .as_ref()
            .map(|b| b.get_all(name))
            .unwrap_or_default()
    }

    /// The text block, if present.
    #[inline]
    pub fn body(&self) -> Option<&TagList> {
        self.block4.as_ref()
    }

    /// The text block, created empty if absent.
    pub fn body_mut(&mut self) -> &mut TagList {
        self.block4.get_or_insert_with(TagList::new)
    }

    /// The user header, created empty if absent.
    pub fn block3_mut(&mut self) -> &mut TagList {
        self.block3.get_or_insert_with(TagList::new)
    }

    /// The trailer, created empty if absent.
    pub fn block5_mut(&mut self) -> &mut TagList {
        self.block5.get_or_insert_with(TagList::new)
    }

    /// Serialise the message model to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Rebuild a message from [`Self::to_json`] output.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
