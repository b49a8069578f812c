/*
    ALICE-SWIFT
    Copyright (C) 2026 Moroya Sakamoto
*/

//! SWIFT FIN block model.
//!
//! A FIN message is a sequence of blocks:
//!
//! ```text
//! {1:F01BANKBEBBAXXX2222123456}        basic header       -> Block1
//! {2:I320BANKDEFFXXXXN}               application header -> Block2
//! {3:{108:MUR}{121:uuid}}             user header        -> TagList
//! {4:\r\n:20:REF\r\n...\r\n-}        text (body)        -> TagList
//! {5:{CHK:123456789ABC}}              trailer            -> TagList
//! {S:{SAC:}}                          user blocks        -> UserBlock
//! ```
//!
//! Blocks 3, 4 and 5 are all ordered tag lists. Order matters: block 4
//! sequences are defined by tag position, so [`TagList`] is backed by a `Vec`
//! rather than a map.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::parser::ParseError;
use crate::tag::{name_matches, Tag};

// ---------------------------------------------------------------------------
// TagList
// ---------------------------------------------------------------------------

/// Ordered list of tags. Duplicate names are allowed and significant.
///
/// All lookups accept wildcard patterns (see [`crate::tag::name_matches`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagList {
    tags: Vec<Tag>,
}

impl TagList {
    /// Create an empty list.
    #[inline]
    pub fn new() -> Self {
        Self { tags: Vec::new() }
    }

    /// Wrap an existing vector of tags.
    #[inline]
    pub fn from_tags(tags: Vec<Tag>) -> Self {
        Self { tags }
    }

    /// Append a tag at the end. Returns `&mut self` for chaining.
    #[inline]
    pub fn append(&mut self, tag: Tag) -> &mut Self {
        self.tags.push(tag);
        self
    }

    /// Append a `name`/`value` pair at the end.
    #[inline]
    pub fn push(&mut self, name: &str, value: &str) -> &mut Self {
        self.append(Tag::new(name, value))
    }

    /// All tags in order.
    #[inline]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Consume the list and return its tags.
    #[inline]
    pub fn into_tags(self) -> Vec<Tag> {
        self.tags
    }

    /// Number of tags.
    #[inline]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// `true` if the list holds no tags.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterate over the tags in order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.tags.iter()
    }

    /// Value of the first tag matching `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_tag(name).map(|t| t.value.as_str())
    }

    /// Values of every tag matching `name`, in order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.tags
            .iter()
            .filter(|t| t.matches(name))
            .map(|t| t.value.as_str())
            .collect()
    }

    /// First tag matching `name`.
    pub fn get_tag(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.matches(name))
    }

    /// Every tag matching `name`, in order.
    pub fn get_tags(&self, name: &str) -> Vec<&Tag> {
        self.tags.iter().filter(|t| t.matches(name)).collect()
    }

    /// `true` if any tag matches `name`.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Number of tags matching `name`.
    pub fn count(&self, name: &str) -> usize {
        self.tags.iter().filter(|t| t.matches(name)).count()
    }

    /// Index of the first tag matching `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.tags.iter().position(|t| t.matches(name))
    }

    /// Replace the value of the first tag named exactly `name`, or append a
    /// new tag when none exists.
    pub fn set(&mut self, name: &str, value: &str) -> &mut Self {
        match self.tags.iter_mut().find(|t| t.name == name) {
            Some(t) => *t = Tag::new(name, value),
            None => self.tags.push(Tag::new(name, value)),
        }
        self
    }

    /// Remove every tag matching `name`. Returns the number removed.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.tags.len();
        self.tags.retain(|t| !t.matches(name));
        before - self.tags.len()
    }

    /// Copy of the tags in `range`, clamped to the list bounds.
    pub fn slice(&self, range: Range<usize>) -> TagList {
        let end = range.end.min(self.tags.len());
        let start = range.start.min(end);
        Self::from_tags(self.tags[start..end].to_vec())
    }
}

impl FromIterator<Tag> for TagList {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self::from_tags(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TagList {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

impl IntoIterator for TagList {
    type Item = Tag;
    type IntoIter = std::vec::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.into_iter()
    }
}

// ---------------------------------------------------------------------------
// Logical terminal addresses
// ---------------------------------------------------------------------------

/// Expand a BIC8 or BIC11 into a 12-character logical terminal address.
///
/// The terminal code is inserted after the first eight characters and the
/// branch defaults to `XXX`: `lt_address("BANKBEBB", 'A')` → `"BANKBEBBAXXX"`.
/// Returns `None` when `bic` is not 8 or 11 characters long.
pub fn lt_address(bic: &str, terminal: char) -> Option<String> {
    if !bic.is_ascii() {
        return None;
    }
    let branch = match bic.len() {
        8 => "XXX",
        11 => &bic[8..],
        _ => return None,
    };
    let mut out = String::with_capacity(12);
    out.push_str(&bic[..8]);
    out.push(terminal);
    out.push_str(branch);
    Some(out)
}

/// BIC11 of a 12-character LT address (terminal code removed).
fn bic_of_lt(lt: &str) -> Option<String> {
    if lt.len() != 12 || !lt.is_ascii() {
        return None;
    }
    Some(format!("{}{}", &lt[..8], &lt[9..]))
}

// ---------------------------------------------------------------------------
// Block 1 — basic header
// ---------------------------------------------------------------------------

/// Basic header block: `F01BANKBEBBAXXX2222123456`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block1 {
    /// `F` (FIN), `A` (GPA) or `L` (login).
    pub application_id: char,
    /// `01` user-to-user, `21` ACK/NAK, other values for system services.
    pub service_id: String,
    /// 12-character logical terminal address.
    pub lt_address: String,
    /// Four-digit session number; empty when not supplied.
    pub session_number: String,
    /// Six-digit input/output sequence number; empty when not supplied.
    pub sequence_number: String,
}

impl Block1 {
    /// Full length of a basic header with session and sequence numbers.
    pub const LEN: usize = 25;
    /// Length without session and sequence numbers.
    pub const MIN_LEN: usize = 15;

    /// A FIN user-to-user header for the given LT address, with zeroed
    /// session and sequence numbers.
    pub fn new(lt_address: &str) -> Self {
        Self {
            application_id: 'F',
            service_id: "01".to_string(),
            lt_address: lt_address.to_string(),
            session_number: "0000".to_string(),
            sequence_number: "000000".to_string(),
        }
    }

    /// Parse the content of `{1:...}`.
    ///
    /// In strict mode the value must be exactly [`Self::LEN`] characters. In
    /// lenient mode the session and sequence numbers may be missing or short.
    pub fn parse(value: &str, lenient: bool) -> Result<Self, ParseError> {
        let invalid = || ParseError::InvalidBlock1(value.to_string());
        if !value.is_ascii() {
            return Err(invalid());
        }
        let len = value.len();
        if len != Self::LEN && !(lenient && len >= Self::MIN_LEN && len < Self::LEN) {
            return Err(invalid());
        }
        let application_id = value.chars().next().ok_or_else(invalid)?;
        let rest = &value[Self::MIN_LEN..];
        let (session, sequence) = rest.split_at(rest.len().min(4));
        Ok(Self {
            application_id,
            service_id: value[1..3].to_string(),
            lt_address: value[3..15].to_string(),
            session_number: session.to_string(),
            sequence_number: sequence.to_string(),
        })
    }

    /// Serialise back to the block content (without braces).
    pub fn to_fin(&self) -> String {
        format!(
            "{}{}{}{}{}",
            self.application_id,
            self.service_id,
            self.lt_address,
            self.session_number,
            self.sequence_number
        )
    }

    /// BIC11 of the logical terminal.
    pub fn bic(&self) -> Option<String> {
        bic_of_lt(&self.lt_address)
    }
}

// ---------------------------------------------------------------------------
// Block 2 — application header
// ---------------------------------------------------------------------------

/// Application header block, input or output direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "direction", rename_all = "lowercase")]
pub enum Block2 {
    /// Sent to SWIFT: `I320BANKDEFFXXXXN`.
    Input(Block2Input),
    /// Delivered by SWIFT: `O3201200260105BANKBEBBAXXX22221234562601051201N`.
    Output(Block2Output),
}

/// Input application header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block2Input {
    /// Three-digit message type.
    pub message_type: String,
    /// 12-character receiver LT address.
    pub receiver_address: String,
    /// `S`, `U` or `N`.
    pub priority: Option<char>,
    /// `1`, `2` or `3`; only written when a priority is present.
    pub delivery_monitoring: Option<char>,
    /// Three-digit obsolescence period, in units of five minutes.
    pub obsolescence_period: Option<String>,
}

/// Output application header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block2Output {
    /// Three-digit message type.
    pub message_type: String,
    /// Sender's input time, `HHMM`.
    pub input_time: String,
    /// Message Input Reference: date (6), LT address (12), session (4),
    /// sequence (6).
    pub mir: String,
    /// Output date, `YYMMDD`.
    pub output_date: String,
    /// Output time, `HHMM`.
    pub output_time: String,
    /// `S`, `U` or `N`.
    pub priority: Option<char>,
}

impl Block2 {
    const INPUT_MIN: usize = 16;
    const INPUT_MAX: usize = 21;
    const OUTPUT_MIN: usize = 46;
    const OUTPUT_MAX: usize = 47;

    /// Parse the content of `{2:...}`.
    pub fn parse(value: &str, lenient: bool) -> Result<Self, ParseError> {
        let invalid = || ParseError::InvalidBlock2(value.to_string());
        if !value.is_ascii() {
            return Err(invalid());
        }
        let len = value.len();
        match value.as_bytes().first() {
            Some(b'I') => {
                let ok = (Self::INPUT_MIN..=Self::INPUT_MAX).contains(&len)
                    || (lenient && len > Self::INPUT_MAX);
                if !ok {
                    return Err(invalid());
                }
                let char_at = |i: usize| value[i..].chars().next();
                let obsolescence = (len >= 21).then(|| value[18..21].to_string());
                Ok(Block2::Input(Block2Input {
                    message_type: value[1..4].to_string(),
                    receiver_address: value[4..16].to_string(),
                    priority: if len > 16 { char_at(16) } else { None },
                    delivery_monitoring: if len > 17 { char_at(17) } else { None },
                    obsolescence_period: obsolescence,
                }))
            }
            Some(b'O') => {
                let ok = (Self::OUTPUT_MIN..=Self::OUTPUT_MAX).contains(&len)
                    || (lenient && len > Self::OUTPUT_MAX);
                if !ok {
                    return Err(invalid());
                }
                Ok(Block2::Output(Block2Output {
                    message_type: value[1..4].to_string(),
                    input_time: value[4..8].to_string(),
                    mir: value[8..36].to_string(),
                    output_date: value[36..42].to_string(),
                    output_time: value[42..46].to_string(),
                    priority: value[46..].chars().next(),
                }))
            }
            _ => Err(invalid()),
        }
    }

    /// Serialise back to the block content (without braces).
    pub fn to_fin(&self) -> String {
        match self {
            Block2::Input(b) => {
                let mut out = format!("I{}{}", b.message_type, b.receiver_address);
                if let Some(p) = b.priority {
                    out.push(p);
                    if let Some(d) = b.delivery_monitoring {
                        out.push(d);
                        if let Some(o) = &b.obsolescence_period {
                            out.push_str(o);
                        }
                    }
                }
                out
            }
            Block2::Output(b) => {
                let mut out = format!(
                    "O{}{}{}{}{}",
                    b.message_type, b.input_time, b.mir, b.output_date, b.output_time
                );
                if let Some(p) = b.priority {
                    out.push(p);
                }
                out
            }
        }
    }

    /// Three-digit message type, e.g. `"320"`.
    pub fn message_type(&self) -> &str {
        match self {
            Block2::Input(b) => &b.message_type,
            Block2::Output(b) => &b.message_type,
        }
    }

    #[inline]
    pub fn is_input(&self) -> bool {
        matches!(self, Block2::Input(_))
    }

    /// Priority flag, if present.
    pub fn priority(&self) -> Option<char> {
        match self {
            Block2::Input(b) => b.priority,
            Block2::Output(b) => b.priority,
        }
    }
}

impl Block2Output {
    /// LT address embedded in the MIR (the original sender).
    pub fn mir_lt_address(&self) -> Option<&str> {
        self.mir.get(6..18)
    }

    /// BIC11 of the original sender.
    pub fn sender_bic(&self) -> Option<String> {
        self.mir_lt_address().and_then(bic_of_lt)
    }
}

impl Block2Input {
    /// BIC11 of the receiver.
    pub fn receiver_bic(&self) -> Option<String> {
        bic_of_lt(&self.receiver_address)
    }
}

// ---------------------------------------------------------------------------
// User blocks
// ---------------------------------------------------------------------------

/// A non-standard block such as `{S:{SAC:}{COP:P}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBlock {
    pub name: String,
    pub tags: TagList,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_list() -> TagList {
        let mut list = TagList::new();
        list.push("20", "REF1")
            .push("53A", "BANKBEBB")
            .push("57D", "NAME\nADDRESS")
            .push("20", "REF2");
        list
    }

    #[test]
    fn test_get_returns_first() {
        let list = sample_list();
        assert_eq!(list.get("20"), Some("REF1"));
        assert_eq!(list.get_all("20"), vec!["REF1", "REF2"]);
        assert_eq!(list.count("20"), 2);
    }

    #[test]
    fn test_wildcard_lookup() {
        let list = sample_list();
        assert_eq!(list.get("53a"), Some("BANKBEBB"));
        assert_eq!(list.get("57a"), Some("NAME\r\nADDRESS"));
        assert_eq!(list.get("56a"), None);
        assert!(list.contains("57a"));
    }

    #[test]
    fn test_set_replaces_or_appends() {
        let mut list = sample_list();
        list.set("20", "NEW");
        assert_eq!(list.get_all("20"), vec!["NEW", "REF2"]);
        list.set("72", "INFO");
        assert_eq!(list.tags().last().map(|t| t.name.as_str()), Some("72"));
    }

    #[test]
    fn test_remove_all_matches() {
        let mut list = sample_list();
        assert_eq!(list.remove("20"), 2);
        assert_eq!(list.len(), 2);
        assert_eq!(list.position("53a"), Some(0));
    }

    #[test]
    fn test_slice_clamped() {
        let list = sample_list();
        assert_eq!(list.slice(1..3).len(), 2);
        assert_eq!(list.slice(3..10).len(), 1);
        assert!(list.slice(9..12).is_empty());
    }

    #[test]
    fn test_block1_parse_full() {
        let b = Block1::parse("F01BANKBEBBAXXX2222123456", false).unwrap();
        assert_eq!(b.application_id, 'F');
        assert_eq!(b.service_id, "01");
        assert_eq!(b.lt_address, "BANKBEBBAXXX");
        assert_eq!(b.session_number, "2222");
        assert_eq!(b.sequence_number, "123456");
        assert_eq!(b.bic().as_deref(), Some("BANKBEBBXXX"));
        assert_eq!(b.to_fin(), "F01BANKBEBBAXXX2222123456");
    }

    #[test]
    fn test_block1_short_only_lenient() {
        assert!(Block1::parse("F01BANKBEBBAXXX", false).is_err());
        let b = Block1::parse("F01BANKBEBBAXXX", true).unwrap();
        assert_eq!(b.session_number, "");
        assert_eq!(b.sequence_number, "");
    }

    #[test]
    fn test_block2_input() {
        let b = Block2::parse("I320BANKDEFFXXXXN", false).unwrap();
        assert!(b.is_input());
        assert_eq!(b.message_type(), "320");
        assert_eq!(b.priority(), Some('N'));
        match &b {
            Block2::Input(i) => {
                assert_eq!(i.receiver_address, "BANKDEFFXXXX");
                assert_eq!(i.receiver_bic().as_deref(), Some("BANKDEFFXXX"));
            }
            Block2::Output(_) => panic!("expected input"),
        }
        assert_eq!(b.to_fin(), "I320BANKDEFFXXXXN");
    }

    #[test]
    fn test_block2_input_without_priority() {
        let b = Block2::parse("I361BANKDEFFXXXX", false).unwrap();
        assert_eq!(b.priority(), None);
        assert_eq!(b.to_fin(), "I361BANKDEFFXXXX");
    }

    #[test]
    fn test_block2_output() {
        let value = "O3201200260105BANKBEBBAXXX22221234562601051201N";
        let b = Block2::parse(value, false).unwrap();
        assert!(!b.is_input());
        assert_eq!(b.message_type(), "320");
        match &b {
            Block2::Output(o) => {
                assert_eq!(o.input_time, "1200");
                assert_eq!(o.mir_lt_address(), Some("BANKBEBBAXXX"));
                assert_eq!(o.sender_bic().as_deref(), Some("BANKBEBBXXX"));
                assert_eq!(o.output_date, "260105");
                assert_eq!(o.output_time, "1201");
            }
            Block2::Input(_) => panic!("expected output"),
        }
        assert_eq!(b.to_fin(), value);
    }

    #[test]
    fn test_block2_rejects_bad_direction() {
        assert!(matches!(
            Block2::parse("X320BANKDEFFXXXXN", true),
            Err(ParseError::InvalidBlock2(_))
        ));
    }

    #[test]
    fn test_lt_address() {
        assert_eq!(lt_address("BANKBEBB", 'A').as_deref(), Some("BANKBEBBAXXX"));
        assert_eq!(lt_address("BANKBEBB123", 'X').as_deref(), Some("BANKBEBBX123"));
        assert_eq!(lt_address("BANK", 'A'), None);
    }
}
