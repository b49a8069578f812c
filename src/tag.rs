/*
    ALICE-SWIFT
    Copyright (C) 2026 Moroya Sakamoto
*/

//! SWIFT tag (field occurrence) type and well-known field names.
//!
//! A [`Tag`] is one `name:value` pair inside a block. Block 4 names are a
//! two-digit number with an optional uppercase letter option (`20`, `22A`).
//! Block 3 and block 5 names are three digits (`108`) or three letters (`CHK`).
//!
//! Values are stored with canonical `\r\n` line breaks regardless of how the
//! input was framed; the writer converts them back on output.

use serde::{Deserialize, Serialize};

/// One field occurrence: a name and its raw (unparsed) value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    /// Field name, e.g. `"32B"` or `"108"`.
    pub name: String,
    /// Raw value; multi-line values use `\r\n` between lines.
    pub value: String,
}

impl Tag {
    /// Create a tag, normalising any lone `\n` in `value` to `\r\n`.
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: normalize_line_breaks(value),
        }
    }

    /// Numeric part of the name (`"32B"` → `Some(32)`), `None` for names
    /// that do not start with a digit (e.g. `"CHK"`).
    pub fn number(&self) -> Option<u16> {
        let end = self
            .name
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.name.len());
        if end == 0 {
            return None;
        }
        self.name[..end].parse().ok()
    }

    /// Letter option of a block 4 name (`"32B"` → `Some('B')`).
    pub fn letter_option(&self) -> Option<char> {
        let mut chars = self.name.chars();
        let last = chars.next_back()?;
        if self.name.len() == 3 && last.is_ascii_alphabetic() && self.number().is_some() {
            Some(last)
        } else {
            None
        }
    }

    /// `true` if the name matches `pattern` (see [`name_matches`]).
    #[inline]
    pub fn matches(&self, pattern: &str) -> bool {
        name_matches(&self.name, pattern)
    }

    /// `true` for the `15X` fields that open a sequence.
    #[inline]
    pub fn is_sequence_boundary(&self) -> bool {
        self.name.starts_with("15")
    }

    /// Iterate over the lines of the value.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.value.split("\r\n")
    }

    /// `true` if the value is empty (e.g. the `15A` sequence markers).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// Match a tag name against a lookup pattern.
///
/// A pattern made of two digits followed by a lowercase `a` (`"53a"`) matches
/// the bare number and every uppercase letter option of it (`"53"`, `"53A"`,
/// `"53D"`). Any other pattern must match exactly.
pub fn name_matches(name: &str, pattern: &str) -> bool {
    let p = pattern.as_bytes();
    if p.len() == 3 && p[2] == b'a' && p[0].is_ascii_digit() && p[1].is_ascii_digit() {
        let n = name.as_bytes();
        return match n.len() {
            2 => n == &p[..2],
            3 => n[..2] == p[..2] && n[2].is_ascii_uppercase(),
            _ => false,
        };
    }
    name == pattern
}

/// `true` if `name` is a syntactically valid block 4 field name:
/// two ASCII digits followed by an optional uppercase letter.
pub fn is_valid_field_name(name: &str) -> bool {
    let b = name.as_bytes();
    match b.len() {
        2 => b[0].is_ascii_digit() && b[1].is_ascii_digit(),
        3 => b[0].is_ascii_digit() && b[1].is_ascii_digit() && b[2].is_ascii_uppercase(),
        _ => false,
    }
}

/// Replace every `\n` not preceded by `\r` with `\r\n`, and drop stray `\r`
/// characters that are not followed by `\n`.
pub fn normalize_line_breaks(value: &str) -> String {
    if !value.contains('\n') && !value.contains('\r') {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + 8);
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                    out.push_str("\r\n");
                }
            }
            '\n' => out.push_str("\r\n"),
            _ => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Sequence markers
// ---------------------------------------------------------------------------

/// Field 15A — start of sequence A (General Information).
pub const F15A: &str = "15A";
/// Field 15B — start of sequence B.
pub const F15B: &str = "15B";
/// Field 15C — start of sequence C.
pub const F15C: &str = "15C";
/// Field 15D — start of sequence D.
pub const F15D: &str = "15D";
/// Field 15E — start of sequence E.
pub const F15E: &str = "15E";
/// Field 15F — start of sequence F.
pub const F15F: &str = "15F";
/// Field 15G — start of sequence G.
pub const F15G: &str = "15G";
/// Field 15H — start of sequence H.
pub const F15H: &str = "15H";
/// Field 15I — start of sequence I.
pub const F15I: &str = "15I";
/// Field 15J — start of sequence J.
pub const F15J: &str = "15J";

// ---------------------------------------------------------------------------
// Block 4 fields used by the treasury and derivative confirmations
// ---------------------------------------------------------------------------

/// Field 14D — Day Count Fraction.
pub const F14D: &str = "14D";
/// Field 14F — Floating Rate Option.
pub const F14F: &str = "14F";
/// Field 17R — Party A's Role (L = lender, B = borrower).
pub const F17R: &str = "17R";
/// Field 18A — Number of Repetitions.
pub const F18A: &str = "18A";
/// Field 20 — Sender's Reference.
pub const F20: &str = "20";
/// Field 21 — Related Reference.
pub const F21: &str = "21";
/// Field 22A — Type of Operation.
pub const F22A: &str = "22A";
/// Field 22B — Type of Event.
pub const F22B: &str = "22B";
/// Field 22C — Common Reference.
pub const F22C: &str = "22C";
/// Field 22X — Type of Principal Exchange.
pub const F22X: &str = "22X";
/// Field 23A — Identification of the Swap.
pub const F23A: &str = "23A";
/// Field 30F — Payment Date.
pub const F30F: &str = "30F";
/// Field 30P — Maturity / Termination Date.
pub const F30P: &str = "30P";
/// Field 30T — Trade Date.
pub const F30T: &str = "30T";
/// Field 30V — Value / Effective Date.
pub const F30V: &str = "30V";
/// Field 32B — Currency and Principal Amount.
pub const F32B: &str = "32B";
/// Field 32H — Amount to be Settled.
pub const F32H: &str = "32H";
/// Field 32M — Currency, Payment Amount.
pub const F32M: &str = "32M";
/// Field 33B — Transaction Currency and Net Interest Amount.
pub const F33B: &str = "33B";
/// Field 34E — Currency and Interest Amount.
pub const F34E: &str = "34E";
/// Field 37G — Interest Rate.
pub const F37G: &str = "37G";
/// Field 37L — Tax Rate.
pub const F37L: &str = "37L";
/// Field 37U — Fixed Rate.
pub const F37U: &str = "37U";
/// Field 57a — Receiving Agent (any letter option).
pub const F57A_ANY: &str = "57a";
/// Field 82a — Party A (any letter option).
pub const F82A_ANY: &str = "82a";
/// Field 87a — Party B (any letter option).
pub const F87A_ANY: &str = "87a";

// ---------------------------------------------------------------------------
// Block 3 (user header)
// ---------------------------------------------------------------------------

/// Tag 103 — Service Identifier (e.g. FIN copy service code).
pub const SERVICE_IDENTIFIER: &str = "103";
/// Tag 108 — Message User Reference (MUR).
pub const MUR: &str = "108";
/// Tag 111 — Service Type Identifier.
pub const SERVICE_TYPE: &str = "111";
/// Tag 113 — Banking Priority.
pub const BANKING_PRIORITY: &str = "113";
/// Tag 119 — Validation Flag.
pub const VALIDATION_FLAG: &str = "119";
/// Tag 121 — Unique End-to-end Transaction Reference (UETR).
pub const UETR: &str = "121";

// ---------------------------------------------------------------------------
// Block 4 system-message tags
// ---------------------------------------------------------------------------

/// Tag 177 — Date and time of the acknowledged message.
pub const ACK_DATE_TIME: &str = "177";
/// Tag 405 — Reject reason of a NAK.
pub const REJECT_REASON: &str = "405";
/// Tag 451 — Accept/reject flag: `0` accepted (ACK), `1` rejected (NAK).
pub const ACCEPT_REJECT: &str = "451";

// ---------------------------------------------------------------------------
// Block 5 (trailer)
// ---------------------------------------------------------------------------

/// Checksum trailer.
pub const CHK: &str = "CHK";
/// Training trailer.
pub const TNG: &str = "TNG";
/// Possible Duplicate Emission trailer.
pub const PDE: &str = "PDE";
/// Possible Duplicate Message trailer.
pub const PDM: &str = "PDM";
/// Delayed Message trailer.
pub const DLM: &str = "DLM";
/// Message Reference trailer.
pub const MRF: &str = "MRF";
/// System Originated Message trailer.
pub const SYS: &str = "SYS";

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_and_letter_option() {
        let t = Tag::new("32B", "EUR1000,");
        assert_eq!(t.number(), Some(32));
        assert_eq!(t.letter_option(), Some('B'));

        let t = Tag::new("20", "REF");
        assert_eq!(t.number(), Some(20));
        assert_eq!(t.letter_option(), None);
    }

    #[test]
    fn test_trailer_names_have_no_number() {
        let t = Tag::new(CHK, "123456789ABC");
        assert_eq!(t.number(), None);
        assert_eq!(t.letter_option(), None);
    }

    #[test]
    fn test_wildcard_pattern() {
        assert!(name_matches("53A", "53a"));
        assert!(name_matches("53D", "53a"));
        assert!(name_matches("53", "53a"));
        assert!(!name_matches("54A", "53a"));
        assert!(!name_matches("530", "53a"));
    }

    #[test]
    fn test_exact_pattern() {
        assert!(name_matches("22A", "22A"));
        assert!(!name_matches("22B", "22A"));
        assert!(!name_matches("22", "22A"));
    }

    #[test]
    fn test_valid_field_names() {
        assert!(is_valid_field_name("20"));
        assert!(is_valid_field_name("15A"));
        assert!(!is_valid_field_name("15a"));
        assert!(!is_valid_field_name("1"));
        assert!(!is_valid_field_name("CHK"));
        assert!(!is_valid_field_name("108"));
    }

    #[test]
    fn test_value_normalised_to_crlf() {
        let t = Tag::new("77D", "LINE1\nLINE2\r\nLINE3");
        assert_eq!(t.value, "LINE1\r\nLINE2\r\nLINE3");
        assert_eq!(t.lines().collect::<Vec<_>>(), vec!["LINE1", "LINE2", "LINE3"]);
    }

    #[test]
    fn test_stray_carriage_return_dropped() {
        assert_eq!(normalize_line_breaks("A\rB"), "AB");
    }

    #[test]
    fn test_sequence_boundary() {
        assert!(Tag::new(F15A, "").is_sequence_boundary());
        assert!(!Tag::new(F20, "X").is_sequence_boundary());
        assert!(Tag::new(F15A, "").is_empty());
    }
}
