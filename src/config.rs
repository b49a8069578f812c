/*
    ALICE-SWIFT
    Copyright (C) 2026 Moroya Sakamoto
*/

//! Parser and writer configuration.
//!
//! Both structs deserialise with `#[serde(default)]`, so a JSON document
//! only needs the keys it overrides:
//!
//! ```rust
//! use alice_swift::config::{Config, LineEnding};
//!
//! let cfg = Config::from_json(r#"{ "writer": { "line_ending": "lf" } }"#).unwrap();
//! assert_eq!(cfg.writer.line_ending, LineEnding::Lf);
//! assert!(cfg.parser.lenient);
//! ```

use serde::{Deserialize, Serialize};

/// Options for [`crate::parser::parse_with`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Recover from malformed headers, stray text and duplicate blocks
    /// instead of failing. Recoveries are logged at `warn` level.
    pub lenient: bool,
    /// Inputs longer than this many bytes are rejected.
    pub max_message_len: usize,
    /// Keep trailing text after the first message (e.g. the original
    /// message appended to an ACK) in `SwiftMessage::unparsed_texts`.
    pub keep_unparsed_texts: bool,
}

impl ParserConfig {
    pub const DEFAULT_MAX_MESSAGE_LEN: usize = 1024 * 1024;

    /// Configuration that fails on any structural irregularity.
    pub fn strict() -> Self {
        Self {
            lenient: false,
            ..Self::default()
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            lenient: true,
            max_message_len: Self::DEFAULT_MAX_MESSAGE_LEN,
            keep_unparsed_texts: true,
        }
    }
}

/// Line terminator used inside block 4.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// `\r\n`, the FIN wire format.
    #[default]
    CrLf,
    /// `\n`, convenient for files edited by hand.
    Lf,
}

impl LineEnding {
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::CrLf => "\r\n",
            LineEnding::Lf => "\n",
        }
    }
}

/// Options for [`crate::writer::write_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    pub line_ending: LineEnding,
}

/// Combined configuration, as loaded by the command line tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parser: ParserConfig,
    pub writer: WriterConfig,
}

impl Config {
    /// Load from a JSON document; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Same configuration with lenient parsing switched off; the other
    /// parser limits are kept.
    pub fn with_strict_parser(mut self) -> Self {
        self.parser.lenient = false;
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ParserConfig::default();
        assert!(cfg.lenient);
        assert!(cfg.keep_unparsed_texts);
        assert_eq!(cfg.max_message_len, ParserConfig::DEFAULT_MAX_MESSAGE_LEN);
        assert_eq!(WriterConfig::default().line_ending, LineEnding::CrLf);
    }

    #[test]
    fn test_strict() {
        assert!(!ParserConfig::strict().lenient);
    }

    #[test]
    fn test_partial_json() {
        let cfg = Config::from_json(r#"{ "parser": { "lenient": false } }"#).unwrap();
        assert!(!cfg.parser.lenient);
        assert_eq!(cfg.parser.max_message_len, ParserConfig::DEFAULT_MAX_MESSAGE_LEN);
        assert_eq!(cfg.writer.line_ending, LineEnding::CrLf);
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn test_strict_parser_keeps_loaded_limits() {
        let cfg = Config::from_json(
            r#"{ "parser": { "max_message_len": 4096, "keep_unparsed_texts": false } }"#,
        )
        .unwrap()
        .with_strict_parser();
        assert!(!cfg.parser.lenient);
        assert_eq!(cfg.parser.max_message_len, 4096);
        assert!(!cfg.parser.keep_unparsed_texts);
    }

    #[test]
    fn test_unknown_line_ending_rejected() {
        assert!(Config::from_json(r#"{ "writer": { "line_ending": "cr" } }"#).is_err());
    }
}
