/*
    ALICE-SWIFT
    Copyright (C) 2026 Moroya Sakamoto
*/

//! Multi-message input in RJE format.
//!
//! An RJE file holds FIN messages separated by a `$` character. Whitespace
//! around each message is ignored, and so are empty chunks (a trailing `$`
//! or `$$`).
//!
//! ```rust
//! use alice_swift::reader::RjeReader;
//!
//! let data = "{1:F01BANKBEBBAXXX0000000000}{4:\r\n:20:A\r\n-}\r\n$\r\n{1:F01BANKBEBBAXXX0000000000}{4:\r\n:20:B\r\n-}";
//! let refs: Vec<String> = RjeReader::new(data.as_bytes())
//!     .map(|m| m.unwrap().field("20").unwrap().to_string())
//!     .collect();
//! assert_eq!(refs, vec!["A", "B"]);
//! ```

use std::io::{self, BufRead, BufReader, Read};
use std::string::FromUtf8Error;

use thiserror::Error;
use tracing::debug;

use crate::config::ParserConfig;
use crate::message::SwiftMessage;
use crate::parser::{self, ParseError};

/// RJE message separator.
pub const SEPARATOR: u8 = b'$';

/// Failure while reading an RJE stream. `index` counts non-blank messages
/// from zero.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("message {index} is not valid UTF-8")]
    Utf8 {
        index: usize,
        #[source]
        source: FromUtf8Error,
    },
    #[error("message {index}: {source}")]
    Parse {
        index: usize,
        #[source]
        source: ParseError,
    },
}

/// Iterator over the messages of an RJE stream.
///
/// A message that fails to parse yields an error item; iteration continues
/// with the next message.
#[derive(Debug)]
pub struct RjeReader<R> {
    inner: R,
    config: ParserConfig,
    /// Index of the next message, counting only non-empty chunks.
    index: usize,
    done: bool,
}

impl<R: BufRead> RjeReader<R> {
    /// Reader using the default (lenient) parser configuration.
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, ParserConfig::default())
    }

    /// Reader parsing each message with `config`.
    pub fn with_config(inner: R, config: ParserConfig) -> Self {
        Self {
            inner,
            config,
            index: 0,
            done: false,
        }
    }

    /// Next non-blank chunk, without its separator.
    fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let n = self.inner.read_until(SEPARATOR, &mut buf)?;
            if n == 0 {
                return Ok(None);
            }
            if buf.last() == Some(&SEPARATOR) {
                buf.pop();
            }
            if !buf.iter().all(u8::is_ascii_whitespace) {
                return Ok(Some(buf));
            }
        }
    }
}

impl<R: BufRead> Iterator for RjeReader<R> {
    type Item = Result<SwiftMessage, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let chunk = match self.next_chunk() {
            Ok(Some(chunk)) => chunk,
            Ok(None) => {
                self.done = true;
                return None;
            }
            Err(e) => {
                self.done = true;
                return Some(Err(ReadError::Io(e)));
            }
        };
        let index = self.index;
        self.index += 1;

        let text = match String::from_utf8(chunk) {
            Ok(text) => text,
            Err(source) => return Some(Err(ReadError::Utf8 { index, source })),
        };
        debug!(index, len = text.len(), "read RJE message");
        Some(
            parser::parse_with(text.trim(), &self.config)
                .map_err(|source| ReadError::Parse { index, source }),
        )
    }
}

/// Read and parse every message of an RJE stream, stopping at the first
/// error.
pub fn read_all<R: Read>(input: R) -> Result<Vec<SwiftMessage>, ReadError> {
    RjeReader::new(BufReader::new(input)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MessageBuilder;
    use crate::writer;

    fn fin(reference: &str) -> String {
        MessageBuilder::new("BANKBEBB", "BANKDEFF", "320")
            .field("20", reference)
            .build_fin()
    }

    #[test]
    fn test_reads_separated_messages() {
        let data = format!("{}\r\n${}$\r\n", fin("ONE"), fin("TWO"));
        let msgs = read_all(data.as_bytes()).unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].field("20"), Some("ONE"));
        assert_eq!(msgs[1].field("20"), Some("TWO"));
        assert_eq!(writer::write(&msgs[1]), fin("TWO"));
    }

    #[test]
    fn test_blank_chunks_skipped() {
        let data = format!("$\r\n$$ {} $ \n", fin("X"));
        let msgs = read_all(data.as_bytes()).unwrap();
        assert_eq!(msgs.len(), 1);
        assert!(read_all(" \r\n$$".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_error_carries_index_and_iteration_continues() {
        let data = format!("{}${{9:broken${}", fin("A"), fin("C"));
        let items: Vec<_> = RjeReader::new(data.as_bytes()).collect();
        assert_eq!(items.len(), 3);
        assert!(items[0].is_ok());
        assert!(matches!(items[1], Err(ReadError::Parse { index: 1, .. })));
        assert_eq!(items[2].as_ref().unwrap().field("20"), Some("C"));
    }

    #[test]
    fn test_read_all_stops_at_first_error() {
        let data = format!("{}${{4:\r\n:20:X", fin("A"));
        let err = read_all(data.as_bytes()).unwrap_err();
        assert!(err.to_string().starts_with("message 1:"));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut data = fin("A").into_bytes();
        data.extend_from_slice(b"$\xff\xfe");
        let items: Vec<_> = RjeReader::new(&data[..]).collect();
        assert!(matches!(items[1], Err(ReadError::Utf8 { index: 1, .. })));
    }

    #[test]
    fn test_strict_config_applied() {
        let data = format!("{}trailing", fin("A"));
        let lenient: Vec<_> = RjeReader::new(data.as_bytes()).collect();
        assert!(lenient[0].is_ok());
        let strict: Vec<_> =
            RjeReader::with_config(data.as_bytes(), ParserConfig::strict()).collect();
        assert!(strict[0].is_err());
    }
}
