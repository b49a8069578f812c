/*
    ALICE-SWIFT
    Copyright (C) 2026 Moroya Sakamoto
*/

//! # ALICE-SWIFT
//!
//! SWIFT MT (FIN) message parser, writer, builder, sequence slicing and
//! validation for the ALICE financial system.
//!
//! ## Modules
//!
//! - [`tag`]      — [`Tag`] and well-known field / header tag names
//! - [`block`]    — Header blocks 1 and 2, [`TagList`], user blocks
//! - [`sequence`] — Slicing a body into `15X` sequences and delimited subsequences
//! - [`message`]  — [`SwiftMessage`] (blocks 1-5, JSON export)
//! - [`parser`]   — FIN text parser (lenient or strict)
//! - [`writer`]   — FIN text writer
//! - [`builder`]  — [`MessageBuilder`] for outgoing messages
//! - [`reader`]   — `$`-separated RJE streams
//! - [`convert`]  — Dates, amounts, BICs and code words
//! - [`layout`]   — Sequence layouts of MT320, MT360 and MT361 as data
//! - [`mt`]       — [`MtView`] and typed wrappers over message bodies
//! - [`validate`] — Structural and layout validation
//! - [`config`]   — Parser / writer configuration
//!
//! ## Example
//!
//! ```rust
//! use alice_swift::{mt::Mt320, parser, validate, MessageBuilder};
//!
//! let fin = MessageBuilder::new("BANKBEBB", "BANKDEFF", "320")
//!     .sequence("A")
//!     .field("20", "DEAL-1")
//!     .sequence("B")
//!     .field("32B", "EUR1000000,")
//!     .build_fin();
//!
//! let msg = parser::parse(&fin).unwrap();
//! assert_eq!(msg.message_type(), Some("320"));
//!
//! let mt = Mt320::new(&msg).unwrap();
//! assert_eq!(mt.sequence("B").unwrap().field("32B"), Some("EUR1000000,"));
//!
//! // Mandatory fields and settlement sequences are missing.
//! assert!(!validate::validate(&msg).is_empty());
//! ```

pub mod block;
pub mod builder;
pub mod config;
pub mod convert;
pub mod layout;
pub mod message;
pub mod mt;
pub mod parser;
pub mod reader;
pub mod sequence;
pub mod tag;
pub mod validate;
pub mod writer;

// Re-export the most commonly used types at the crate root.
pub use block::TagList;
pub use builder::MessageBuilder;
pub use config::{Config, ParserConfig, WriterConfig};
pub use message::SwiftMessage;
pub use mt::{Mt320, Mt360, Mt361, MtView};
pub use parser::ParseError;
pub use reader::{ReadError, RjeReader};
pub use tag::Tag;
pub use validate::{validate, ValidationProblem};

/// ALICE-SWIFT crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
