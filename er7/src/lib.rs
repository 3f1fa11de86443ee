//! HL7 v2.x ER7 Tokenizer
//!
//! The encoding layer for pipe-delimited HL7 v2.x messages: delimiter
//! discovery, escape decoding, segment/field/repetition/component/
//! subcomponent tokenization, and batch splitting. Domain knowledge about
//! particular segment types lives upstream; this crate only knows how ER7
//! text is shaped.
//!
//! # Design Philosophy
//! - Self-describing: delimiters come from each message's own MSH segment
//!   and are threaded through every call as an explicit value
//! - Forgiving: real-world traffic is inconsistently populated, so malformed
//!   optional content is reported as accumulated warnings, never a panic
//! - Pure: no I/O, no shared mutable state; each message's parse owns its
//!   own delimiter table and intermediate trees
//!
//! # Usage
//! ```
//! use er7::{split_segments, decode_fields, Delimiters};
//!
//! let text = "MSH|^~\\&|SND|FAC\rNTE|1||see \\F\\ for details";
//! let delimiters = Delimiters::from_header(text)?;
//! let raw = split_segments(text, &delimiters)?;
//! let mut warnings = Vec::new();
//! let nte = decode_fields(&raw[1], &delimiters, &mut warnings);
//! assert_eq!(nte.field(3).unwrap().value(), Some("see | for details"));
//! # Ok::<(), er7::ParseError>(())
//! ```

pub mod batch;
pub mod delimiters;
pub mod error;
pub mod escape;
pub mod tokenizer;

pub use batch::split_messages;
pub use delimiters::Delimiters;
pub use error::{ErrorKind, ParseError, Warning, WarningKind};
pub use escape::EscapeIssue;
pub use tokenizer::{decode_fields, split_segments, Component, Field, Occurrence, RawSegment, Segment};
