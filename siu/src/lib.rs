//! SIU^S12 Appointment Extraction
//!
//! Turns HL7 v2.x SIU^S12 appointment-notification messages into normalized
//! [`AppointmentRecord`]s. The [`er7`] crate handles the encoding; this
//! crate knows what the segments mean: classification, per-segment mapping,
//! timestamp normalization, and record assembly.
//!
//! # Design Philosophy
//! - Lenient by default: real-world feeds carry vendor deviations, so
//!   unknown segment types and escape mnemonics become warnings beside the
//!   record, not failures — [`ParseOptions`] makes stricter policies an
//!   explicit caller choice
//! - Isolated: one malformed message in a batch never disturbs its
//!   siblings; each outcome stands alone in input order
//! - Explicit: every fatal condition is a structured [`ParseError`] naming
//!   the error kind, the offending segment, and the batch position
//!
//! # Usage
//! ```
//! let text = "MSH|^~\\&|SCHED|CLINIC|EHR|HOSP|20250502090000||SIU^S12|MSG001|P|2.5\r\
//!             SCH|123456||||||^Checkup||||^^^20250502130000\r\
//!             PID|1||P12345||Doe^John||19850210|M";
//!
//! let parsed = siu::parse_message(text)?;
//! assert_eq!(parsed.record.schedule.appointment_id.as_deref(), Some("123456"));
//! assert_eq!(
//!     parsed.record.schedule.start_datetime.as_ref().unwrap().iso(),
//!     "2025-05-02T13:00:00"
//! );
//! # Ok::<(), siu::ParseError>(())
//! ```

mod assemble;
pub mod classify;
mod mappers;
pub mod record;
pub mod timestamp;

pub use er7::{Delimiters, ErrorKind, ParseError, Warning, WarningKind};
pub use record::{
    AppointmentRecord, CodedValue, Location, MessageHeader, Patient, PersonName, Provider,
    Schedule, UnmappedSegment,
};
pub use timestamp::{Precision, Timestamp, TimestampError};

/// Leniency policy for real-world producer deviations
///
/// The default tolerates deviations via the warning paths. Each flag
/// escalates one class of deviation to a fatal error for callers that
/// want strict feeds rejected outright.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Fail the message instead of bucketing segment types outside the
    /// modeled set
    pub reject_unmapped_segments: bool,
    /// Fail the message instead of warning on unknown or unterminated
    /// escape sequences
    pub reject_unknown_escapes: bool,
}

/// A successfully parsed message: the record plus its warning side channel
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub record: AppointmentRecord,
    /// Non-fatal diagnostics accumulated during the parse, in occurrence order
    pub warnings: Vec<Warning>,
}

/// Parse a single SIU^S12 message
pub fn parse_message(text: &str) -> Result<Parsed, ParseError> {
    assemble::parse_single(text, &ParseOptions::default())
}

/// Parse a single message under an explicit leniency policy
pub fn parse_message_with(text: &str, options: &ParseOptions) -> Result<Parsed, ParseError> {
    assemble::parse_single(text, options)
}

/// Parse concatenated messages, one outcome per message in input order
///
/// Each message is parsed independently; a fatal error in one yields an
/// `Err` at its position without affecting the others.
pub fn parse_batch(text: &str) -> Vec<Result<Parsed, ParseError>> {
    parse_batch_with(text, &ParseOptions::default())
}

/// Batch parse under an explicit leniency policy
pub fn parse_batch_with(text: &str, options: &ParseOptions) -> Vec<Result<Parsed, ParseError>> {
    er7::split_messages(text)
        .iter()
        .enumerate()
        .map(|(index, message)| {
            assemble::parse_single(message, options).map_err(|err| err.at_index(index))
        })
        .collect()
}
