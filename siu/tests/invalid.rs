//! Integration tests for malformed SIU^S12 messages
//!
//! Fatal conditions surface as structured errors naming the kind and the
//! offending segment; they never panic and never yield partial records.

mod common;

use common::minimal_message;
use siu::{parse_message, parse_message_with, ErrorKind, ParseOptions};

use pretty_assertions::assert_eq;

#[test]
fn missing_sch_is_missing_required_segment() {
    let text = "MSH|^~\\&|S|C|E|H|20250502||SIU^S12|M1|P|2.5\r\
                PID|1||P1||Doe^Jane";
    let err = parse_message(text).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MissingRequiredSegment);
    assert_eq!(err.segment.as_deref(), Some("SCH"));
}

#[test]
fn message_without_msh_is_malformed() {
    let err = parse_message("PID|1||P1").unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedHeader);
}

#[test]
fn truncated_encoding_characters_are_malformed() {
    let err = parse_message("MSH|^~\\|S|C\rSCH|1").unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedHeader);
}

#[test]
fn duplicate_delimiter_declaration_is_malformed() {
    let err = parse_message("MSH|^~^&|S|C\rSCH|1").unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedHeader);
}

#[test]
fn non_siu_message_type_is_rejected() {
    let text = "MSH|^~\\&|S|C|E|H|20250502||ADT^A01|M1|P|2.5\r\
                SCH|A1||||||||||^^^20250502130000";
    let err = parse_message(text).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedHeader);
    assert!(err.message.contains("ADT"));
    assert_eq!(err.segment.as_deref(), Some("MSH"));
}

#[test]
fn schedule_without_appointment_id_is_incomplete() {
    let text = "MSH|^~\\&|S|C|E|H|20250502||SIU^S12|M1|P|2.5\r\
                SCH|||||||||||^^^20250502130000";
    let err = parse_message(text).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MissingRequiredSegment);
    assert!(err.message.contains("appointment id"));
}

#[test]
fn schedule_without_start_datetime_is_incomplete() {
    let text = "MSH|^~\\&|S|C|E|H|20250502||SIU^S12|M1|P|2.5\r\
                SCH|A1";
    let err = parse_message(text).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MissingRequiredSegment);
    assert!(err.message.contains("start datetime"));
}

#[test]
fn invalid_segment_code_is_unrecoverable() {
    let text = "MSH|^~\\&|S|C|E|H|20250502||SIU^S12|M1|P|2.5\r\
                bad|1";
    let err = parse_message(text).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnrecoverableTokenization);
}

#[test]
fn no_partial_record_escapes_a_fatal_error() {
    // The PID here is fully valid; the missing SCH must suppress it too.
    let text = "MSH|^~\\&|S|C|E|H|20250502||SIU^S12|M1|P|2.5\r\
                PID|1||P12345||Doe^John||19850210|M\r\
                NTE|1||note";
    assert!(parse_message(text).is_err());
}

#[test]
fn strict_mode_rejects_unmapped_segment_types() {
    let text = format!("{}\rRGS|1|A", minimal_message("M1", "A1"));
    assert!(parse_message(&text).is_ok());

    let options = ParseOptions {
        reject_unmapped_segments: true,
        ..ParseOptions::default()
    };
    let err = parse_message_with(&text, &options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnrecoverableTokenization);
    assert_eq!(err.segment.as_deref(), Some("RGS"));
}

#[test]
fn strict_mode_rejects_unknown_escapes() {
    let text = format!("{}\rNTE|1||odd \\Q\\ escape", minimal_message("M1", "A1"));
    assert!(parse_message(&text).is_ok());

    let options = ParseOptions {
        reject_unknown_escapes: true,
        ..ParseOptions::default()
    };
    let err = parse_message_with(&text, &options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnrecoverableTokenization);
}

#[test]
fn empty_message_is_malformed() {
    let err = parse_message("").unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedHeader);
}
