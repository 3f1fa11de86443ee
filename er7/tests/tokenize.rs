//! Integration tests for full-message tokenization
//!
//! These tests run the whole encoding layer end to end: delimiter
//! extraction from MSH, segment splitting, and field-tree decoding with
//! escape handling.

use er7::{
    decode_fields, escape, split_messages, split_segments, Component, Delimiters, ErrorKind,
    Field, Occurrence, Warning, WarningKind,
};

use pretty_assertions::assert_eq;

fn decode_message(text: &str) -> (Vec<er7::Segment>, Vec<Warning>) {
    let delimiters = Delimiters::from_header(text).expect("valid header");
    let raw = split_segments(text, &delimiters).expect("tokenizable message");
    let mut warnings = Vec::new();
    let segments = raw
        .iter()
        .map(|seg| decode_fields(seg, &delimiters, &mut warnings))
        .collect();
    (segments, warnings)
}

#[test]
fn tokenizes_a_realistic_siu_message() {
    let text = "MSH|^~\\&|SCHED_SYS|CLINIC_A|EHR_SYS|HOSPITAL|20250502090000||SIU^S12|MSG001|P|2.5\r\
                SCH|1234^^PLACER|5678^^FILLER||||ROUTINE^Routine checkup||CHECKUP^Checkup|30|m|^^30^20250502130000^20250502133000\r\
                PID|1||P12345||Doe^John^^^Mr.||19850210|M\r\
                NTE|1||Patient prefers morning slots";

    let (segments, warnings) = decode_message(text);
    assert!(warnings.is_empty());
    assert_eq!(segments.len(), 4);

    let msh = &segments[0];
    assert_eq!(msh.id, "MSH");
    assert_eq!(msh.field(1).unwrap().value(), Some("|"));
    assert_eq!(msh.field(2).unwrap().value(), Some("^~\\&"));
    assert_eq!(msh.field(4).unwrap().value(), Some("CLINIC_A"));
    assert_eq!(msh.field(10).unwrap().value(), Some("MSG001"));

    let sch = &segments[1];
    assert_eq!(sch.field(1).unwrap().component_value(1), Some("1234"));
    assert_eq!(sch.field(1).unwrap().component_value(3), Some("PLACER"));
    assert_eq!(sch.field(11).unwrap().component_value(4), Some("20250502130000"));

    let pid = &segments[2];
    assert_eq!(pid.field(5).unwrap().component_value(1), Some("Doe"));
    assert_eq!(pid.field(5).unwrap().component_value(2), Some("John"));

    assert_eq!(
        segments[3].field(3).unwrap().value(),
        Some("Patient prefers morning slots")
    );
}

#[test]
fn honors_nonstandard_delimiters_per_message() {
    // Same logical content, declared with a different delimiter table.
    let text = "MSH#!@$%#SND#FAC#####SIU!S12\rSCH#1!x!PLACER";
    let (segments, warnings) = decode_message(text);
    assert!(warnings.is_empty());

    assert_eq!(segments[0].field(9).unwrap().component_value(1), Some("SIU"));
    assert_eq!(segments[1].field(1).unwrap().component_value(1), Some("1"));
    assert_eq!(segments[1].field(1).unwrap().component_value(3), Some("PLACER"));
}

#[test]
fn distinguishes_absent_field_from_explicit_null() {
    let text = "MSH|^~\\&|SND\rPID|1||\"\"|";
    let (segments, _) = decode_message(text);
    let pid = &segments[1];

    assert_eq!(pid.field(2), Some(&Field::Empty));
    assert_eq!(
        pid.field(3),
        Some(&Field::Single(Occurrence {
            components: vec![Component::Value(String::new())]
        }))
    );
    assert_ne!(pid.field(2), pid.field(3));
}

#[test]
fn repeated_fields_preserve_occurrence_order() {
    let text = "MSH|^~\\&|SND\rPID|1||MRN1^^^HOSP~MRN2^^^CLINIC~MRN3";
    let (segments, _) = decode_message(text);

    let ids: Vec<_> = segments[1]
        .field(3)
        .unwrap()
        .occurrences()
        .iter()
        .filter_map(|occ| occ.component_value(1))
        .collect();
    assert_eq!(ids, vec!["MRN1", "MRN2", "MRN3"]);
}

#[test]
fn escaped_separators_decode_instead_of_splitting() {
    let text = "MSH|^~\\&|SND\rNTE|1||BP was 120\\S\\80 \\T\\ stable \\R\\ ok \\F\\ done";
    let (segments, warnings) = decode_message(text);
    assert!(warnings.is_empty());

    let note = segments[1].field(3).unwrap();
    // One occurrence, one component: the separators were content, not structure.
    assert_eq!(note.occurrences().len(), 1);
    assert_eq!(note.value(), Some("BP was 120^80 & stable ~ ok | done"));
}

#[test]
fn decoded_leaves_reencode_to_the_original_escaped_text() {
    let delimiters = Delimiters::default();
    let escaped = "120\\S\\80 \\T\\ stable \\R\\ ok \\F\\ done \\E\\ end";
    let (decoded, issues) = escape::decode(escaped, &delimiters);
    assert!(issues.is_empty());
    assert_eq!(escape::encode(&decoded, &delimiters), escaped);
}

#[test]
fn unknown_escape_and_unterminated_escape_are_nonfatal() {
    let text = "MSH|^~\\&|SND\rNTE|1||ok \\Q\\ here\rNTE|2||broken \\escape";
    let (segments, warnings) = decode_message(text);

    assert_eq!(segments.len(), 3);
    assert_eq!(warnings.len(), 2);
    assert_eq!(warnings[0].kind, WarningKind::UnknownEscapeSequence);
    assert_eq!(warnings[1].kind, WarningKind::UnterminatedEscape);
    // The unterminated field keeps its raw text.
    assert_eq!(segments[2].field(3).unwrap().value(), Some("broken \\escape"));
}

#[test]
fn invalid_segment_code_is_unrecoverable() {
    let delimiters = Delimiters::default();
    let err = split_segments("MSH|^~\\&|SND\rBAD_ID|1", &delimiters).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnrecoverableTokenization);
}

#[test]
fn batch_split_then_tokenize_each_message() {
    let input = "MSH|^~\\&|A||||20250502||SIU^S12|M1\rSCH|1\r\
                 MSH|^~\\&|B||||20250502||SIU^S12|M2\rSCH|2";
    let messages = split_messages(input);
    assert_eq!(messages.len(), 2);

    for (text, expected) in messages.iter().zip(["1", "2"]) {
        let (segments, _) = decode_message(text);
        assert_eq!(segments[1].field(1).unwrap().value(), Some(expected));
    }
}
