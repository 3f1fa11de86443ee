//! Record assembly: the per-message parse pipeline
//!
//! Delimiter discovery, segment splitting, classification, field decoding,
//! mapping, and final assembly run here in order. Warnings accumulate in
//! one list beside the record; the first fatal condition aborts only this
//! message.

use er7::{decode_fields, Delimiters, ErrorKind, ParseError, Warning, WarningKind};

use crate::record::AppointmentRecord;
use crate::{classify, mappers, Parsed, ParseOptions};

pub(crate) fn parse_single(text: &str, options: &ParseOptions) -> Result<Parsed, ParseError> {
    let delimiters = Delimiters::from_header(text)?;
    let raw = er7::split_segments(text, &delimiters)?;

    let mut warnings = Vec::new();
    let groups = classify::group(raw, &mut warnings)?;

    if options.reject_unmapped_segments {
        if let Some(segment) = groups.unmapped.first() {
            return Err(ParseError::new(
                ErrorKind::UnrecoverableTokenization,
                format!("segment type {} is not in the modeled set", segment.id),
            )
            .in_segment(segment.id));
        }
    }

    let msh = decode_fields(&groups.msh, &delimiters, &mut warnings);
    let message_header = mappers::map_msh(&msh, &mut warnings);
    match message_header.message_type.as_deref() {
        Some("SIU") => {}
        Some(other) => {
            return Err(ParseError::new(
                ErrorKind::MalformedHeader,
                format!("expected message type SIU, got {other}"),
            )
            .in_segment("MSH"));
        }
        None => warnings.push(
            Warning::new(
                WarningKind::FieldFormatWarning,
                "MSH-9 message type missing",
            )
            .in_segment("MSH")
            .in_field(9),
        ),
    }

    let sch = decode_fields(&groups.sch, &delimiters, &mut warnings);
    let schedule = mappers::map_sch(&sch, &mut warnings);

    let patient = groups.pid.as_ref().map(|seg| {
        let decoded = decode_fields(seg, &delimiters, &mut warnings);
        mappers::map_pid(&decoded, &mut warnings)
    });

    let mut providers = Vec::new();
    let mut locations = Vec::new();
    if let Some(seg) = groups.pv1.as_ref() {
        let decoded = decode_fields(seg, &delimiters, &mut warnings);
        let (attending, assigned) = mappers::map_pv1(&decoded);
        providers.extend(attending);
        locations.extend(assigned);
    }
    for seg in &groups.aip {
        let decoded = decode_fields(seg, &delimiters, &mut warnings);
        providers.extend(mappers::map_aip(&decoded));
    }
    for seg in &groups.ail {
        let decoded = decode_fields(seg, &delimiters, &mut warnings);
        locations.extend(mappers::map_ail(&decoded));
    }

    let notes: Vec<String> = groups
        .nte
        .iter()
        .filter_map(|seg| {
            let decoded = decode_fields(seg, &delimiters, &mut warnings);
            mappers::map_nte(&decoded)
        })
        .collect();

    let unmapped_segments = groups.unmapped.iter().map(mappers::unmapped_segment).collect();

    if options.reject_unknown_escapes {
        if let Some(warning) = warnings.iter().find(|w| {
            matches!(
                w.kind,
                WarningKind::UnknownEscapeSequence | WarningKind::UnterminatedEscape
            )
        }) {
            let mut err =
                ParseError::new(ErrorKind::UnrecoverableTokenization, warning.message.clone());
            if let Some(segment) = &warning.segment {
                err = err.in_segment(segment.clone());
            }
            return Err(err);
        }
    }

    // The schedule section must be usable, not merely present.
    if schedule.appointment_id.is_none() {
        return Err(ParseError::new(
            ErrorKind::MissingRequiredSegment,
            "schedule has no appointment id",
        )
        .in_segment("SCH"));
    }
    if schedule.start_datetime.is_none() {
        return Err(ParseError::new(
            ErrorKind::MissingRequiredSegment,
            "schedule has no start datetime",
        )
        .in_segment("SCH"));
    }

    Ok(Parsed {
        record: AppointmentRecord {
            message_header,
            schedule,
            patient,
            providers,
            locations,
            notes,
            unmapped_segments,
        },
        warnings,
    })
}
