//! Per-segment mapping into record sections
//!
//! One pure function per supported segment kind. Mappers are defensive the
//! way real-world traffic demands: a missing field is a `None`, a field
//! that fails its expected format costs that one attribute plus a
//! [`WarningKind::FieldFormatWarning`], and nothing here ever aborts the
//! message.

use er7::{Field, Occurrence, RawSegment, Segment, Warning, WarningKind};

use crate::record::{
    CodedValue, Location, MessageHeader, Patient, PersonName, Provider, Schedule, UnmappedSegment,
};
use crate::timestamp::Timestamp;

/// Trimmed, non-empty copy of a leaf value
fn clean(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn field_value(segment: &Segment, number: usize) -> Option<String> {
    segment.field_or_empty(number).value().and_then(clean)
}

fn component_value(segment: &Segment, number: usize, component: usize) -> Option<String> {
    segment
        .field_or_empty(number)
        .component_value(component)
        .and_then(clean)
}

fn parse_timestamp(
    value: Option<String>,
    segment: &str,
    field: usize,
    warnings: &mut Vec<Warning>,
) -> Option<Timestamp> {
    let value = value?;
    match Timestamp::parse(&value) {
        Ok(ts) => Some(ts),
        Err(err) => {
            warnings.push(
                Warning::new(WarningKind::FieldFormatWarning, err.to_string())
                    .in_segment(segment)
                    .in_field(field),
            );
            None
        }
    }
}

fn timestamp_field(
    segment: &Segment,
    number: usize,
    warnings: &mut Vec<Warning>,
) -> Option<Timestamp> {
    parse_timestamp(field_value(segment, number), &segment.id, number, warnings)
}

fn timestamp_component(
    segment: &Segment,
    number: usize,
    component: usize,
    warnings: &mut Vec<Warning>,
) -> Option<Timestamp> {
    parse_timestamp(
        component_value(segment, number, component),
        &segment.id,
        number,
        warnings,
    )
}

/// CWE-style field: first component code, second component text
fn coded_field(segment: &Segment, number: usize) -> Option<CodedValue> {
    let field = segment.field_or_empty(number);
    let code = field.component_value(1).and_then(clean);
    let text = field.component_value(2).and_then(clean);
    (code.is_some() || text.is_some()).then(|| CodedValue { code, text })
}

/// XPN/XCN name components starting at one-based position `start`:
/// family, given, middle, suffix, prefix
fn person_name(occurrence: &Occurrence, start: usize) -> Option<PersonName> {
    let at = |offset: usize| occurrence.component_value(start + offset).and_then(clean);
    let name = PersonName {
        family: at(0),
        given: at(1),
        middle: at(2),
        suffix: at(3),
        prefix: at(4),
    };
    (!name.is_empty()).then_some(name)
}

/// PL-style location field; `location_type` comes from a sibling field
fn location_from(field: &Field, location_type: Option<String>) -> Option<Location> {
    let at = |n: usize| {
        field
            .first()
            .and_then(|occ| occ.component_value(n))
            .and_then(clean)
    };
    let location = Location {
        point_of_care: at(1),
        room: at(2),
        bed: at(3),
        facility: at(4),
        description: at(9),
        location_type,
    };
    (location != Location::default()).then_some(location)
}

pub(crate) fn map_msh(segment: &Segment, warnings: &mut Vec<Warning>) -> MessageHeader {
    MessageHeader {
        sending_application: field_value(segment, 3),
        sending_facility: field_value(segment, 4),
        receiving_application: field_value(segment, 5),
        receiving_facility: field_value(segment, 6),
        message_datetime: timestamp_field(segment, 7, warnings),
        message_type: component_value(segment, 9, 1),
        trigger_event: component_value(segment, 9, 2),
        message_control_id: field_value(segment, 10),
        processing_id: field_value(segment, 11),
        version_id: field_value(segment, 12),
        character_set: field_value(segment, 18),
    }
}

pub(crate) fn map_sch(segment: &Segment, warnings: &mut Vec<Warning>) -> Schedule {
    let placer = component_value(segment, 1, 1);
    let filler = component_value(segment, 2, 1);

    // SCH-9 states the duration directly; older producers only fill the
    // TQ duration component in SCH-11.
    let duration = match field_value(segment, 9) {
        Some(value) => parse_duration(value, segment, 9, warnings),
        None => component_value(segment, 11, 3)
            .and_then(|value| parse_duration(value, segment, 11, warnings)),
    };

    Schedule {
        appointment_id: placer.or_else(|| filler.clone()),
        filler_appointment_id: filler,
        event_reason: coded_field(segment, 6),
        appointment_reason: coded_field(segment, 7),
        appointment_type: coded_field(segment, 8),
        duration,
        duration_units: component_value(segment, 10, 1),
        start_datetime: timestamp_component(segment, 11, 4, warnings),
        end_datetime: timestamp_component(segment, 11, 5, warnings),
    }
}

fn parse_duration(
    value: String,
    segment: &Segment,
    field: usize,
    warnings: &mut Vec<Warning>,
) -> Option<u32> {
    match value.parse() {
        Ok(n) => Some(n),
        Err(_) => {
            warnings.push(
                Warning::new(
                    WarningKind::FieldFormatWarning,
                    format!("duration {value:?} is not numeric"),
                )
                .in_segment(segment.id.as_str())
                .in_field(field),
            );
            None
        }
    }
}

pub(crate) fn map_pid(segment: &Segment, warnings: &mut Vec<Warning>) -> Patient {
    let identifiers = segment
        .field_or_empty(3)
        .occurrences()
        .iter()
        .filter_map(|occ| occ.component_value(1).and_then(clean))
        .collect();

    Patient {
        identifiers,
        name: segment
            .field_or_empty(5)
            .first()
            .and_then(|occ| person_name(occ, 1)),
        birth_date: timestamp_field(segment, 7, warnings),
        sex: field_value(segment, 8),
    }
}

/// PV1 contributes the attending doctor and the assigned location
pub(crate) fn map_pv1(segment: &Segment) -> (Option<Provider>, Option<Location>) {
    let attending = segment.field_or_empty(7).first().and_then(|occ| {
        let id = occ.component_value(1).and_then(clean);
        let name = person_name(occ, 2);
        (id.is_some() || name.is_some()).then(|| Provider {
            role: Some("attending".to_owned()),
            id,
            name,
        })
    });

    let location = location_from(segment.field_or_empty(3), None);
    (attending, location)
}

pub(crate) fn map_aip(segment: &Segment) -> Option<Provider> {
    let role_field = segment.field_or_empty(4);
    let role = role_field
        .component_value(2)
        .and_then(clean)
        .or_else(|| role_field.component_value(1).and_then(clean));

    let resource = segment.field_or_empty(3).first();
    let id = resource
        .and_then(|occ| occ.component_value(1))
        .and_then(clean);
    let name = resource.and_then(|occ| person_name(occ, 2));

    (role.is_some() || id.is_some() || name.is_some()).then(|| Provider { role, id, name })
}

pub(crate) fn map_ail(segment: &Segment) -> Option<Location> {
    let type_field = segment.field_or_empty(4);
    let location_type = type_field
        .component_value(2)
        .and_then(clean)
        .or_else(|| type_field.component_value(1).and_then(clean));

    location_from(segment.field_or_empty(3), location_type)
}

/// NTE-3 free text; repetitions are continuation lines
pub(crate) fn map_nte(segment: &Segment) -> Option<String> {
    let parts: Vec<String> = segment
        .field_or_empty(3)
        .occurrences()
        .iter()
        .filter_map(|occ| occ.component_value(1).and_then(clean))
        .collect();
    (!parts.is_empty()).then(|| parts.join("\n"))
}

pub(crate) fn unmapped_segment(raw: &RawSegment<'_>) -> UnmappedSegment {
    UnmappedSegment {
        id: raw.id.to_owned(),
        fields: raw.fields.iter().map(|&f| f.to_owned()).collect(),
    }
}
