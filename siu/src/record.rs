//! The normalized appointment record
//!
//! Output shape for one SIU^S12 message. Sections mirror the segments they
//! come from; every attribute a segment did not populate is `None`, never
//! fabricated. The whole tree serializes to JSON: absent optional sections
//! are dropped, empty fields become null, repeated groups become arrays in
//! occurrence order.

use serde::Serialize;

use crate::timestamp::Timestamp;

/// Routing metadata from the MSH segment
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MessageHeader {
    pub sending_application: Option<String>,
    pub sending_facility: Option<String>,
    pub receiving_application: Option<String>,
    pub receiving_facility: Option<String>,
    pub message_datetime: Option<Timestamp>,
    pub message_type: Option<String>,
    pub trigger_event: Option<String>,
    pub message_control_id: Option<String>,
    pub processing_id: Option<String>,
    pub version_id: Option<String>,
    pub character_set: Option<String>,
}

/// A coded field: identifier plus human-readable text
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CodedValue {
    pub code: Option<String>,
    pub text: Option<String>,
}

/// Appointment timing and identity from the SCH segment
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schedule {
    pub appointment_id: Option<String>,
    pub filler_appointment_id: Option<String>,
    pub event_reason: Option<CodedValue>,
    pub appointment_reason: Option<CodedValue>,
    pub appointment_type: Option<CodedValue>,
    pub duration: Option<u32>,
    pub duration_units: Option<String>,
    pub start_datetime: Option<Timestamp>,
    pub end_datetime: Option<Timestamp>,
}

/// Structured person name (XPN/XCN component order)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PersonName {
    pub family: Option<String>,
    pub given: Option<String>,
    pub middle: Option<String>,
    pub suffix: Option<String>,
    pub prefix: Option<String>,
}

impl PersonName {
    pub fn is_empty(&self) -> bool {
        self.family.is_none()
            && self.given.is_none()
            && self.middle.is_none()
            && self.suffix.is_none()
            && self.prefix.is_none()
    }

    /// Display-order rendering: prefix given middle family suffix
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.prefix, &self.given, &self.middle, &self.family, &self.suffix]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Patient demographics from the PID segment
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Patient {
    pub identifiers: Vec<String>,
    pub name: Option<PersonName>,
    pub birth_date: Option<Timestamp>,
    pub sex: Option<String>,
}

/// One scheduled participant (PV1 attending or AIP resource)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Provider {
    pub role: Option<String>,
    pub id: Option<String>,
    pub name: Option<PersonName>,
}

/// One appointment location (PV1 assigned location or AIL resource)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Location {
    pub point_of_care: Option<String>,
    pub room: Option<String>,
    pub bed: Option<String>,
    pub facility: Option<String>,
    pub description: Option<String>,
    pub location_type: Option<String>,
}

/// A segment outside the modeled set, preserved verbatim
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnmappedSegment {
    /// Segment type code
    pub id: String,
    /// Raw field strings as received, escape sequences intact
    pub fields: Vec<String>,
}

/// The assembled appointment record for one message
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppointmentRecord {
    pub message_header: MessageHeader,
    pub schedule: Schedule,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<Patient>,
    pub providers: Vec<Provider>,
    pub locations: Vec<Location>,
    pub notes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unmapped_segments: Vec<UnmappedSegment>,
}
