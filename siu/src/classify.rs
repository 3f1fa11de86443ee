//! Segment classification and grouping
//!
//! Every raw segment is classified into a closed set of kinds and grouped
//! with input order preserved per type. Unknown types are never dropped:
//! they land in the unmapped bucket with a warning so downstream consumers
//! are not silently starved of data.

use er7::{ErrorKind, ParseError, RawSegment, Warning, WarningKind};

/// The modeled SIU^S12 segment set plus a catch-all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Message header
    Msh,
    /// Schedule activity (required)
    Sch,
    /// Patient identification
    Pid,
    /// Patient visit
    Pv1,
    /// Appointment information, personnel resource
    Aip,
    /// Appointment information, location resource
    Ail,
    /// Notes and comments
    Nte,
    /// Anything else
    Unmapped,
}

impl SegmentKind {
    pub fn classify(id: &str) -> Self {
        match id {
            "MSH" => Self::Msh,
            "SCH" => Self::Sch,
            "PID" => Self::Pid,
            "PV1" => Self::Pv1,
            "AIP" => Self::Aip,
            "AIL" => Self::Ail,
            "NTE" => Self::Nte,
            _ => Self::Unmapped,
        }
    }
}

/// Raw segments grouped by kind, input order preserved within each group
#[derive(Debug)]
pub struct SegmentGroups<'a> {
    pub msh: RawSegment<'a>,
    pub sch: RawSegment<'a>,
    pub pid: Option<RawSegment<'a>>,
    pub pv1: Option<RawSegment<'a>>,
    pub aip: Vec<RawSegment<'a>>,
    pub ail: Vec<RawSegment<'a>>,
    pub nte: Vec<RawSegment<'a>>,
    pub unmapped: Vec<RawSegment<'a>>,
}

/// Group a message's raw segments by type
///
/// The header segment must come first; SCH must be present. Extra
/// occurrences of singleton segments are ignored with a warning — only the
/// absence of SCH is fatal.
pub fn group<'a>(
    segments: Vec<RawSegment<'a>>,
    warnings: &mut Vec<Warning>,
) -> Result<SegmentGroups<'a>, ParseError> {
    match segments.first() {
        Some(first) if first.id == "MSH" => {}
        Some(first) => {
            return Err(ParseError::new(
                ErrorKind::MalformedHeader,
                format!("first segment is {}, expected MSH", first.id),
            )
            .in_segment(first.id))
        }
        None => {
            return Err(ParseError::new(
                ErrorKind::MalformedHeader,
                "message has no segments",
            ))
        }
    }

    let mut msh = None;
    let mut sch = None;
    let mut pid = None;
    let mut pv1 = None;
    let mut aip = Vec::new();
    let mut ail = Vec::new();
    let mut nte = Vec::new();
    let mut unmapped = Vec::new();

    for segment in segments {
        match SegmentKind::classify(segment.id) {
            SegmentKind::Msh => keep_first(&mut msh, segment, warnings),
            SegmentKind::Sch => keep_first(&mut sch, segment, warnings),
            SegmentKind::Pid => keep_first(&mut pid, segment, warnings),
            SegmentKind::Pv1 => keep_first(&mut pv1, segment, warnings),
            SegmentKind::Aip => aip.push(segment),
            SegmentKind::Ail => ail.push(segment),
            SegmentKind::Nte => nte.push(segment),
            SegmentKind::Unmapped => {
                warnings.push(
                    Warning::new(
                        WarningKind::UnmappedSegmentType,
                        format!("segment type {} preserved in unmapped bucket", segment.id),
                    )
                    .in_segment(segment.id),
                );
                unmapped.push(segment);
            }
        }
    }

    // First-segment check above guarantees msh is present.
    let msh = msh.ok_or_else(|| {
        ParseError::new(ErrorKind::MalformedHeader, "message has no MSH segment")
    })?;
    let sch = sch.ok_or_else(|| {
        ParseError::new(
            ErrorKind::MissingRequiredSegment,
            "SIU message has no SCH segment",
        )
        .in_segment("SCH")
    })?;

    Ok(SegmentGroups {
        msh,
        sch,
        pid,
        pv1,
        aip,
        ail,
        nte,
        unmapped,
    })
}

fn keep_first<'a>(
    slot: &mut Option<RawSegment<'a>>,
    segment: RawSegment<'a>,
    warnings: &mut Vec<Warning>,
) {
    if slot.is_none() {
        *slot = Some(segment);
    } else {
        warnings.push(
            Warning::new(
                WarningKind::FieldFormatWarning,
                format!("duplicate {} segment ignored", segment.id),
            )
            .in_segment(segment.id),
        );
    }
}
