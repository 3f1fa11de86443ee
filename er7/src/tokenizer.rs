//! Segment, field, repetition, component, and subcomponent tokenization
//!
//! Tokenization is two-phase. [`split_segments`] cuts a message into
//! [`RawSegment`]s (borrowed slices, id validated, fields unsplit), which
//! the caller classifies by type code. [`decode_fields`] then turns one raw
//! segment into a [`Segment`] of decoded [`Field`] trees, applying the
//! escape decoder to every leaf. Raw segments are not retained once decoded.

use crate::delimiters::Delimiters;
use crate::error::{ErrorKind, ParseError, Warning, WarningKind};
use crate::escape::{self, EscapeIssue};

/// The ER7 explicit-null value: a field stated to be empty, as opposed to
/// one that was simply not populated
const EXPLICIT_NULL: &str = "\"\"";

/// Segment split from a message but not yet decoded
///
/// Produced by [`split_segments`], consumed by classification and
/// [`decode_fields`]. For `MSH` the first raw field is the MSH-2 encoding
/// characters (the field separator itself is MSH-1 and has no slice).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSegment<'a> {
    /// Three-character segment type code
    pub id: &'a str,
    /// Raw field strings in order, exclusive of the type code
    pub fields: Vec<&'a str>,
}

/// One decoded component: an atomic value or ordered subcomponents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    Value(String),
    Subcomponents(Vec<String>),
}

impl Component {
    /// The atomic value, if this component has no subcomponent structure
    pub fn as_value(&self) -> Option<&str> {
        match self {
            Self::Value(v) => Some(v),
            Self::Subcomponents(_) => None,
        }
    }

    /// Primary string: the value itself, or the first subcomponent
    pub fn primary(&self) -> &str {
        match self {
            Self::Value(v) => v,
            Self::Subcomponents(subs) => subs.first().map(String::as_str).unwrap_or(""),
        }
    }

    /// Subcomponent by one-based position
    pub fn subcomponent(&self, n: usize) -> Option<&str> {
        match self {
            Self::Value(v) if n == 1 => Some(v),
            Self::Value(_) => None,
            Self::Subcomponents(subs) => subs.get(n.checked_sub(1)?).map(String::as_str),
        }
    }
}

/// One occurrence of a field (between repetition separators)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub components: Vec<Component>,
}

impl Occurrence {
    /// Component by one-based position
    pub fn component(&self, n: usize) -> Option<&Component> {
        self.components.get(n.checked_sub(1)?)
    }

    /// Primary string of the component at one-based position `n`
    pub fn component_value(&self, n: usize) -> Option<&str> {
        self.component(n).map(Component::primary)
    }
}

/// A decoded field: absent, one occurrence, or ordered repetitions
///
/// `Empty` is a field whose raw text was entirely empty. A field populated
/// with the explicit-null `""` decodes to a single empty component instead,
/// so the two are distinguishable in the tree even though both render as
/// null in the default output mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Empty,
    Single(Occurrence),
    Repeated(Vec<Occurrence>),
}

impl Field {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// First (or only) occurrence
    pub fn first(&self) -> Option<&Occurrence> {
        self.occurrences().first()
    }

    /// All occurrences in input order
    pub fn occurrences(&self) -> &[Occurrence] {
        match self {
            Self::Empty => &[],
            Self::Single(occ) => core::slice::from_ref(occ),
            Self::Repeated(occs) => occs,
        }
    }

    /// Primary string of the first occurrence's first component
    pub fn value(&self) -> Option<&str> {
        self.first().and_then(|occ| occ.component_value(1))
    }

    /// Component of the first occurrence by one-based position
    pub fn component(&self, n: usize) -> Option<&Component> {
        self.first().and_then(|occ| occ.component(n))
    }

    /// Primary string of the first occurrence's component `n` (one-based)
    pub fn component_value(&self, n: usize) -> Option<&str> {
        self.first().and_then(|occ| occ.component_value(n))
    }
}

static EMPTY_FIELD: Field = Field::Empty;

/// A fully decoded segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Three-character segment type code
    pub id: String,
    /// Decoded fields; `fields[i]` holds field number `i + 1`
    pub fields: Vec<Field>,
}

impl Segment {
    /// Field by HL7 number: `field(1)` is SEG-1. For `MSH` the numbering is
    /// the standard one, where MSH-1 is the field separator itself and
    /// MSH-2 the raw encoding characters.
    pub fn field(&self, n: usize) -> Option<&Field> {
        self.fields.get(n.checked_sub(1)?)
    }

    /// Like [`Segment::field`] but yielding `Field::Empty` past the end
    pub fn field_or_empty(&self, n: usize) -> &Field {
        self.field(n).unwrap_or(&EMPTY_FIELD)
    }
}

/// Split one message into raw segments
///
/// Segments end at a carriage return; a bare linefeed is also accepted to
/// tolerate non-conformant producers, and empty trailing segments are
/// discarded silently.
///
/// # Errors
///
/// `UnrecoverableTokenization` if a segment's type code is not exactly
/// three uppercase ASCII letters or digits.
pub fn split_segments<'a>(
    text: &'a str,
    delimiters: &Delimiters,
) -> Result<Vec<RawSegment<'a>>, ParseError> {
    let mut segments = Vec::new();

    for line in text.split(['\r', '\n']) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let id_end = line.find(delimiters.field).unwrap_or(line.len());
        let id = &line[..id_end];
        if id.len() != 3
            || !id
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return Err(ParseError::new(
                ErrorKind::UnrecoverableTokenization,
                format!("invalid segment type code {id:?}"),
            ));
        }

        let fields = if id_end < line.len() {
            line[id_end + delimiters.field.len_utf8()..]
                .split(delimiters.field)
                .collect()
        } else {
            Vec::new()
        };

        segments.push(RawSegment { id, fields });
    }

    Ok(segments)
}

/// Decode a raw segment into its field trees
///
/// Every leaf string goes through the escape decoder; escape diagnostics
/// are appended to `warnings` with segment and field location attached.
/// MSH-1 and MSH-2 are reconstructed, never split or unescaped — they
/// contain the delimiter characters themselves.
pub fn decode_fields(
    raw: &RawSegment<'_>,
    delimiters: &Delimiters,
    warnings: &mut Vec<Warning>,
) -> Segment {
    let mut fields = Vec::with_capacity(raw.fields.len() + 2);

    let body = if raw.id == "MSH" {
        fields.push(literal_field(delimiters.field.to_string()));
        if let Some(&encoding) = raw.fields.first() {
            fields.push(literal_field(encoding.to_owned()));
        }
        &raw.fields[raw.fields.len().min(1)..]
    } else {
        &raw.fields[..]
    };

    for &raw_field in body {
        let number = fields.len() + 1;
        fields.push(decode_field(raw_field, delimiters, raw.id, number, warnings));
    }

    Segment {
        id: raw.id.to_owned(),
        fields,
    }
}

/// A field holding one verbatim value, used for MSH-1/MSH-2
fn literal_field(value: String) -> Field {
    Field::Single(Occurrence {
        components: vec![Component::Value(value)],
    })
}

fn decode_field(
    raw: &str,
    delimiters: &Delimiters,
    segment: &str,
    number: usize,
    warnings: &mut Vec<Warning>,
) -> Field {
    if raw.is_empty() {
        return Field::Empty;
    }

    // Escape sequences come in pairs; an odd count means one never closed.
    // The whole field is then kept unedited rather than mis-split.
    if raw.matches(delimiters.escape).count() % 2 == 1 {
        warnings.push(
            Warning::new(
                WarningKind::UnterminatedEscape,
                "unterminated escape sequence, field text retained unedited",
            )
            .in_segment(segment)
            .in_field(number),
        );
        return literal_field(raw.to_owned());
    }

    let mut occurrences: Vec<Occurrence> = raw
        .split(delimiters.repetition)
        .map(|occ| decode_occurrence(occ, delimiters, segment, number, warnings))
        .collect();

    if occurrences.len() == 1 {
        match occurrences.pop() {
            Some(occ) => Field::Single(occ),
            None => Field::Empty,
        }
    } else {
        Field::Repeated(occurrences)
    }
}

fn decode_occurrence(
    raw: &str,
    delimiters: &Delimiters,
    segment: &str,
    number: usize,
    warnings: &mut Vec<Warning>,
) -> Occurrence {
    let components = raw
        .split(delimiters.component)
        .map(|c| decode_component(c, delimiters, segment, number, warnings))
        .collect();
    Occurrence { components }
}

fn decode_component(
    raw: &str,
    delimiters: &Delimiters,
    segment: &str,
    number: usize,
    warnings: &mut Vec<Warning>,
) -> Component {
    if raw.contains(delimiters.subcomponent) {
        Component::Subcomponents(
            raw.split(delimiters.subcomponent)
                .map(|s| decode_leaf(s, delimiters, segment, number, warnings))
                .collect(),
        )
    } else {
        Component::Value(decode_leaf(raw, delimiters, segment, number, warnings))
    }
}

fn decode_leaf(
    raw: &str,
    delimiters: &Delimiters,
    segment: &str,
    number: usize,
    warnings: &mut Vec<Warning>,
) -> String {
    if raw == EXPLICIT_NULL {
        return String::new();
    }

    let (decoded, issues) = escape::decode(raw, delimiters);
    for issue in issues {
        let warning = match issue {
            EscapeIssue::Unknown { sequence } => Warning::new(
                WarningKind::UnknownEscapeSequence,
                format!("{sequence} passed through unchanged"),
            ),
            EscapeIssue::Unterminated => Warning::new(
                WarningKind::UnterminatedEscape,
                "unterminated escape sequence, text retained unedited",
            ),
        };
        warnings.push(warning.in_segment(segment).in_field(number));
    }
    decoded
}
