use core::fmt;

/// Fatal parse failure kinds
///
/// A fatal error aborts the current message only; sibling messages in a
/// batch are unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// MSH segment missing, truncated, or declaring unusable delimiters
    MalformedHeader,
    /// A segment the message cannot be assembled without is absent
    MissingRequiredSegment,
    /// Segment structure that cannot be tokenized under the declared delimiters
    UnrecoverableTokenization,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedHeader => write!(f, "malformed header"),
            Self::MissingRequiredSegment => write!(f, "missing required segment"),
            Self::UnrecoverableTokenization => write!(f, "unrecoverable tokenization"),
        }
    }
}

/// Fatal parse error with full context
///
/// Identifies the error kind, the offending segment (if known), and the
/// message's position in the batch (set by the batch driver, absent for
/// single-message parses).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", self.render())]
pub struct ParseError {
    /// Error kind
    pub kind: ErrorKind,
    /// Segment type code where the error occurred, if known
    pub segment: Option<String>,
    /// Zero-based message position in the batch, if parsed as part of one
    pub index: Option<usize>,
    /// Human-readable reason
    pub message: String,
}

impl ParseError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            segment: None,
            index: None,
            message: message.into(),
        }
    }

    /// Attach the offending segment's type code
    pub fn in_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    /// Attach the message's position in the batch
    pub fn at_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    fn render(&self) -> String {
        let mut out = format!("{}: {}", self.kind, self.message);
        if let Some(segment) = &self.segment {
            out.push_str(&format!(" (segment {segment})"));
        }
        if let Some(index) = self.index {
            out.push_str(&format!(" (message {index})"));
        }
        out
    }
}

/// Non-fatal warning kinds
///
/// Warnings are accumulated while parsing continues and ride beside the
/// produced record, never inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Escape sequence with an unrecognized mnemonic, passed through unchanged
    UnknownEscapeSequence,
    /// Escape character with no closing escape before the field boundary
    UnterminatedEscape,
    /// Field present but not in the expected format; attribute left null
    FieldFormatWarning,
    /// Segment type outside the modeled set, preserved in the unmapped bucket
    UnmappedSegmentType,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownEscapeSequence => write!(f, "unknown escape sequence"),
            Self::UnterminatedEscape => write!(f, "unterminated escape"),
            Self::FieldFormatWarning => write!(f, "field format"),
            Self::UnmappedSegmentType => write!(f, "unmapped segment type"),
        }
    }
}

/// Non-fatal diagnostic tied to a location in the message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Warning kind
    pub kind: WarningKind,
    /// Segment type code the warning occurred in, if known
    pub segment: Option<String>,
    /// One-based field number within the segment, if known
    pub field: Option<usize>,
    /// Human-readable detail
    pub message: String,
}

impl Warning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            segment: None,
            field: None,
            message: message.into(),
        }
    }

    pub fn in_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    pub fn in_field(mut self, field: usize) -> Self {
        self.field = Some(field);
        self
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(segment) = &self.segment {
            write!(f, " (segment {segment}")?;
            if let Some(field) = self.field {
                write!(f, ", field {field}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}
