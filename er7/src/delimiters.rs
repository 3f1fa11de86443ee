use crate::error::{ErrorKind, ParseError};

/// ER7 delimiters declared by the MSH segment
///
/// The field separator is the character immediately after `MSH`; the four
/// encoding characters follow in fixed order in MSH-2. Every message owns
/// its own table — two messages in one batch may declare different
/// delimiters, so this value is threaded explicitly through tokenization
/// and never stored globally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    /// Field separator (typically '|')
    pub field: char,
    /// Component separator (typically '^')
    pub component: char,
    /// Repetition separator (typically '~')
    pub repetition: char,
    /// Escape character (typically '\\')
    pub escape: char,
    /// Subcomponent separator (typically '&')
    pub subcomponent: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            field: '|',
            component: '^',
            repetition: '~',
            escape: '\\',
            subcomponent: '&',
        }
    }
}

impl Delimiters {
    /// Extract the delimiter table from a message's MSH segment
    ///
    /// Reads the `MSH` type code, the field separator immediately after it,
    /// and the four encoding characters of MSH-2 in fixed position order:
    /// component, repetition, escape, subcomponent.
    ///
    /// # Errors
    ///
    /// `MalformedHeader` if the text does not begin with `MSH`, fewer than
    /// four encoding characters are declared, or any two of the five
    /// resulting characters coincide or are whitespace.
    pub fn from_header(text: &str) -> Result<Self, ParseError> {
        let malformed = |message: &str| {
            ParseError::new(ErrorKind::MalformedHeader, message).in_segment("MSH")
        };

        if !text.starts_with("MSH") {
            return Err(malformed("message does not start with MSH"));
        }

        let mut chars = text[3..].chars();
        let field = chars
            .next()
            .ok_or_else(|| malformed("MSH segment truncated before field separator"))?;

        // MSH-2 runs up to the next field separator or the end of the segment.
        let encoding: Vec<char> = chars
            .take_while(|&c| c != field && c != '\r' && c != '\n')
            .collect();
        if encoding.len() < 4 {
            return Err(malformed(&format!(
                "MSH-2 declares {} encoding characters, need 4",
                encoding.len()
            )));
        }

        let table = Self {
            field,
            component: encoding[0],
            repetition: encoding[1],
            escape: encoding[2],
            subcomponent: encoding[3],
        };
        table.validate()?;
        Ok(table)
    }

    /// All five characters, in declaration order
    pub fn all(&self) -> [char; 5] {
        [
            self.field,
            self.component,
            self.repetition,
            self.escape,
            self.subcomponent,
        ]
    }

    fn validate(&self) -> Result<(), ParseError> {
        let all = self.all();
        for (i, &c) in all.iter().enumerate() {
            if c.is_whitespace() {
                return Err(ParseError::new(
                    ErrorKind::MalformedHeader,
                    format!("whitespace delimiter {c:?} declared"),
                )
                .in_segment("MSH"));
            }
            if all[i + 1..].contains(&c) {
                return Err(ParseError::new(
                    ErrorKind::MalformedHeader,
                    format!("delimiter {c:?} declared twice"),
                )
                .in_segment("MSH"));
            }
        }
        Ok(())
    }
}
