//! ER7 escape sequence decoding
//!
//! Escape sequences have the form `<esc>X<esc>` where `X` is a short
//! mnemonic. They let field content carry characters that would otherwise
//! be parsed as delimiters. The mnemonic table is fixed; the characters it
//! resolves to come from the message's own [`Delimiters`].

use crate::delimiters::Delimiters;

/// Problem found while decoding a single leaf string
///
/// Issues are non-fatal; the tokenizer attaches segment/field location and
/// parsing continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscapeIssue {
    /// Unrecognized mnemonic; the sequence was passed through unchanged
    Unknown {
        /// The full sequence as it appeared, including both escape characters
        sequence: String,
    },
    /// Opening escape character with no closing one before the boundary;
    /// the input was returned unedited
    Unterminated,
}

/// Decode all escape sequences in `raw`
///
/// Recognized mnemonics: `F` `S` `T` `R` `E` (delimiter literals), `H` and
/// `N` (formatting markers, dropped), `.br` (line break). Unknown mnemonics
/// pass through unchanged with an [`EscapeIssue::Unknown`]. If an
/// unterminated sequence is found the original text is returned unedited
/// with an [`EscapeIssue::Unterminated`].
pub fn decode(raw: &str, delimiters: &Delimiters) -> (String, Vec<EscapeIssue>) {
    let esc = delimiters.escape;
    if !raw.contains(esc) {
        return (raw.to_owned(), Vec::new());
    }

    let mut out = String::with_capacity(raw.len());
    let mut issues = Vec::new();
    let mut rest = raw;

    while let Some(pos) = rest.find(esc) {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + esc.len_utf8()..];
        let Some(end) = after.find(esc) else {
            issues.push(EscapeIssue::Unterminated);
            return (raw.to_owned(), issues);
        };
        let body = &after[..end];
        match body {
            "F" => out.push(delimiters.field),
            "S" => out.push(delimiters.component),
            "T" => out.push(delimiters.subcomponent),
            "R" => out.push(delimiters.repetition),
            "E" => out.push(esc),
            // Highlighting markers carry no content
            "H" | "N" => {}
            ".br" => out.push('\n'),
            _ => {
                issues.push(EscapeIssue::Unknown {
                    sequence: format!("{esc}{body}{esc}"),
                });
                out.push(esc);
                out.push_str(body);
                out.push(esc);
            }
        }
        rest = &after[end + esc.len_utf8()..];
    }

    out.push_str(rest);
    (out, issues)
}

/// Encode a decoded leaf string back into escaped ER7 text
///
/// Inverse of [`decode`] for content: delimiter characters become their
/// mnemonic sequences and newlines become `<esc>.br<esc>`.
pub fn encode(text: &str, delimiters: &Delimiters) -> String {
    let esc = delimiters.escape;
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == esc {
            push_sequence(&mut out, esc, "E");
        } else if c == delimiters.field {
            push_sequence(&mut out, esc, "F");
        } else if c == delimiters.component {
            push_sequence(&mut out, esc, "S");
        } else if c == delimiters.subcomponent {
            push_sequence(&mut out, esc, "T");
        } else if c == delimiters.repetition {
            push_sequence(&mut out, esc, "R");
        } else if c == '\n' {
            push_sequence(&mut out, esc, ".br");
        } else {
            out.push(c);
        }
    }
    out
}

fn push_sequence(out: &mut String, esc: char, body: &str) {
    out.push(esc);
    out.push_str(body);
    out.push(esc);
}
