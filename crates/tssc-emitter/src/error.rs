//! Conversion errors.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use tssc_common::{LineMap, Span};
use tssc_syntax::ParseError;

pub type EmitResult<T> = Result<T, EmitError>;

#[derive(Debug, Error)]
pub enum EmitError {
    /// A construct the generator recognizes but cannot express in sclang.
    #[error("{message}{}", origin_suffix(.origin))]
    UnsupportedSyntax {
        message: String,
        origin: Option<ErrorOrigin>,
    },

    /// A node kind with no lowering rule.
    #[error("{message}{}", origin_suffix(.origin))]
    UnsupportedType {
        message: String,
        origin: Option<ErrorOrigin>,
    },

    /// Invalid use of `this`, `super` or `break` for the current context.
    #[error("{message}{}", origin_suffix(.origin))]
    Type {
        message: String,
        origin: Option<ErrorOrigin>,
    },

    #[error("Unit \"{unit}\" is not part of this session.")]
    UnitNotFound { unit: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A generator invariant was broken; this is a defect, not bad input.
    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Cannot write \"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EmitError {
    pub fn internal(message: impl Into<String>) -> Self {
        EmitError::Internal {
            message: message.into(),
        }
    }

    pub fn origin(&self) -> Option<&ErrorOrigin> {
        match self {
            EmitError::UnsupportedSyntax { origin, .. }
            | EmitError::UnsupportedType { origin, .. }
            | EmitError::Type { origin, .. } => origin.as_ref(),
            _ => None,
        }
    }
}

fn origin_suffix(origin: &Option<ErrorOrigin>) -> String {
    match origin {
        Some(origin) => format!("\n{origin}"),
        None => String::new(),
    }
}

/// Where in the source an error was raised, with the offending line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorOrigin {
    pub file: String,
    /// 1-based.
    pub line: u32,
    /// 1-based, in characters.
    pub column: u32,
    /// Source line with leading whitespace removed.
    pub excerpt: String,
    /// Caret offset into `excerpt`, in characters.
    pub caret_start: usize,
    pub caret_len: usize,
}

impl ErrorOrigin {
    /// Locate `span` in `text`. Synthetic nodes have no origin.
    pub fn locate(file: &str, text: &str, line_map: &LineMap, span: Span) -> Option<Self> {
        if span.is_dummy() {
            return None;
        }
        // Spans may start at leading trivia.
        let skipped = span
            .slice(text)
            .chars()
            .take_while(|c| c.is_whitespace())
            .map(char::len_utf8)
            .sum::<usize>() as u32;
        let start = (span.pos + skipped).min(span.end.max(span.pos));
        let loc = line_map.locate(start, text);
        let raw_line = line_map.line_text(loc.line as usize, text);
        let indent = raw_line.chars().take_while(|c| c.is_whitespace()).count();
        let excerpt = raw_line.trim_start().to_string();
        let caret_start = (loc.character as usize).saturating_sub(indent);
        let excerpt_len = excerpt.chars().count();
        let wanted = Span::new(start, span.end).slice(text).chars().count().max(1);
        let caret_len = wanted.min(excerpt_len.saturating_sub(caret_start)).max(1);

        Some(ErrorOrigin {
            file: file.to_string(),
            line: loc.line + 1,
            column: loc.character + 1,
            excerpt,
            caret_start,
            caret_len,
        })
    }
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line_no = self.line.to_string();
        writeln!(f, "At file \"{}:{}:{}\".", self.file, self.line, self.column)?;
        writeln!(f, "| {line_no}    {}", self.excerpt)?;
        write!(
            f,
            "| {}{}",
            " ".repeat(line_no.len() + 4 + self.caret_start),
            "^".repeat(self.caret_len)
        )
    }
}

#[cfg(test)]
#[path = "../tests/error.rs"]
mod tests;
