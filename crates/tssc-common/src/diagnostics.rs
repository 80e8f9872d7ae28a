//! Diagnostic types.
//!
//! Conversion reports two kinds of findings: fatal errors travel through the
//! emitter's `Result` channel, while non-fatal findings (numeric precision
//! loss, escaped identifiers, deprecated `null`/`undefined`) are collected as
//! `Diagnostic`s with the `Warning` category and returned next to the output.

use serde::Serialize;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category. Fatal findings never become diagnostics, so only
/// warnings are reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
}

/// A message attached to a span of a unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    /// Create a new warning diagnostic.
    #[must_use]
    pub fn warning(
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            start,
            length,
            message_text: message.into(),
            category: DiagnosticCategory::Warning,
        }
    }

    pub fn is_warning(&self) -> bool {
        self.category == DiagnosticCategory::Warning
    }
}

#[cfg(test)]
#[path = "../tests/diagnostics.rs"]
mod tests;
