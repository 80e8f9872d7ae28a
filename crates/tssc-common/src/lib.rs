//! Common types and utilities for the tssc compiler.
//!
//! This crate provides foundational types used across all tssc crates:
//! - Source spans (`Span`)
//! - Position/Range types and the `LineMap` for line/column lookups
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`)
//! - Text helpers for the indentation-driven sclang output

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Position/Range types for line/column source locations
pub mod position;
pub use position::{LineMap, Position, SourceLocation};

// Warnings and errors reported to the embedding layer
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};

// Indentation and line utilities
pub mod text;
pub use text::{INDENT_UNIT, Indent};
