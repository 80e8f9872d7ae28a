//! sclang text generation.
//!
//! `Emitter` owns everything that lives for the conversion of one unit: the
//! unit itself, the type service, collected warnings and the counters for
//! generated temporaries. Lowering methods are spread over the submodules,
//! all as `impl Emitter` blocks:
//!
//! - `identifiers`: identifier escaping
//! - `literals`: numbers, strings, templates, arrays, object literals
//! - `functions`: closures, parameters, early-return detection
//! - `expressions`: expression dispatch, calls, operators, `this`/`super`
//! - `self_increment`: `++`/`--` rewrite through reference cells
//! - `statements`: statement dispatch, blocks, jumps
//! - `loops`: control-flow bodies, `if`, `while`, `for`, `do`, `for-in/of`
//! - `switch`, `exceptions`, `classes`
//!
//! Every lowering method returns text relative to column 0. Parents nest a
//! child's text with [`Indent::indent`](tssc_common::Indent::indent).

mod classes;
mod exceptions;
mod expressions;
mod functions;
mod identifiers;
mod literals;
mod loops;
mod self_increment;
mod statements;
mod switch;

pub use functions::has_early_return;
pub(crate) use identifiers::to_class_name;

use tssc_common::{Diagnostic, Indent, LineMap, Span};
use tssc_syntax::{AstBuilder, SourceUnit, TypeService};

use crate::error::{EmitError, ErrorOrigin};

pub struct Emitter<'a> {
    pub(crate) unit: &'a SourceUnit,
    pub(crate) types: &'a dyn TypeService,
    line_map: LineMap,
    warnings: Vec<Diagnostic>,
    /// Next `~tstosc__temp_result__N`.
    temp_results: u32,
    /// Whether the unit contains any `++`/`--`.
    unit_has_self_increment: bool,
    /// Builder for desugared nodes.
    pub(crate) synth: AstBuilder,
}

impl<'a> Emitter<'a> {
    pub fn new(unit: &'a SourceUnit, types: &'a dyn TypeService) -> Self {
        Emitter {
            unit,
            types,
            line_map: LineMap::build(&unit.text),
            warnings: Vec::new(),
            temp_results: 0,
            unit_has_self_increment: false,
            synth: AstBuilder::synthetic(),
        }
    }

    /// Record the unit-level `++`/`--` scan result.
    #[must_use]
    pub fn with_self_increment(mut self, present: bool) -> Self {
        self.unit_has_self_increment = present;
        self
    }

    pub fn unit_has_self_increment(&self) -> bool {
        self.unit_has_self_increment
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.warnings)
    }

    pub(crate) fn next_temp_result(&mut self) -> u32 {
        let n = self.temp_results;
        self.temp_results += 1;
        n
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub(crate) fn warn(&mut self, span: Span, message: String) {
        tracing::warn!(file = %self.unit.file_name, pos = span.pos, "{message}");
        self.warnings.push(Diagnostic::warning(
            self.unit.file_name.clone(),
            span.pos,
            span.len(),
            message,
        ));
    }

    /// 1-based line and column of a span start.
    pub(crate) fn line_col(&self, span: Span) -> (u32, u32) {
        let pos = self.line_map.offset_to_position(span.pos, &self.unit.text);
        (pos.line + 1, pos.character + 1)
    }

    pub(crate) fn origin(&self, span: Span) -> Option<ErrorOrigin> {
        ErrorOrigin::locate(&self.unit.file_name, &self.unit.text, &self.line_map, span)
    }

    pub(crate) fn unsupported_syntax(&self, span: Span, message: impl Into<String>) -> EmitError {
        EmitError::UnsupportedSyntax {
            message: message.into(),
            origin: self.origin(span),
        }
    }

    pub(crate) fn unsupported_type(&self, span: Span, message: impl Into<String>) -> EmitError {
        EmitError::UnsupportedType {
            message: message.into(),
            origin: self.origin(span),
        }
    }

    pub(crate) fn type_error(&self, span: Span, message: impl Into<String>) -> EmitError {
        EmitError::Type {
            message: message.into(),
            origin: self.origin(span),
        }
    }
}

/// Wrap text in braces: `{ }`, `{ x }`, or a block with the text indented.
pub(crate) fn wrap_braces(text: &str) -> String {
    if text.is_empty() {
        "{ }".to_string()
    } else if text.contains('\n') {
        format!("{{\n{}\n}}", text.indent(1))
    } else {
        format!("{{ {text} }}")
    }
}

/// `block { |tstosc__label__L| ... } ;` around labeled non-loop statements.
pub(crate) fn wrap_label(text: String, label: &str) -> String {
    if label.is_empty() {
        return text;
    }
    format!(
        "block {{ |{}|\n{}\n}} ;",
        crate::names::label(label),
        text.indent(1)
    )
}

#[cfg(test)]
#[path = "../../tests/emitter.rs"]
mod tests;
