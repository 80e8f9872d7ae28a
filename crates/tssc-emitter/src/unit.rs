//! Unit assembly: one source unit in, a script body and class artifacts out.

use serde::Serialize;
use tssc_common::{Diagnostic, Indent};
use tssc_syntax::{SourceUnit, TypeService};

use crate::context::{GenContext, standalone, with_unhandled_self_increment};
use crate::emitter::Emitter;
use crate::error::EmitResult;
use crate::names::HELPER_ENVIRONMENT;
use crate::preprocess::PreprocessingCache;

/// What `convert_unit` produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ConvertOptions {
    /// Lower the unit's statements into the script body.
    pub convert_statements: bool,
    /// Lower the unit's classes into class artifacts.
    pub convert_classes: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            convert_statements: true,
            convert_classes: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConvertedClass {
    pub name: String,
    pub text: String,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ConvertedUnit {
    /// The `.scd` script: hoisted declarations, helper environment,
    /// statements.
    pub body: String,
    pub classes: Vec<ConvertedClass>,
    pub warnings: Vec<Diagnostic>,
}

impl ConvertedUnit {
    /// Every class block, separated by a blank line.
    pub fn class_text(&self) -> String {
        self.classes
            .iter()
            .map(|class| class.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

fn helper_environment() -> String {
    format!("/* Helper Environment */\n{}", HELPER_ENVIRONMENT.join("\n"))
}

/// Convert one unit. Nothing is returned for a unit that fails anywhere.
#[tracing::instrument(level = "debug", skip_all, fields(unit = %unit.file_name))]
pub fn convert_unit(
    unit: &SourceUnit,
    types: &dyn TypeService,
    cache: &mut PreprocessingCache,
    ctx: &GenContext,
    options: ConvertOptions,
) -> EmitResult<ConvertedUnit> {
    let pack = cache.get_or_scan(unit);
    let ctx = standalone(&with_unhandled_self_increment(ctx, pack.has_self_increment), true);
    let mut emitter = Emitter::new(unit, types).with_self_increment(pack.has_self_increment);

    let mut body = String::new();
    if options.convert_statements {
        body = emitter.hoist_declarations(&unit.statements, &ctx)?;
        if pack.has_self_increment {
            if !body.is_empty() {
                body.push('\n');
            }
            body.push_str(&helper_environment());
        }

        let mut lines = Vec::with_capacity(unit.statements.len());
        for stmt in &unit.statements {
            let text = emitter.lower_stmt(stmt, &ctx)?;
            if !text.is_empty() {
                lines.push(text);
            }
        }
        if !lines.is_empty() {
            // A blank line separates the helper environment from the script.
            let sep = if pack.has_self_increment { "\n\n" } else { "\n" };
            if !body.is_empty() {
                body.push_str(sep);
            }
            body.push_str(&lines.join("\n"));
        }
        body = body.indent(ctx.indent_level);
    }

    let mut classes = Vec::new();
    if options.convert_classes {
        for extracted in &pack.classes {
            let text = emitter.lower_class(&extracted.class, &extracted.name, &ctx)?;
            classes.push(ConvertedClass {
                name: extracted.name.clone(),
                text,
            });
        }
    }

    let warnings = emitter.take_warnings();
    tracing::debug!(classes = classes.len(), warnings = warnings.len(), "converted unit");
    Ok(ConvertedUnit {
        body,
        classes,
        warnings,
    })
}

#[cfg(test)]
#[path = "../tests/unit.rs"]
mod tests;
