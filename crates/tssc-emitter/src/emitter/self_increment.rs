//! `++` / `--` through reference cells.
//!
//! sclang has no increment operators and no references to locals. An
//! expression holding `++`/`--` is rewritten as a sequence: each distinct
//! l-value is snapshotted into a `Ref` cell, the expression is evaluated with
//! the operators replaced by helper calls against those cells, then every
//! cell is written back.
//!
//! ```text
//! ~tstosc__temp__x = `(x) ;
//! ~tstosc__temp_result__0 = foo.(~tstosc__post_incr.(~tstosc__temp__x), x) ;
//! x = ~tstosc__temp__x.value ;
//! ~tstosc__temp_result__0
//! ```

use indexmap::IndexMap;
use tssc_common::Indent;
use tssc_syntax::Expr;
use tssc_syntax::query::{contains_self_increment, is_assignable, lvalue_text, self_increment_targets};

use super::Emitter;
use crate::context::{
    GenContext, Temporaries, at_value_position, with_temporaries, with_unhandled_self_increment,
};
use crate::error::{EmitError, EmitResult};
use crate::names::{TEMP_CELL_PREFIX, TEMP_RESULT_PREFIX, sanitize};

impl Emitter<'_> {
    #[tracing::instrument(level = "trace", skip_all)]
    pub(crate) fn lower_self_increment(&mut self, expr: &Expr, ctx: &GenContext) -> EmitResult<String> {
        let plain_ctx = with_unhandled_self_increment(&at_value_position(ctx), false);

        // l-value text -> (cell, target), first occurrence wins
        let mut cells: IndexMap<String, (String, &Expr)> = IndexMap::new();
        for target in self_increment_targets(expr) {
            if contains_self_increment(target) {
                return Err(self.unsupported_syntax(
                    target.span,
                    "Nested self increment/decrement operators in one operand are not supported.",
                ));
            }
            if !is_assignable(target) {
                return Err(self.unsupported_syntax(
                    target.span,
                    "The operand of a self increment/decrement operator must be assignable.",
                ));
            }
            let key = lvalue_text(target);
            if cells.contains_key(&key) {
                continue;
            }
            let cell = unique_cell_name(&key, &cells);
            cells.insert(key, (cell, target));
        }
        let result = format!("{TEMP_RESULT_PREFIX}{}", self.next_temp_result());

        let mut lines = Vec::with_capacity(cells.len() * 2 + 2);
        let mut write_backs = Vec::with_capacity(cells.len());
        let mut temporaries = Temporaries::default();
        for (key, (cell, target)) in &cells {
            let lvalue = self.lower_expr(target, &plain_ctx)?;
            lines.push(format!("{cell} = `({lvalue}) ;"));
            write_backs.push(format!("{lvalue} = {cell}.value ;"));
            temporaries.insert(key.clone(), cell.clone());
        }

        let value = self.lower_expr(expr, &with_temporaries(&plain_ctx, temporaries))?;
        lines.push(format!("{result} = {value} ;"));
        lines.extend(write_backs);
        lines.push(result);

        let text = lines.join("\n");
        Ok(if ctx.is_standalone_statement {
            text
        } else {
            format!("(\n{}\n)", text.indent(1))
        })
    }

    /// `helper.(cell)` for the operand of a `++`/`--` inside a rewrite.
    pub(crate) fn lower_self_update(
        &mut self,
        operand: &Expr,
        helper: &str,
        ctx: &GenContext,
    ) -> EmitResult<String> {
        let key = lvalue_text(operand.skip_parens());
        match ctx.temporaries.get(&key) {
            Some(cell) => Ok(format!("{helper}.({cell})")),
            None => Err(EmitError::internal(format!(
                "no reference cell for the operand \"{key}\" of a self increment/decrement"
            ))),
        }
    }
}

/// `~tstosc__temp__<key>`, suffixed with `_<n>` when another l-value already
/// sanitizes to the same name.
fn unique_cell_name(key: &str, cells: &IndexMap<String, (String, &Expr)>) -> String {
    let base = format!("{TEMP_CELL_PREFIX}{}", sanitize(key));
    let taken = |name: &str| cells.values().any(|(cell, _)| cell == name);
    if !taken(&base) {
        return base;
    }
    (1..)
        .map(|n| format!("{base}_{n}"))
        .find(|name| !taken(name))
        .unwrap_or(base)
}
