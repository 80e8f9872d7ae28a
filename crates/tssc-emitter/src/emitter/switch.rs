//! `switch` lowering.
//!
//! sclang's `switch(value, test, body, ..., default)` has no fallthrough and
//! no `break`. An empty `case` re-dispatches through `thisFunction` with the
//! condition of the clause it falls into, so a switch holding one is run
//! inside a closure taking the tested value. The `default` clause always
//! comes last.

use tssc_common::Indent;
use tssc_syntax::query::contains_switch_break;
use tssc_syntax::{Expr, Stmt, StmtKind, SwitchClause};

use super::{Emitter, wrap_braces, wrap_label};
use crate::context::{
    BreakMeans, GenContext, at_value_position, cleared_statement_label, make_break_means,
};
use crate::error::EmitResult;
use crate::names::{SWITCH_BREAK, SWITCH_TEST_VALUE};

const OTHERWISE_CONDITION: &str = "/* otherwise */ 0/0";

/// Per-clause facts gathered before any body is lowered.
#[derive(Debug)]
struct ClauseInfo<'s> {
    clause: &'s SwitchClause,
    /// Body without a trailing unlabeled `break`.
    body: &'s [Stmt],
    has_early_break: bool,
    is_fallthrough: bool,
    condition: String,
}

/// Jump targets of fallthrough clauses, given `(is_fallthrough, condition)`
/// per clause.
///
/// A run of fallthrough clauses resolves to the condition of the concrete
/// clause that follows it. A trailing run resolves to the nearest preceding
/// concrete clause, or to the clause's own condition when there is none.
pub(crate) fn resolve_jumps(clauses: &[(bool, &str)]) -> Vec<Option<String>> {
    let mut jumps: Vec<Option<String>> = vec![None; clauses.len()];
    for index in (0..clauses.len()).rev() {
        let (is_fallthrough, condition) = clauses[index];
        if !is_fallthrough {
            continue;
        }
        let target = match clauses.get(index + 1) {
            Some((true, _)) => jumps[index + 1].clone(),
            Some((false, next)) => Some((*next).to_string()),
            None => clauses[..index]
                .iter()
                .rev()
                .find(|(fallthrough, _)| !fallthrough)
                .map(|(_, preceding)| (*preceding).to_string())
                .or_else(|| Some(condition.to_string())),
        };
        jumps[index] = target;
    }
    jumps
}

impl Emitter<'_> {
    pub(crate) fn lower_switch(
        &mut self,
        expr: &Expr,
        clauses: &[SwitchClause],
        ctx: &GenContext,
    ) -> EmitResult<String> {
        let statement_label = ctx.statement_label.clone();
        let clause_ctx = cleared_statement_label(&make_break_means(ctx, BreakMeans::EndSwitchCase));
        let value_ctx = at_value_position(&clause_ctx);

        let mut infos = Vec::with_capacity(clauses.len());
        for clause in clauses {
            let body = match clause.body.split_last() {
                Some((last, leading)) if matches!(last.kind, StmtKind::Break(None)) => leading,
                _ => clause.body.as_slice(),
            };
            let condition = match &clause.test {
                Some(test) => self.lower_expr(test, &value_ctx)?,
                None => OTHERWISE_CONDITION.to_string(),
            };
            infos.push(ClauseInfo {
                clause,
                body,
                has_early_break: contains_switch_break(body),
                is_fallthrough: clause.test.is_some() && clause.body.is_empty(),
                condition,
            });
        }

        let shapes = infos
            .iter()
            .map(|info| (info.is_fallthrough, info.condition.as_str()))
            .collect::<Vec<_>>();
        let jumps = resolve_jumps(&shapes);
        let has_fallthrough = infos.iter().any(|info| info.is_fallthrough);

        let mut rendered = Vec::with_capacity(infos.len());
        for (info, jump) in infos.iter().zip(jumps) {
            let head = if info.clause.test.is_some() {
                format!("/* case */ {{ {} }},", info.condition)
            } else {
                "/* otherwise */".to_string()
            };
            let body = if info.is_fallthrough {
                let jump = jump.unwrap_or_else(|| info.condition.clone());
                format!("{{ /* fallthough */ thisFunction.value({jump}); }}")
            } else {
                let inner = self.lower_control_flow_inner(info.body, &clause_ctx, None, false)?;
                if info.has_early_break {
                    format!("{{ block {{ |{SWITCH_BREAK}|\n{}\n}} }}", inner.indent(1))
                } else {
                    wrap_braces(&inner)
                }
            };
            let sep = if body.contains('\n') { "\n" } else { " " };
            rendered.push(format!("{head}{sep}{body}").indent(1));
        }
        // sclang takes the last function as the default, wherever `default:` sat.
        if let Some(index) = infos.iter().position(|info| info.clause.test.is_none()) {
            let otherwise = rendered.remove(index);
            rendered.push(otherwise);
        }
        let clauses = rendered.join(",\n");

        let value = self.lower_expr(expr, &value_ctx)?;
        let text = if has_fallthrough {
            let dispatch = format!("switch( {SWITCH_TEST_VALUE},\n{clauses}\n) ;");
            format!(
                "{{ |{SWITCH_TEST_VALUE}| /* switch({value}) */\n{}\n}}.value({value}) ;",
                dispatch.indent(1)
            )
        } else {
            format!("switch( {value},\n{clauses}\n) ;")
        };
        tracing::trace!(clauses = infos.len(), has_fallthrough, "lowered switch");
        Ok(wrap_label(text, &statement_label))
    }
}
