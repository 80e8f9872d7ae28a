//! Closures: parameter lists, bodies and early-return detection.
//!
//! sclang receives parameters through an `arg` line. Plain names pass through,
//! defaulted ones become `name=value`, binding patterns are replaced by a
//! positional `tstosc_dvar_<i>` that the body destructures, and a trailing
//! rest parameter becomes `*name`.

use tssc_common::{Indent, Span};
use tssc_syntax::{BindingName, Expr, FunctionBody, FunctionKind, FunctionLike, Ident, Param, Stmt, StmtKind};

use super::Emitter;
use crate::context::{
    BreakMeans, GenContext, LoopInterrupt, Temporaries, at_value_position, cleared_statement_label,
    generating_constructor, generating_method, generating_object_literal_member, indent,
    make_break_means, nested_loop, standalone, with_early_return, with_loop_interrupt,
    with_temporaries, with_unhandled_self_increment,
};
use crate::error::EmitResult;
use crate::hoist::{DeclKind, solve_binding};
use crate::names::{REST_FALLBACK, RETURN_WITH, THIS_PARAM, destructured_param};

/// A function's parameters, grouped by how sclang receives them.
#[derive(Debug, Default)]
pub(crate) struct ParamGroups<'p> {
    pub(crate) trivial: Vec<(&'p str, Span)>,
    pub(crate) omittable: Vec<(&'p Ident, &'p Expr)>,
    pub(crate) destructured: Vec<(&'p BindingName, Option<&'p Expr>)>,
    pub(crate) rest: Option<(&'p str, Span)>,
}

impl<'p> ParamGroups<'p> {
    /// Only the last parameter can be a rest parameter.
    pub(crate) fn classify(params: &'p [Param]) -> Self {
        let mut groups = ParamGroups::default();
        let params = match params.split_last() {
            Some((last, leading)) if last.rest => {
                let name = last.name.as_ident().map_or(REST_FALLBACK, |ident| ident.text.as_str());
                groups.rest = Some((name, last.span));
                leading
            }
            _ => params,
        };

        for param in params {
            match (&param.name, &param.init) {
                (BindingName::Ident(ident), Some(init)) => groups.omittable.push((ident, init)),
                (BindingName::Ident(ident), None) => groups.trivial.push((&ident.text, ident.span)),
                (pattern, init) => groups.destructured.push((pattern, init.as_ref())),
            }
        }
        groups
    }

    /// Prepend the receiver parameter of object-literal methods.
    #[must_use]
    pub(crate) fn with_receiver(mut self) -> Self {
        self.trivial.insert(0, (THIS_PARAM, Span::DUMMY));
        self
    }
}

/// Assemble `{ arg ... ; body }`, on one line when everything fits.
pub(crate) fn closure(arg_line: &str, parts: &[&str]) -> String {
    let inner = parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n");
    if inner.is_empty() {
        format!("{{{arg_line} }}")
    } else if inner.contains('\n') {
        format!("{{{arg_line}\n{}\n}}", inner.indent(1))
    } else {
        format!("{{{arg_line} {inner} }}")
    }
}

// =============================================================================
// Early return
// =============================================================================

/// Whether `stmts` returns before its last statement.
///
/// At the outermost level a `return` in tail position is just the closure's
/// value: the last statement itself, or the tail of a branch, block or `try`
/// that is itself in tail position. Every other `return` counts, including
/// any inside a loop body or a `switch` clause. Nested levels count any
/// `return`.
pub fn has_early_return(stmts: &[Stmt], outermost: bool) -> bool {
    let last = stmts.len().saturating_sub(1);
    stmts
        .iter()
        .enumerate()
        .any(|(index, stmt)| returns_within(stmt, outermost && index == last))
}

fn branch_returns(stmt: &Stmt, tail: bool) -> bool {
    match &stmt.kind {
        StmtKind::Block(stmts) => has_early_return(stmts, tail),
        _ => returns_within(stmt, tail),
    }
}

/// Whether `stmt` holds a `return` outside tail position.
fn returns_within(stmt: &Stmt, tail: bool) -> bool {
    match &stmt.kind {
        StmtKind::Return(_) => !tail,
        StmtKind::Block(stmts) => has_early_return(stmts, tail),
        StmtKind::If { then, else_, .. } => {
            branch_returns(then, tail) || else_.as_ref().is_some_and(|else_| branch_returns(else_, tail))
        }
        StmtKind::While { body, .. }
        | StmtKind::Do { body, .. }
        | StmtKind::For { body, .. }
        | StmtKind::ForIn { body, .. }
        | StmtKind::ForOf { body, .. } => branch_returns(body, false),
        StmtKind::Switch { clauses, .. } => clauses.iter().any(|clause| has_early_return(&clause.body, false)),
        StmtKind::Try {
            block,
            catch,
            finally,
        } => {
            has_early_return(block, tail)
                || catch
                    .as_ref()
                    .is_some_and(|catch| has_early_return(&catch.block, tail))
                || finally
                    .as_ref()
                    .is_some_and(|finally| has_early_return(finally, tail))
        }
        StmtKind::Labeled { body, .. } => returns_within(body, tail),
        _ => false,
    }
}

impl Emitter<'_> {
    // =========================================================================
    // Parameters
    // =========================================================================

    /// ` arg a, b=1, tstosc_dvar_0, *rest ;`, or nothing without parameters.
    pub(crate) fn arg_line(&mut self, groups: &ParamGroups<'_>, ctx: &GenContext) -> EmitResult<String> {
        let value_ctx = at_value_position(ctx);
        let mut args = Vec::new();

        for &(name, span) in &groups.trivial {
            args.push(self.escape_var(name, span));
        }
        for &(ident, init) in &groups.omittable {
            let name = self.escape_var(&ident.text, ident.span);
            let value = self.lower_expr(init, &value_ctx)?;
            args.push(format!("{name}={value}"));
        }
        for (index, (_, init)) in groups.destructured.iter().enumerate() {
            let name = destructured_param(index);
            match init {
                Some(init) => {
                    let value = self.lower_expr(init, &value_ctx)?;
                    args.push(format!("{name} = {value}"));
                }
                None => args.push(name),
            }
        }
        if let Some((name, span)) = groups.rest {
            args.push(format!("*{}", self.escape_var(name, span)));
        }

        Ok(if args.is_empty() {
            String::new()
        } else {
            format!(" arg {} ;", args.join(", "))
        })
    }

    /// One `var /* param */ ... ;` line per destructured parameter.
    pub(crate) fn destructure_params(
        &mut self,
        groups: &ParamGroups<'_>,
        ctx: &GenContext,
    ) -> EmitResult<String> {
        let mut lines = Vec::new();
        for (index, (pattern, _)) in groups.destructured.iter().enumerate() {
            let source = self.synth.id(&destructured_param(index));
            let collection = solve_binding(pattern, Some(&source))?;
            let line = self.binding_lines(DeclKind::Param, &collection, ctx)?;
            if !line.is_empty() {
                lines.push(line);
            }
        }
        Ok(lines.join("\n"))
    }

    // =========================================================================
    // Functions
    // =========================================================================

    /// Context for a function body: nothing from the enclosing loop, switch
    /// or rewrite scope leaks in.
    pub(crate) fn function_ctx(&self, kind: FunctionKind, ctx: &GenContext) -> GenContext {
        let ctx = generating_object_literal_member(ctx, false);
        let ctx = with_unhandled_self_increment(&ctx, self.unit_has_self_increment());
        let ctx = with_temporaries(&ctx, Temporaries::default());
        let ctx = make_break_means(&ctx, BreakMeans::Nothing);
        let ctx = with_loop_interrupt(&ctx, LoopInterrupt::Unknown);
        let ctx = nested_loop(&ctx, false);
        let ctx = cleared_statement_label(&ctx);
        let ctx = with_early_return(&ctx, false);
        match kind {
            FunctionKind::Arrow | FunctionKind::Expression | FunctionKind::Declaration => {
                generating_constructor(&generating_method(&ctx, false), false)
            }
            _ => ctx,
        }
    }

    /// Lower a function-like node to a closure.
    #[tracing::instrument(level = "trace", skip_all, fields(kind = ?func.kind))]
    pub(crate) fn lower_function(&mut self, func: &FunctionLike, ctx: &GenContext) -> EmitResult<String> {
        let mut groups = ParamGroups::classify(&func.params);
        if ctx.is_generating_object_literal_member {
            groups = groups.with_receiver();
        }
        let ctx = self.function_ctx(func.kind, ctx);
        let arg_line = self.arg_line(&groups, &ctx)?;
        let destructs = self.destructure_params(&groups, &ctx)?;

        match &func.body {
            None => Ok(closure(&arg_line, &[&destructs])),
            Some(FunctionBody::Expr(expr)) => {
                let value = self.lower_expr(expr, &at_value_position(&ctx))?;
                Ok(closure(&arg_line, &[&destructs, &value]))
            }
            Some(FunctionBody::Block(stmts)) => {
                let early_return = !ctx.is_generating_method && has_early_return(stmts, true);
                let body_ctx = indent(&standalone(&ctx, true), 1);
                let body_ctx = with_early_return(&body_ctx, early_return);
                let body = self.lower_block(stmts, &body_ctx)?;
                let body = if early_return {
                    format!("block {{ |{RETURN_WITH}|\n{}\n}}", body.indent(1))
                } else {
                    body
                };
                Ok(closure(&arg_line, &[&destructs, &body]))
            }
        }
    }
}
