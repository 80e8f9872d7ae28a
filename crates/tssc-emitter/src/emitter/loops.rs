//! Control-flow bodies, `if` and loops.
//!
//! sclang loops (`while`, `do`) take closures and offer no `break` or
//! `continue`. A loop body holding either is run inside `block { |loop_end| }`:
//! `break` leaves it with `true`, `continue` with `false`, and a checkpoint
//! after the block stops the enclosing iteration when the result is `true`.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;
use tssc_common::Indent;
use tssc_syntax::query::{contains_break_or_continue, is_increment};
use tssc_syntax::{BindingName, Expr, ExprKind, ForInit, Stmt, StmtKind};

use super::{Emitter, wrap_braces, wrap_label};
use crate::context::{
    BreakMeans, GenContext, LoopInterrupt, at_value_position, cleared_statement_label, has_label,
    make_break_means, nested_loop, standalone, with_loop_interrupt, with_unhandled_self_increment,
};
use crate::error::EmitResult;
use crate::hoist::{DeclKind, solve_binding};
use crate::names::{DO_BODY_PREFIX, DROP_ARG, LOOP_END, LOOP_SHOULD_BREAK, LOOP_VAR, label};

/// Statements of a body: a block's contents, or the statement itself.
pub(crate) fn body_stmts(stmt: &Stmt) -> &[Stmt] {
    match &stmt.kind {
        StmtKind::Block(stmts) => stmts,
        _ => std::slice::from_ref(stmt),
    }
}

/// `name(\n    a,\n    b\n) ;` for statements, `name(a, b) ;` otherwise.
pub(crate) fn call_layout(name: &str, args: &[String], standalone: bool) -> String {
    if standalone {
        let args = args.iter().map(|arg| arg.indent(1)).collect::<Vec<_>>();
        format!("{name}(\n{}\n) ;", args.join(",\n"))
    } else {
        format!("{name}({}) ;", args.join(", "))
    }
}

fn join_nonempty(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}

impl Emitter<'_> {
    // =========================================================================
    // Bodies
    // =========================================================================

    /// Body text without braces. Loop bodies with `break`/`continue` get the
    /// `loop_end` sentinel; the incrementor of a `for` comes last, outside
    /// the sentinel.
    pub(crate) fn lower_control_flow_inner(
        &mut self,
        stmts: &[Stmt],
        ctx: &GenContext,
        incr: Option<&Expr>,
        is_loop: bool,
    ) -> EmitResult<String> {
        let statement_label = ctx.statement_label.clone();
        let interrupted = match ctx.loop_interrupt {
            LoopInterrupt::Unknown => is_loop && stmts.iter().any(contains_break_or_continue),
            known => is_loop && known == LoopInterrupt::Present,
        };

        let mut body_ctx = with_loop_interrupt(&cleared_statement_label(ctx), LoopInterrupt::Unknown);
        if is_loop {
            body_ctx = nested_loop(&body_ctx, true);
        }
        let mut text = self.lower_block(stmts, &body_ctx)?;

        if interrupted {
            let label_line = if has_label(ctx) {
                format!("var /* label */ {} = {LOOP_END} ;", label(&statement_label))
            } else {
                String::new()
            };
            let default_line = format!("/* Dafault value for {LOOP_SHOULD_BREAK} */\nfalse ;");
            let inner = join_nonempty(&[&label_line, &text, &default_line]);
            let checkpoint = if ctx.is_nested_loop {
                format!("{LOOP_END}.value(true) ;")
            } else {
                "^nil ;".to_string()
            };
            text = format!(
                "/* loop body */\nvar {LOOP_SHOULD_BREAK} = block {{ |{LOOP_END}|\n{}\n}} ;\n\
                 /* Loop-Should-Break Checkpoint */\nif ({LOOP_SHOULD_BREAK}) {{ {checkpoint} }} ;",
                inner.indent(1)
            );
        }

        if let Some(incr) = incr {
            let line = self.lower_incrementor(incr, &body_ctx)?;
            text = join_nonempty(&[&text, &line]);
        }
        Ok(text)
    }

    pub(crate) fn lower_control_flow_body(
        &mut self,
        stmts: &[Stmt],
        ctx: &GenContext,
        incr: Option<&Expr>,
        is_loop: bool,
    ) -> EmitResult<String> {
        let inner = self.lower_control_flow_inner(stmts, ctx, incr, is_loop)?;
        Ok(wrap_braces(&inner))
    }

    /// `i++` and `i--` need no reference cell here.
    fn lower_incrementor(&mut self, incr: &Expr, ctx: &GenContext) -> EmitResult<String> {
        let operand = match &incr.kind {
            ExprKind::Prefix { operand, .. } | ExprKind::Postfix { operand, .. } => Some(operand),
            _ => None,
        };
        if let (Some(up), Some(operand)) = (is_increment(incr), operand) {
            let target = self.lower_expr(operand, &with_unhandled_self_increment(&at_value_position(ctx), false))?;
            let op = if up { "+" } else { "-" };
            return Ok(format!("/* increment */\n{target} = {target} {op} 1 ;"));
        }
        Ok(format!("{} ;", self.lower_expr(incr, &standalone(ctx, true))?))
    }

    // =========================================================================
    // if
    // =========================================================================

    pub(crate) fn lower_if(
        &mut self,
        cond: &Expr,
        then: &Stmt,
        else_: Option<&Stmt>,
        ctx: &GenContext,
    ) -> EmitResult<String> {
        let statement_label = ctx.statement_label.clone();
        let ctx_new = cleared_statement_label(ctx);

        let cond = self.lower_expr(cond, &at_value_position(&ctx_new))?;
        let then = self.lower_control_flow_body(body_stmts(then), &ctx_new, None, false)?;
        let else_ = match else_ {
            Some(else_) => self.lower_control_flow_body(body_stmts(else_), &ctx_new, None, false)?,
            None => "{ }".to_string(),
        };

        let text = call_layout("if", &[cond, then, else_], ctx.is_standalone_statement);
        Ok(wrap_label(text, &statement_label))
    }

    // =========================================================================
    // Loops
    // =========================================================================

    fn lower_condition(&mut self, cond: Option<&Expr>, ctx: &GenContext) -> EmitResult<String> {
        let Some(cond) = cond else {
            return Ok("{ true }".to_string());
        };
        let text = self.lower_expr(cond, &at_value_position(&cleared_statement_label(ctx)))?;
        Ok(wrap_braces(&text))
    }

    pub(crate) fn lower_while(&mut self, cond: &Expr, body: &Stmt, ctx: &GenContext) -> EmitResult<String> {
        let loop_ctx = make_break_means(ctx, BreakMeans::StopALoop);
        let cond = self.lower_condition(Some(cond), &loop_ctx)?;
        let body = self.lower_control_flow_body(body_stmts(body), &loop_ctx, None, true)?;
        Ok(call_layout("while", &[cond, body], ctx.is_standalone_statement))
    }

    /// The `for` head is re-emitted in front, since hoisting left the loop
    /// variables uninitialized at this point.
    pub(crate) fn lower_for(
        &mut self,
        init: Option<&ForInit>,
        cond: Option<&Expr>,
        incr: Option<&Expr>,
        body: &Stmt,
        ctx: &GenContext,
    ) -> EmitResult<String> {
        let loop_ctx = make_break_means(ctx, BreakMeans::StopALoop);
        let head_ctx = cleared_statement_label(&loop_ctx);
        let init = match init {
            None => String::new(),
            Some(ForInit::VarDecls(list)) => self.lower_variable_statement(list, &head_ctx, true)?,
            Some(ForInit::Expr(expr)) => format!("{} ;", self.lower_expr(expr, &standalone(&head_ctx, true))?),
        };
        let cond = self.lower_condition(cond, &loop_ctx)?;
        let body = self.lower_control_flow_body(body_stmts(body), &loop_ctx, incr, true)?;

        let text = call_layout("while", &[cond, body], ctx.is_standalone_statement);
        Ok(join_nonempty(&[&init, &text]))
    }

    /// Stable 8-digit hex tag naming a `do` body.
    fn do_body_tag(&self, stmt: &Stmt) -> String {
        let mut hasher = FxHasher::default();
        self.unit.file_name.hash(&mut hasher);
        stmt.kind.kind_name().hash(&mut hasher);
        stmt.id.0.hash(&mut hasher);
        stmt.span.pos.hash(&mut hasher);
        stmt.span.end.hash(&mut hasher);
        format!("{:08x}", hasher.finish() >> 32)
    }

    /// The body becomes an environment closure run once before the `while`.
    pub(crate) fn lower_do(&mut self, stmt: &Stmt, body: &Stmt, cond: &Expr, ctx: &GenContext) -> EmitResult<String> {
        let name = format!("{DO_BODY_PREFIX}{}", self.do_body_tag(stmt));
        let loop_ctx = make_break_means(ctx, BreakMeans::StopALoop);
        let body = self.lower_control_flow_body(body_stmts(body), &loop_ctx, None, true)?;
        let cond = self.lower_expr(cond, &at_value_position(&cleared_statement_label(ctx)))?;
        Ok(format!(
            "{name} = {body} ;\n{name}.() ;\nwhile({{ {cond} }}, {{ {name}.() }}) ;"
        ))
    }

    /// `for-of` and `for-in` become `.do` with the loop variable as the
    /// item or the index argument.
    pub(crate) fn lower_for_each(
        &mut self,
        init: &ForInit,
        expr: &Expr,
        body: &Stmt,
        is_of: bool,
        ctx: &GenContext,
    ) -> EmitResult<String> {
        let (binding, pattern_line) = match init {
            ForInit::VarDecls(list) => match list.decls.first().map(|decl| &decl.name) {
                Some(BindingName::Ident(ident)) => (Self::escape_var_quiet(&ident.text), String::new()),
                Some(pattern) => {
                    let source = self.synth.id(LOOP_VAR);
                    let collection = solve_binding(pattern, Some(&source))?;
                    let line = self.binding_lines(DeclKind::Loopvar, &collection, ctx)?;
                    (LOOP_VAR.to_string(), line)
                }
                None => {
                    return Err(self.unsupported_syntax(expr.span, "A loop head must declare a variable."));
                }
            },
            ForInit::Expr(target) => match &target.kind {
                ExprKind::Ident(ident) => (Self::escape_var_quiet(&ident.text), String::new()),
                _ => {
                    return Err(self.unsupported_syntax(
                        target.span,
                        "Only identifiers can be assigned by a for-of/for-in head.",
                    ));
                }
            },
        };

        let loop_ctx = make_break_means(ctx, BreakMeans::StopALoop);
        let inner = self.lower_control_flow_inner(body_stmts(body), &loop_ctx, None, true)?;
        let content = join_nonempty(&[&pattern_line, &inner]);
        let target = self.lower_expr(expr, &at_value_position(&cleared_statement_label(ctx)))?;
        let head = if is_of {
            format!("{{ /* for-of */ |{binding}, {DROP_ARG}|")
        } else {
            format!("{{ /* for-in */ |{DROP_ARG}, {binding}|")
        };

        Ok(if content.contains('\n') {
            format!("{target}.do\n{head}\n{}\n}} ;", content.indent(1))
        } else if content.is_empty() {
            format!("{target}.do {head} }} ;")
        } else {
            format!("{target}.do {head} {content} }} ;")
        })
    }
}
