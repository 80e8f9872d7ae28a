//! Statement dispatch, blocks and jumps.

use tssc_common::Indent;
use tssc_syntax::{Stmt, StmtKind, VarDeclList};

use super::{Emitter, wrap_label};
use crate::context::{
    BreakMeans, GenContext, at_value_position, cleared_statement_label, standalone,
    with_statement_label,
};
use crate::error::EmitResult;
use crate::hoist::{DeclCollection, extract_declarations, flatten_var_list};
use crate::names::{LOOP_END, RETURN_WITH, SWITCH_BREAK, label};

impl Emitter<'_> {
    /// Lower a statement list: hoisted declarations first, then each
    /// statement on its own line. A pending statement label wraps the whole
    /// block.
    pub fn lower_block(&mut self, stmts: &[Stmt], ctx: &GenContext) -> EmitResult<String> {
        let statement_label = ctx.statement_label.clone();
        let ctx = standalone(&cleared_statement_label(ctx), true);

        let mut lines = Vec::with_capacity(stmts.len() + 1);
        let hoisted = self.hoist_declarations(stmts, &ctx)?;
        if !hoisted.is_empty() {
            lines.push(hoisted);
        }
        for stmt in stmts {
            let text = self.lower_stmt(stmt, &ctx)?;
            if !text.is_empty() {
                lines.push(text);
            }
        }

        Ok(wrap_label(lines.join("\n"), &statement_label))
    }

    /// Lower one statement, with its terminator.
    #[tracing::instrument(level = "trace", skip_all, fields(kind = stmt.kind.kind_name()))]
    pub fn lower_stmt(&mut self, stmt: &Stmt, ctx: &GenContext) -> EmitResult<String> {
        match &stmt.kind {
            // Classes are extracted separately; types do not exist in sclang.
            StmtKind::Import
            | StmtKind::ClassDecl(_)
            | StmtKind::Interface(_)
            | StmtKind::TypeAlias(_)
            | StmtKind::Empty => Ok(String::new()),

            StmtKind::Variable(list) => self.lower_variable_statement(list, ctx, false),

            StmtKind::Block(stmts) => {
                let statement_label = ctx.statement_label.clone();
                let body = self.lower_block(stmts, &cleared_statement_label(ctx))?;
                // A nested block's locals need a closure of their own.
                let body = if extract_declarations(stmts)?.is_empty() {
                    body
                } else {
                    format!("{{\n{}\n}}.value ;", body.indent(1))
                };
                Ok(wrap_label(body, &statement_label))
            }

            StmtKind::FunctionDecl(func) => match (&func.name, &func.body) {
                (Some(name), Some(_)) => {
                    let value = self.lower_function(func, &at_value_position(ctx))?;
                    Ok(format!("{} = {value} ;", Self::escape_var_quiet(&name.text)))
                }
                _ => Ok(String::new()),
            },

            StmtKind::Expression(expr) => Ok(format!("{} ;", self.lower_expr(expr, &standalone(ctx, true))?)),

            StmtKind::If { cond, then, else_ } => self.lower_if(cond, then, else_.as_deref(), ctx),
            StmtKind::While { cond, body } => self.lower_while(cond, body, ctx),
            StmtKind::Do { body, cond } => self.lower_do(stmt, body, cond, ctx),
            StmtKind::For {
                init,
                cond,
                incr,
                body,
            } => self.lower_for(init.as_ref(), cond.as_ref(), incr.as_ref(), body, ctx),
            StmtKind::ForIn { init, expr, body } => self.lower_for_each(init, expr, body, false, ctx),
            StmtKind::ForOf { init, expr, body } => self.lower_for_each(init, expr, body, true, ctx),

            StmtKind::Continue(target) => {
                let target = match target {
                    Some(ident) => label(&ident.text),
                    None => LOOP_END.to_string(),
                };
                Ok(format!("/* continue */ {target}.value(false) ;"))
            }
            StmtKind::Break(Some(ident)) => Ok(format!("/* break */ {}.value(true) ;", label(&ident.text))),
            StmtKind::Break(None) => match ctx.break_means {
                BreakMeans::StopALoop => Ok(format!("/* break */ {LOOP_END}.value(true) ;")),
                BreakMeans::EndSwitchCase => Ok(format!("/* break */ {SWITCH_BREAK}.value(nil) ;")),
                BreakMeans::Nothing => {
                    Err(self.type_error(stmt.span, "`break` here is not associated with switch/loop."))
                }
            },

            StmtKind::Return(value) => {
                let value = match value {
                    Some(value) => self.lower_expr(value, &at_value_position(ctx))?,
                    None => "nil /* no-expr return */".to_string(),
                };
                Ok(if ctx.is_generating_method {
                    format!("^{value} ;")
                } else if ctx.with_early_return {
                    format!("{RETURN_WITH}.value({value}) ;")
                } else {
                    format!("{value} ;")
                })
            }

            StmtKind::Labeled { label, body } => match &body.kind {
                StmtKind::If { .. }
                | StmtKind::Do { .. }
                | StmtKind::While { .. }
                | StmtKind::For { .. }
                | StmtKind::ForIn { .. }
                | StmtKind::ForOf { .. }
                | StmtKind::Switch { .. }
                | StmtKind::Try { .. }
                | StmtKind::Block(_) => self.lower_stmt(body, &with_statement_label(ctx, &label.text)),
                _ => {
                    let inner = self.lower_stmt(body, &cleared_statement_label(ctx))?;
                    Ok(wrap_label(inner, &label.text))
                }
            },

            StmtKind::Switch { expr, clauses } => self.lower_switch(expr, clauses, ctx),
            StmtKind::Throw(expr) => self.lower_throw(expr, ctx),
            StmtKind::Try {
                block,
                catch,
                finally,
            } => self.lower_try(block, catch.as_ref(), finally.as_deref(), ctx),

            StmtKind::With { .. } | StmtKind::Debugger => Err(self.unsupported_type(
                stmt.span,
                format!(
                    "The statement with syntax kind \"{}\" is not supported.",
                    stmt.kind.kind_name()
                ),
            )),
        }
    }

    /// Re-emit the initializers the hoisted `var` line left out: those
    /// holding `++`/`--`, or every one when `force` is set (`for` heads).
    pub(crate) fn lower_variable_statement(
        &mut self,
        list: &VarDeclList,
        ctx: &GenContext,
        force: bool,
    ) -> EmitResult<String> {
        let mut collection = DeclCollection::new();
        flatten_var_list(list, &mut collection)?;
        self.assign_initializers(list.kind.as_str(), &collection, ctx, force)
    }
}
