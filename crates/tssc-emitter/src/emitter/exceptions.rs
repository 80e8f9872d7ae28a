//! `throw` and `try` / `catch` / `finally`.

use tssc_common::Indent;
use tssc_syntax::{BindingName, CatchClause, Expr, ExprKind, Stmt};

use super::{Emitter, wrap_label};
use crate::context::{GenContext, at_value_position, cleared_statement_label};
use crate::error::EmitResult;
use crate::hoist::{DeclKind, solve_binding};
use crate::names::CATCH_VAR;

impl Emitter<'_> {
    /// Whether a thrown value already is an `Error` and can `.throw()` itself.
    fn is_error_like(&self, expr: &Expr) -> bool {
        let descriptor = self.types.type_of(expr.id);
        if descriptor.symbol_name.as_deref() == Some("Error")
            || descriptor.base_type_names.iter().any(|name| name == "Error")
        {
            return true;
        }
        // Without type information, `new FooError(..)` is taken by its name.
        match &expr.skip_parens().kind {
            ExprKind::New { callee, .. } => callee
                .as_ident()
                .is_some_and(|ident| ident.text.ends_with("Error")),
            _ => false,
        }
    }

    pub(crate) fn lower_throw(&mut self, expr: &Expr, ctx: &GenContext) -> EmitResult<String> {
        let value = self.lower_expr(expr, &at_value_position(&cleared_statement_label(ctx)))?;
        Ok(if self.is_error_like(expr) {
            format!("{value}.throw() ;")
        } else {
            format!("Error({value}).throw() ;")
        })
    }

    /// `{ |e| ... }` for a catch clause. A binding pattern is received as
    /// `tstosc__catchvar` and destructured on the first line.
    fn lower_catch(&mut self, catch: &CatchClause, ctx: &GenContext) -> EmitResult<String> {
        let (var, destructs) = match &catch.binding {
            None => (String::new(), String::new()),
            Some(BindingName::Ident(ident)) => (self.escape_var(&ident.text, ident.span), String::new()),
            Some(pattern) => {
                let source = self.synth.id(CATCH_VAR);
                let collection = solve_binding(pattern, Some(&source))?;
                let line = self.binding_lines(DeclKind::Catchvar, &collection, ctx)?;
                (CATCH_VAR.to_string(), line)
            }
        };
        let inner = self.lower_control_flow_inner(&catch.block, ctx, None, false)?;
        let content = [destructs, inner]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        let head = if var.is_empty() {
            "{".to_string()
        } else {
            format!("{{ |{var}|")
        };
        Ok(if content.contains('\n') {
            format!("{head}\n{}\n}}", content.indent(1))
        } else if content.is_empty() {
            format!("{head} }}")
        } else {
            format!("{head} {content} }}")
        })
    }

    pub(crate) fn lower_try(
        &mut self,
        block: &[Stmt],
        catch: Option<&CatchClause>,
        finally: Option<&[Stmt]>,
        ctx: &GenContext,
    ) -> EmitResult<String> {
        let statement_label = ctx.statement_label.clone();
        let ctx_new = cleared_statement_label(ctx);

        let try_block = self.lower_control_flow_body(block, &ctx_new, None, false)?;
        let catch_block = match catch {
            Some(catch) => self.lower_catch(catch, &ctx_new)?,
            None => "{ }".to_string(),
        };
        let try_sep = if try_block.contains('\n') { "\n" } else { " " };
        let catch_sep = if catch_block.contains('\n') { "\n" } else { " " };
        let mut text = format!("try{try_sep}{try_block}\n/* catch */{catch_sep}{catch_block} ;");

        if let Some(finally) = finally {
            let finally_block = self.lower_block(finally, &ctx_new)?;
            text = format!(
                "protect\n{{\n{}\n}}\n/* finally */\n{{\n{}\n}} ;",
                text.indent(1),
                finally_block.indent(1)
            );
        }
        Ok(wrap_label(text, &statement_label))
    }
}
