//! Expression dispatch.

use tssc_syntax::query::contains_self_increment;
use tssc_syntax::{BinaryOp, Expr, ExprKind, PostfixOp, PrefixOp};

use super::Emitter;
use super::literals::quote;
use crate::context::{
    GenContext, SuperMeans, ThisBinding, at_value_position, generating_class_name, make_super_means,
};
use crate::error::EmitResult;
use crate::names::{
    BUILT_INSTANCE, DESTRUCTURED_PARAM_PREFIX, POST_DECREMENT, POST_INCREMENT, PRE_DECREMENT,
    PRE_INCREMENT, THIS_PARAM,
};

/// Operators sclang has no infix form for, rendered as `f(left, right)`.
fn call_form(op: BinaryOp) -> Option<&'static str> {
    Some(match op {
        BinaryOp::BitAnd => "bitAnd",
        BinaryOp::BitOr => "bitOr",
        BinaryOp::BitXor => "bitXor",
        BinaryOp::Shl => "leftShift",
        BinaryOp::Shr => "rightShift",
        BinaryOp::UShr => "unsignedRightShift",
        BinaryOp::Coalesce => "TSTOSC.orElse",
        _ => return None,
    })
}

fn infix_form(op: BinaryOp) -> Option<&'static str> {
    match op {
        BinaryOp::StrictEq => Some("=="),
        BinaryOp::StrictNotEq => Some("!="),
        BinaryOp::Add
        | BinaryOp::Sub
        | BinaryOp::Mul
        | BinaryOp::Div
        | BinaryOp::Mod
        | BinaryOp::Exp
        | BinaryOp::Assign
        | BinaryOp::Eq
        | BinaryOp::NotEq
        | BinaryOp::Lt
        | BinaryOp::Gt
        | BinaryOp::LtEq
        | BinaryOp::GtEq
        | BinaryOp::And
        | BinaryOp::Or => Some(op.as_str()),
        _ => None,
    }
}

/// `\key`, or `'key'` when the key is not a plain word.
fn symbol(key: &str) -> String {
    if !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        format!("\\{key}")
    } else {
        format!("'{}'", key.replace('\'', "\\'"))
    }
}

impl Emitter<'_> {
    /// Lower an expression. The result carries no terminator.
    ///
    /// While the context still has an unhandled `++`/`--`, the first
    /// composite expression holding one is rewritten as a whole (see
    /// `self_increment`), so the result can span several lines.
    pub fn lower_expr(&mut self, expr: &Expr, ctx: &GenContext) -> EmitResult<String> {
        let is_atom = matches!(
            expr.kind,
            ExprKind::Ident(_)
                | ExprKind::Number(_)
                | ExprKind::String(_)
                | ExprKind::NoSubstTemplate(_)
                | ExprKind::Bool(_)
        );
        if !is_atom && ctx.has_unhandled_self_increment && contains_self_increment(expr) {
            return self.lower_self_increment(expr, ctx);
        }

        match &expr.kind {
            ExprKind::Ident(ident) => Ok(self.lower_identifier(ident, expr.id, ctx)),
            ExprKind::Number(lit) => Ok(self.lower_number(lit, expr.span)),
            ExprKind::String(text) | ExprKind::NoSubstTemplate(text) => Ok(quote(text)),
            ExprKind::Bool(value) => Ok(value.to_string()),

            ExprKind::Template { head, spans } => self.lower_template(head, spans, ctx),
            ExprKind::TaggedTemplate { tag, template } => self.lower_tagged_template(tag, template, ctx),
            ExprKind::Null => {
                self.warn_nil(expr.span);
                Ok("nil".to_string())
            }
            ExprKind::Array(elements) => self.lower_array(elements, ctx),
            ExprKind::Object(members) => self.lower_object(members, ctx),
            ExprKind::Function(func) => self.lower_function(func, ctx),

            ExprKind::This => self.lower_this(expr, ctx),
            ExprKind::Super => self.lower_super(expr, ctx),

            ExprKind::PropertyAccess { object, name } => {
                let target = self.lower_expr(object, &at_value_position(ctx))?;
                let name = self.escape_var(&name.text, name.span);
                let bracketed = self.holds_object_literal(object)
                    || (matches!(object.kind, ExprKind::This)
                        && ctx.this_binding == ThisBinding::ObjectLiteralParameter);
                Ok(if bracketed {
                    format!("{target}[\"{name}\"]")
                } else {
                    format!("{target}.{name}")
                })
            }
            ExprKind::ElementAccess { object, index } => {
                let value_ctx = at_value_position(ctx);
                let target = self.lower_expr(object, &value_ctx)?;
                let index = self.lower_expr(index, &value_ctx)?;
                Ok(format!("{target}[{index}]"))
            }

            ExprKind::Call { callee, args } => self.lower_call(callee, args, ctx),
            ExprKind::New { callee, args } => {
                let class_ctx = match callee.kind {
                    ExprKind::Ident(_) => generating_class_name(&at_value_position(ctx), true),
                    _ => at_value_position(ctx),
                };
                let class_name = self.lower_expr(callee, &class_ctx)?;
                let args = match args {
                    Some(args) => self.lower_args(args, ctx)?,
                    None => String::new(),
                };
                Ok(format!("{class_name}.new({args})"))
            }

            ExprKind::Paren(inner) => Ok(format!("({})", self.lower_expr(inner, &at_value_position(ctx))?)),
            ExprKind::Prefix { op, operand } => self.lower_prefix(*op, operand, ctx),
            ExprKind::Postfix { op, operand } => {
                let helper = match op {
                    PostfixOp::Increment => POST_INCREMENT,
                    PostfixOp::Decrement => POST_DECREMENT,
                };
                self.lower_self_update(operand, helper, ctx)
            }
            ExprKind::Binary { left, op, right } => self.lower_binary(expr, left, *op, right, ctx),
            ExprKind::Conditional {
                cond,
                when_true,
                when_false,
            } => {
                let value_ctx = at_value_position(ctx);
                Ok(format!(
                    "if({}, {}, {})",
                    self.lower_expr(cond, &value_ctx)?,
                    self.lower_expr(when_true, &value_ctx)?,
                    self.lower_expr(when_false, &value_ctx)?
                ))
            }

            // Classes are extracted separately; spreads and holes are handled
            // by their enclosing array or call.
            ExprKind::Class(_) | ExprKind::Spread(_) | ExprKind::Omitted => Ok(String::new()),

            ExprKind::TypeErased { expr: inner, .. } => self.lower_expr(inner, ctx),

            ExprKind::Regex(_)
            | ExprKind::TypeOf(_)
            | ExprKind::Await(_)
            | ExprKind::Yield(_)
            | ExprKind::Delete(_)
            | ExprKind::Void(_)
            | ExprKind::MetaProperty { .. } => Err(self.unsupported_type(
                expr.span,
                format!(
                    "The expression with syntax kind \"{}\" is not supported.",
                    expr.kind.kind_name()
                ),
            )),
        }
    }

    /// Whether `expr` evaluates to a `TSTOSC__ObjectLiteral`, whose members
    /// are reached by key rather than by message.
    pub(crate) fn holds_object_literal(&self, expr: &Expr) -> bool {
        match &expr.kind {
            ExprKind::This | ExprKind::Super => false,
            ExprKind::Ident(ident) if ident.text.starts_with(DESTRUCTURED_PARAM_PREFIX) => true,
            _ => self.types.is_object_literal(expr.id),
        }
    }

    // =========================================================================
    // this / super
    // =========================================================================

    fn lower_this(&mut self, expr: &Expr, ctx: &GenContext) -> EmitResult<String> {
        match ctx.this_binding {
            ThisBinding::ObjectLiteralParameter => Ok(THIS_PARAM.to_string()),
            ThisBinding::BuiltInstance => Ok(BUILT_INSTANCE.to_string()),
            ThisBinding::Itself => Ok("this".to_string()),
            ThisBinding::Nothing => Err(self.type_error(expr.span, "`this` here is not associated with outside.")),
        }
    }

    fn lower_super(&mut self, expr: &Expr, ctx: &GenContext) -> EmitResult<String> {
        match ctx.super_means {
            SuperMeans::Constructor => Ok("super.new".to_string()),
            SuperMeans::ClassName => Ok(ctx.class_info.super_class_name.clone()),
            SuperMeans::AsItIs => Ok("super".to_string()),
            SuperMeans::Nothing => Err(self.type_error(
                expr.span,
                "`super` here is not associated with a class method/constructor.",
            )),
        }
    }

    // =========================================================================
    // Calls
    // =========================================================================

    /// Comma-separated arguments; spread arguments become `*e`.
    fn lower_args(&mut self, args: &[Expr], ctx: &GenContext) -> EmitResult<String> {
        let value_ctx = at_value_position(ctx);
        let mut out = Vec::with_capacity(args.len());
        for arg in args {
            out.push(match &arg.kind {
                ExprKind::Spread(inner) => format!("*{}", self.lower_expr(inner, &value_ctx)?),
                _ => self.lower_expr(arg, &value_ctx)?,
            });
        }
        Ok(out.join(", "))
    }

    /// Whether calling `callee` sends a message (`o.m(x)`) rather than
    /// evaluating a function value (`f.(x)`).
    fn is_method(&self, callee: &Expr) -> bool {
        match &callee.kind {
            ExprKind::PropertyAccess { object, .. } => !self.holds_object_literal(object),
            _ => self.types.is_method(callee.id),
        }
    }

    fn lower_call(&mut self, callee: &Expr, args: &[Expr], ctx: &GenContext) -> EmitResult<String> {
        let constructor_super = matches!(callee.kind, ExprKind::Super) && ctx.is_generating_constructor;
        let callee_ctx = if constructor_super {
            make_super_means(&at_value_position(ctx), SuperMeans::Constructor)
        } else {
            at_value_position(ctx)
        };
        let target = self.lower_expr(callee, &callee_ctx)?;
        let dot = if constructor_super || self.is_method(callee) {
            ""
        } else {
            "."
        };
        let call = format!("{target}{dot}({})", self.lower_args(args, ctx)?);

        Ok(if constructor_super {
            format!("({BUILT_INSTANCE} = {call})")
        } else {
            call
        })
    }

    // =========================================================================
    // Operators
    // =========================================================================

    fn lower_prefix(&mut self, op: PrefixOp, operand: &Expr, ctx: &GenContext) -> EmitResult<String> {
        let value_ctx = at_value_position(ctx);
        match op {
            PrefixOp::Plus => self.lower_expr(operand, &value_ctx),
            PrefixOp::Minus => Ok(format!("-{}", self.lower_expr(operand, &value_ctx)?)),
            PrefixOp::Not => Ok(format!("not({})", self.lower_expr(operand, &value_ctx)?)),
            PrefixOp::BitNot => Ok(format!("bitNot({})", self.lower_expr(operand, &value_ctx)?)),
            PrefixOp::Increment => self.lower_self_update(operand, PRE_INCREMENT, ctx),
            PrefixOp::Decrement => self.lower_self_update(operand, PRE_DECREMENT, ctx),
        }
    }

    fn lower_binary(
        &mut self,
        expr: &Expr,
        left: &Expr,
        op: BinaryOp,
        right: &Expr,
        ctx: &GenContext,
    ) -> EmitResult<String> {
        let value_ctx = at_value_position(ctx);

        if let Some(infix) = infix_form(op) {
            let left = self.lower_expr(left, &value_ctx)?;
            let right = self.lower_expr(right, &value_ctx)?;
            return Ok(format!("{left} {infix} {right}"));
        }
        if let Some(function) = call_form(op) {
            let left = self.lower_expr(left, &value_ctx)?;
            let right = self.lower_expr(right, &value_ctx)?;
            return Ok(format!("{function}({left}, {right})"));
        }
        if let Some(base) = op.compound_base() {
            let b = &self.synth;
            let desugared = b.assign(left.clone(), b.binary(left.clone(), base, right.clone()));
            return self.lower_expr(&desugared, ctx);
        }

        match op {
            BinaryOp::InstanceOf => {
                let value = self.lower_expr(left, &value_ctx)?;
                let class_name = self.lower_expr(right, &generating_class_name(&value_ctx, true))?;
                Ok(format!("{value}.isKindOf({class_name})"))
            }
            BinaryOp::In => {
                let key = match &left.skip_parens().kind {
                    ExprKind::String(text) => text.clone(),
                    ExprKind::Ident(ident) => ident.text.clone(),
                    _ => {
                        return Err(self.unsupported_type(
                            left.span,
                            "The left side of \"in\" must be a string or an identifier.",
                        ));
                    }
                };
                let target = self.lower_expr(right, &value_ctx)?;
                Ok(format!("{target}.respondsTo({})", symbol(&key)))
            }
            _ => Err(self.unsupported_type(
                expr.span,
                format!("The operator \"{}\" is not supported.", op.as_str()),
            )),
        }
    }
}
