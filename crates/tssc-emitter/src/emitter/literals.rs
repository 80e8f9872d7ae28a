use tssc_common::Span;
use tssc_syntax::{
    Expr, ExprKind, FunctionKind, NumberLit, ObjectMember, ObjectMemberKind, PropertyName,
    TemplateSpan,
};

use super::Emitter;
use crate::context::{
    GenContext, ThisBinding, at_value_position, generating_method, generating_object_literal_member,
    make_this_binding,
};
use crate::error::{EmitError, EmitResult};
use crate::names::{OBJECT_LITERAL_CLASS, THIS_PARAM};

/// Largest magnitude sclang keeps as an integer literal, exclusive.
const INT32_LIMIT: u128 = (1 << 32) - 1;
const INT64_LIMIT: u128 = (1 << 64) - 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NumericBand {
    Integer,
    /// Fits a 64-bit float exactly.
    Exact,
    Lossy,
}

pub(crate) fn numeric_band(digits: &str, radix: u32) -> NumericBand {
    match u128::from_str_radix(digits, radix) {
        Ok(value) if value < INT32_LIMIT => NumericBand::Integer,
        Ok(value) if value < INT64_LIMIT => NumericBand::Exact,
        _ => NumericBand::Lossy,
    }
}

/// Drop leading zeros, keeping at least one digit.
fn trim_leading_zeros(digits: &str) -> &str {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() && !digits.is_empty() {
        "0"
    } else {
        trimmed
    }
}

/// sclang string literal.
pub(crate) fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl Emitter<'_> {
    // =========================================================================
    // Numbers
    // =========================================================================

    /// Render a numeric literal. Integers beyond sclang's 32-bit literal range
    /// become floats, with a warning.
    pub(crate) fn lower_number(&mut self, lit: &NumberLit, span: Span) -> String {
        let cleaned: String = lit.raw.chars().filter(|&c| c != '_').collect();
        let cleaned = cleaned.strip_suffix('n').unwrap_or(&cleaned);

        let lower = cleaned.to_ascii_lowercase();
        let (prefix, digits, radix) = if lower.starts_with("0x") {
            ("0x", &cleaned[2..], 16)
        } else if lower.starts_with("0o") {
            ("8r", &cleaned[2..], 8)
        } else if lower.starts_with("0b") {
            ("2r", &cleaned[2..], 2)
        } else if cleaned.contains(['.', 'e', 'E']) {
            return cleaned.to_string();
        } else {
            ("", cleaned, 10)
        };
        let digits = trim_leading_zeros(digits);

        let suffix = match numeric_band(digits, radix) {
            NumericBand::Integer => "",
            band => {
                let hint = if band == NumericBand::Exact {
                    "without lost of precision"
                } else {
                    "with lost of precision"
                };
                let (line, column) = self.line_col(span);
                self.warn(
                    span,
                    format!(
                        "The number {} at line {line}, column {column}, will be converted to 64-digit float number {hint}.",
                        lit.raw
                    ),
                );
                ".0"
            }
        };

        format!("{prefix}{digits}{suffix}")
    }

    // =========================================================================
    // Templates
    // =========================================================================

    /// `"head" ++ e1 ++ "mid" ++ e2`; empty literal parts after a
    /// substitution are skipped.
    pub(crate) fn lower_template(
        &mut self,
        head: &str,
        spans: &[TemplateSpan],
        ctx: &GenContext,
    ) -> EmitResult<String> {
        let mut parts = vec![quote(head)];
        for span in spans {
            parts.push(self.lower_expr(&span.expr, &at_value_position(ctx))?);
            if !span.literal.is_empty() {
                parts.push(quote(&span.literal));
            }
        }
        Ok(parts.join(" ++ "))
    }

    /// ``tag`a${x}b` `` calls the tag with the literal parts, then each
    /// substitution.
    pub(crate) fn lower_tagged_template(
        &mut self,
        tag: &Expr,
        template: &Expr,
        ctx: &GenContext,
    ) -> EmitResult<String> {
        let b = &self.synth;
        let (strings, substitutions) = match &template.kind {
            ExprKind::Template { head, spans } => {
                let mut strings = vec![b.str(head)];
                let mut substitutions = Vec::with_capacity(spans.len());
                for span in spans {
                    strings.push(b.str(&span.literal));
                    substitutions.push(span.expr.clone());
                }
                (strings, substitutions)
            }
            ExprKind::NoSubstTemplate(text) | ExprKind::String(text) => (vec![b.str(text)], Vec::new()),
            _ => {
                return Err(self.unsupported_type(
                    template.span,
                    format!(
                        "The template with syntax kind \"{}\" is not supported.",
                        template.kind.kind_name()
                    ),
                ));
            }
        };
        let mut args = vec![b.array(strings)];
        args.extend(substitutions);
        let call = Expr {
            span: tag.span.cover(template.span),
            ..b.call(tag.clone(), args)
        };
        self.lower_expr(&call, ctx)
    }

    // =========================================================================
    // Arrays
    // =========================================================================

    /// `[a, b] ++ spread ++ [c]`; holes become `nil`.
    pub(crate) fn lower_array(&mut self, elements: &[Expr], ctx: &GenContext) -> EmitResult<String> {
        let value_ctx = at_value_position(ctx);
        let mut segments: Vec<String> = Vec::new();
        let mut chunk: Vec<String> = Vec::new();

        for (index, element) in elements.iter().enumerate() {
            match &element.kind {
                ExprKind::Spread(inner) => {
                    if !chunk.is_empty() {
                        segments.push(format!("[{}]", chunk.join(", ")));
                        chunk.clear();
                    } else if index == 0 {
                        segments.push("[]".to_string());
                    }
                    segments.push(self.lower_expr(inner, &value_ctx)?);
                }
                ExprKind::Omitted => chunk.push("nil".to_string()),
                _ => chunk.push(self.lower_expr(element, &value_ctx)?),
            }
        }
        if !chunk.is_empty() || segments.is_empty() {
            segments.push(format!("[{}]", chunk.join(", ")));
        }

        Ok(segments.join(" ++ "))
    }

    // =========================================================================
    // Object literals
    // =========================================================================

    fn object_member_ctx(ctx: &GenContext) -> GenContext {
        let ctx = generating_object_literal_member(&at_value_position(ctx), true);
        let ctx = make_this_binding(&ctx, ThisBinding::ObjectLiteralParameter);
        generating_method(&ctx, true)
    }

    fn lower_object_key(&mut self, name: &PropertyName, ctx: &GenContext) -> EmitResult<String> {
        Ok(match name {
            PropertyName::Ident(ident) => quote(&ident.text),
            PropertyName::Private(ident) => {
                self.warn(
                    ident.span,
                    format!(
                        "SCLang does not support private members in Dictionary. Converting \"{}\" to normal members.",
                        ident.text
                    ),
                );
                quote(&ident.text)
            }
            PropertyName::String(text) => quote(text),
            PropertyName::Number(lit) => self.lower_number(lit, Span::DUMMY),
            PropertyName::Computed(expr) => self.lower_expr(expr, &at_value_position(ctx))?,
        })
    }

    fn lower_object_member(&mut self, member: &ObjectMember, ctx: &GenContext) -> EmitResult<String> {
        let (key, value) = match &member.kind {
            ObjectMemberKind::Property { name, value } => {
                let key = self.lower_object_key(name, ctx)?;
                let value = match &value.kind {
                    ExprKind::Function(func) if func.kind != FunctionKind::Arrow => {
                        self.lower_function(func, &Self::object_member_ctx(ctx))?
                    }
                    _ => self.lower_expr(value, &at_value_position(ctx))?,
                };
                (key, value)
            }
            ObjectMemberKind::Shorthand(ident) => {
                let value = self.escape_var(&ident.text, ident.span);
                (quote(&ident.text), value)
            }
            ObjectMemberKind::Method { name, func } => {
                let key = self.lower_object_key(name, ctx)?;
                let value = if func.body.is_some() {
                    self.lower_function(func, &Self::object_member_ctx(ctx))?
                } else {
                    format!("{{ |{THIS_PARAM}| }}")
                };
                (key, value)
            }
            ObjectMemberKind::Accessor { .. } => {
                return Err(self.unsupported_syntax(
                    member.span,
                    "Accessors in object literals are not supported.",
                ));
            }
            ObjectMemberKind::Spread(_) => {
                return Err(EmitError::internal("object spread reached pair lowering"));
            }
        };
        Ok(format!("{key} -> {value}"))
    }

    /// `TSTOSC__ObjectLiteral.new(Dictionary["k" -> v, ...].putAll(s))`.
    pub(crate) fn lower_object(&mut self, members: &[ObjectMember], ctx: &GenContext) -> EmitResult<String> {
        let mut pairs = Vec::new();
        let mut spreads = String::new();
        for member in members {
            if let ObjectMemberKind::Spread(expr) = &member.kind {
                let value = self.lower_expr(expr, &at_value_position(ctx))?;
                spreads.push_str(&format!(".putAll({value})"));
            } else {
                pairs.push(self.lower_object_member(member, ctx)?);
            }
        }
        Ok(format!(
            "{OBJECT_LITERAL_CLASS}.new(Dictionary[{}]{spreads})",
            pairs.join(", ")
        ))
    }
}
