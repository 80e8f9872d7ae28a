//! Class lowering.
//!
//! A class becomes an sclang class block:
//!
//! ```text
//! Point : Shape
//! {
//!     var <>prtstosc__store__x = 0 ;
//!
//!     x { ^this.prtstosc__store__x ; }
//!     x_ { |tstosc__setter_arg| this.prtstosc__store__x = tstosc__setter_arg ; }
//!
//!     *new { ... }
//!     initTStoSCPoint { ... }
//! }
//! ```
//!
//! sclang builds instances in a class method (`*new`) that must return the
//! object, and offers no closure shared between that method and instance
//! methods. A constructor is therefore split after its last `super(...)`
//! call: the prefix runs in `*new`, which then calls `initTStoSC<Name>` on
//! the built instance, passing the original arguments and a dictionary of
//! every local the prefix declared. The init method destructures that
//! dictionary back into locals and runs the rest of the constructor.

use rustc_hash::FxHashSet;
use tssc_common::{Indent, Span};
use tssc_syntax::query::contains_super_call;
use tssc_syntax::{
    ClassDecl, ClassMemberKind, Expr, ExprKind, FunctionBody, FunctionKind, FunctionLike, PropertyName,
};

use super::functions::{ParamGroups, closure};
use super::{Emitter, wrap_braces};
use crate::context::{
    GenContext, SuperMeans, ThisBinding, at_value_position, generating_constructor,
    generating_method, indent, make_super_means, make_this_binding, standalone, with_class_info,
};
use crate::error::EmitResult;
use crate::hoist::extract_declarations;
use crate::names::{
    BUILT_INSTANCE, BUILTIN_CLASS_PREFIX, INIT_METHOD_PREFIX, SETTER_ARG, destructured_param, field_store,
};

/// `name body`, or `name\nbody` when the body spans lines.
fn method(name: &str, body: &str) -> String {
    let sep = if body.contains('\n') { "\n" } else { " " };
    format!("{name}{sep}{body}")
}

fn static_prefix(is_static: bool) -> &'static str {
    if is_static { "*" } else { "" }
}

/// Members rendered per section, in source order within each.
#[derive(Default)]
struct ClassSections {
    vars: Vec<String>,
    accessors: Vec<String>,
    methods: Vec<String>,
}

impl ClassSections {
    fn render(self) -> String {
        [self.vars, self.accessors, self.methods]
            .into_iter()
            .filter(|section| !section.is_empty())
            .map(|section| section.join("\n"))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Emitter<'_> {
    /// Lower a class under `name`, the name chosen when it was extracted.
    #[tracing::instrument(level = "debug", skip_all, fields(class = name))]
    pub fn lower_class(&mut self, class: &ClassDecl, name: &str, ctx: &GenContext) -> EmitResult<String> {
        let span = class.name.as_ref().map_or(class.span, |ident| ident.span);
        let class_name = self.escape_class(name, span);
        let super_class = match &class.extends {
            Some(extends) => Some(self.lower_inherits(extends)?),
            None => None,
        };

        let ctx = with_class_info(ctx, &class_name, super_class.as_deref().unwrap_or("Object"));
        let ctx = make_super_means(&ctx, SuperMeans::AsItIs);
        let members = self.lower_class_members(class, &ctx)?;

        let header = match &super_class {
            Some(super_class) => format!("{class_name} : {super_class}"),
            None => class_name,
        };
        Ok(if members.is_empty() {
            format!("{header}\n{{\n}}")
        } else {
            format!("{header}\n{{\n{}\n}}", members.indent(1))
        })
    }

    /// The class after `extends`. sclang only accepts a class name there.
    fn lower_inherits(&mut self, extends: &Expr) -> EmitResult<String> {
        match &extends.skip_parens().kind {
            ExprKind::Ident(ident) => {
                if self.types.from_default_library(extends.id) {
                    Ok(format!("{BUILTIN_CLASS_PREFIX}{}", ident.text))
                } else {
                    Ok(self.escape_class(&ident.text, ident.span))
                }
            }
            _ => Err(self.unsupported_type(
                extends.span,
                format!(
                    "The inheriting class expression with syntax kind \"{}\" is not supported.",
                    extends.kind.kind_name()
                ),
            )),
        }
    }

    fn lower_member_name(&mut self, name: &PropertyName, span: Span) -> EmitResult<String> {
        match name {
            PropertyName::Ident(ident) => Ok(self.escape_var(&ident.text, ident.span)),
            PropertyName::String(text) => Ok(self.escape_var(text, span)),
            PropertyName::Private(ident) => {
                self.warn(
                    ident.span,
                    format!(
                        "SCLang does not support private-identifier in class. Converting \"{}\" to normal members.",
                        ident.text
                    ),
                );
                Ok(self.escape_var(&ident.text, ident.span))
            }
            PropertyName::Number(_) | PropertyName::Computed(_) => Err(self.unsupported_type(
                span,
                "The class member name must be an identifier or a string literal.",
            )),
        }
    }

    fn lower_class_members(&mut self, class: &ClassDecl, ctx: &GenContext) -> EmitResult<String> {
        // Overload signatures share their name with the implementation.
        let implemented: FxHashSet<&str> = class
            .members
            .iter()
            .filter_map(|member| match &member.kind {
                ClassMemberKind::Method { name, func, .. } if func.body.is_some() => name.static_text(),
                _ => None,
            })
            .collect();

        let mut sections = ClassSections::default();
        for member in &class.members {
            match &member.kind {
                ClassMemberKind::Property {
                    name, init, is_static, ..
                } => {
                    let name = self.lower_member_name(name, member.span)?;
                    let store = field_store(&name);
                    let init = match init {
                        Some(init) => format!(" = {}", self.lower_expr(init, &at_value_position(ctx))?),
                        None => String::new(),
                    };
                    let keyword = if *is_static { "classvar" } else { "var" };
                    let star = static_prefix(*is_static);
                    sections.vars.push(format!("{keyword} <>{store}{init} ;"));
                    sections.accessors.push(format!(
                        "{star}{name} {{ ^this.{store} ; }}\n\
                         {star}{name}_ {{ |{SETTER_ARG}| this.{store} = {SETTER_ARG} ; }}"
                    ));
                }

                ClassMemberKind::Method { name, is_static, func } => {
                    if func.body.is_none() && name.static_text().is_some_and(|text| implemented.contains(text)) {
                        continue;
                    }
                    let name = self.lower_member_name(name, member.span)?;
                    let body = self.lower_method_body(func, *is_static, ctx)?;
                    sections
                        .methods
                        .push(method(&format!("{}{name}", static_prefix(*is_static)), &body));
                }

                ClassMemberKind::GetAccessor { name, is_static, func } => {
                    let name = self.lower_member_name(name, member.span)?;
                    let body = self.lower_method_body(func, *is_static, ctx)?;
                    sections
                        .accessors
                        .push(method(&format!("{}{name}", static_prefix(*is_static)), &body));
                }

                ClassMemberKind::SetAccessor { name, is_static, func } => {
                    let name = self.lower_member_name(name, member.span)?;
                    let body = self.lower_method_body(func, *is_static, ctx)?;
                    sections
                        .accessors
                        .push(method(&format!("{}{name}_", static_prefix(*is_static)), &body));
                }

                ClassMemberKind::Constructor(func) => {
                    if let Some([new, init]) = self.lower_constructor(func, ctx)? {
                        sections.methods.push(new);
                        sections.methods.push(init);
                    }
                }

                ClassMemberKind::StaticBlock(stmts) => {
                    let block_ctx = self.function_ctx(FunctionKind::Method, ctx);
                    let block_ctx = generating_method(&block_ctx, true);
                    let block_ctx = make_super_means(&block_ctx, SuperMeans::ClassName);
                    let block_ctx = make_this_binding(&block_ctx, ThisBinding::Itself);
                    let block_ctx = standalone(&block_ctx, true);
                    let body = wrap_braces(&self.lower_block(stmts, &block_ctx)?);
                    sections.methods.push(method("*initClass", &body));
                }

                ClassMemberKind::Semicolon | ClassMemberKind::IndexSignature => {}
            }
        }
        Ok(sections.render())
    }

    fn lower_method_body(&mut self, func: &FunctionLike, is_static: bool, ctx: &GenContext) -> EmitResult<String> {
        let ctx = if is_static {
            make_super_means(ctx, SuperMeans::ClassName)
        } else {
            ctx.clone()
        };
        let ctx = make_this_binding(&generating_method(&ctx, true), ThisBinding::Itself);
        if func.body.is_none() {
            return Ok("{ }".to_string());
        }
        self.lower_function(func, &ctx)
    }

    // =========================================================================
    // Constructor
    // =========================================================================

    /// `*new` and `initTStoSC<Name>`, or nothing for a constructor without
    /// a body.
    fn lower_constructor(&mut self, func: &FunctionLike, ctx: &GenContext) -> EmitResult<Option<[String; 2]>> {
        let Some(FunctionBody::Block(stmts)) = &func.body else {
            return Ok(None);
        };
        let ctx = self.function_ctx(FunctionKind::Constructor, ctx);
        let ctx = generating_method(&generating_constructor(&ctx, true), true);
        let ctx = make_this_binding(&ctx, ThisBinding::BuiltInstance);
        let init_name = format!("{INIT_METHOD_PREFIX}{}", ctx.class_info.name);

        let split = stmts.iter().rposition(contains_super_call);
        let (prefix, suffix) = stmts.split_at(split.map_or(0, |k| k + 1));
        let captured = extract_declarations(prefix)?.captured_names();
        tracing::debug!(?split, captured = captured.len(), "splitting constructor");

        let groups = ParamGroups::classify(&func.params);

        // *new
        let init_args = self.init_call_args(&groups, &captured);
        let mut new_body = Vec::with_capacity(prefix.len() + 3);
        new_body.push(self.synth.let_(BUILT_INSTANCE, None));
        if split.is_some() {
            new_body.extend(prefix.iter().cloned());
        } else {
            let super_call = self.synth.call(self.synth.super_(), Vec::new());
            new_body.push(self.synth.expr_stmt(super_call));
        }
        let init_call = self
            .synth
            .call(self.synth.member(self.synth.id(BUILT_INSTANCE), &init_name), init_args);
        new_body.push(self.synth.ret(Some(init_call)));

        let arg_line = self.arg_line(&groups, &ctx)?;
        let destructs = self.destructure_params(&groups, &ctx)?;
        let body = self.lower_block(&new_body, &indent(&standalone(&ctx, true), 1))?;
        let new = closure(&arg_line, &[&destructs, &body]);

        // initTStoSC<Name>
        let capture_pattern = self.synth.object_pattern(
            captured
                .iter()
                .map(|name| self.synth.element(self.synth.bind(name)))
                .collect(),
        );
        let mut init_groups = ParamGroups::classify(&func.params);
        init_groups.destructured.push((&capture_pattern, None));
        let init_ctx = make_this_binding(&generating_constructor(&ctx, false), ThisBinding::Itself);

        let mut init_body = suffix.to_vec();
        init_body.push(self.synth.ret(Some(self.synth.this())));

        let init_arg_line = self.arg_line(&init_groups, &init_ctx)?;
        let init_destructs = self.destructure_params(&init_groups, &init_ctx)?;
        let body = self.lower_block(&init_body, &indent(&standalone(&init_ctx, true), 1))?;
        let init = closure(&init_arg_line, &[&init_destructs, &body]);

        Ok(Some([method("*new", &new), method(&init_name, &init)]))
    }

    /// Arguments `*new` passes on: the parameters as received, the capture
    /// dictionary, then the rest parameter spread.
    fn init_call_args(&self, groups: &ParamGroups<'_>, captured: &[String]) -> Vec<Expr> {
        let synth = &self.synth;
        let mut args = Vec::new();
        args.extend(groups.trivial.iter().map(|&(name, _)| synth.id(name)));
        args.extend(groups.omittable.iter().map(|(ident, _)| synth.id(&ident.text)));
        args.extend((0..groups.destructured.len()).map(|index| synth.id(&destructured_param(index))));
        args.push(synth.object(captured.iter().map(|name| synth.shorthand(name)).collect()));
        if let Some((name, _)) = groups.rest {
            args.push(synth.spread(synth.id(name)));
        }
        args
    }
}
