//! Declaration hoisting and binding-pattern flattening.
//!
//! sclang requires every local to be declared with `var` at the top of its
//! closure, before any statement. A block's declarations are therefore
//! collected up front and rendered as one `var` line per declaration kind.

use tssc_syntax::query::contains_self_increment;
use tssc_syntax::{
    AstBuilder, BinaryOp, BindingElement, BindingName, Expr, ExprKind, ForInit, ObjectMember,
    ObjectMemberKind, PropertyName, Stmt, StmtKind, VarDeclList, VarKind,
};

use crate::context::{GenContext, at_value_position, standalone, with_unhandled_self_increment};
use crate::emitter::Emitter;
use crate::error::{EmitError, EmitResult};

/// Declared name and its initializer, in declaration order.
pub type DeclCollection = Vec<(String, Option<Expr>)>;

/// Marker written into `var /* <kind> */` lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Let,
    Const,
    Var,
    Loopvar,
    Function,
    Param,
    Catchvar,
}

impl DeclKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            DeclKind::Let => "let",
            DeclKind::Const => "const",
            DeclKind::Var => "var",
            DeclKind::Loopvar => "loopvar",
            DeclKind::Function => "function",
            DeclKind::Param => "param",
            DeclKind::Catchvar => "catchvar",
        }
    }
}

impl From<VarKind> for DeclKind {
    fn from(kind: VarKind) -> Self {
        match kind {
            VarKind::Let => DeclKind::Let,
            VarKind::Const => DeclKind::Const,
            VarKind::Var => DeclKind::Var,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Declarations {
    pub lets: DeclCollection,
    pub consts: DeclCollection,
    pub vars: DeclCollection,
    pub loopvars: DeclCollection,
    pub functions: DeclCollection,
}

impl Declarations {
    pub fn is_empty(&self) -> bool {
        self.groups().iter().all(|(_, collection)| collection.is_empty())
    }

    /// Every declared name except loop variables, in rendering order.
    pub fn captured_names(&self) -> Vec<String> {
        self.lets
            .iter()
            .chain(&self.consts)
            .chain(&self.vars)
            .chain(&self.functions)
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn groups(&self) -> [(DeclKind, &DeclCollection); 5] {
        [
            (DeclKind::Let, &self.lets),
            (DeclKind::Const, &self.consts),
            (DeclKind::Var, &self.vars),
            (DeclKind::Loopvar, &self.loopvars),
            (DeclKind::Function, &self.functions),
        ]
    }
}

fn is_class_expr(expr: &Expr) -> bool {
    matches!(expr.skip_parens().kind, ExprKind::Class(_))
}

/// Flatten one declaration list into `collection`. Class expression
/// initializers are left out; those classes are extracted separately.
pub(crate) fn flatten_var_list(list: &VarDeclList, collection: &mut DeclCollection) -> EmitResult<()> {
    for decl in &list.decls {
        if decl.init.as_ref().is_some_and(is_class_expr) {
            continue;
        }
        collection.extend(solve_binding(&decl.name, decl.init.as_ref())?);
    }
    Ok(())
}

fn loop_head(stmt: &Stmt) -> Option<&ForInit> {
    match &stmt.kind {
        StmtKind::For { init, .. } => init.as_ref(),
        StmtKind::ForIn { init, .. } | StmtKind::ForOf { init, .. } => Some(init),
        StmtKind::Labeled { body, .. } => loop_head(body),
        _ => None,
    }
}

/// Collect the declarations a block introduces at its own level.
pub fn extract_declarations(stmts: &[Stmt]) -> EmitResult<Declarations> {
    let mut decls = Declarations::default();

    for stmt in stmts {
        match &stmt.kind {
            StmtKind::Variable(list) => {
                let collection = match list.kind {
                    VarKind::Let => &mut decls.lets,
                    VarKind::Const => &mut decls.consts,
                    VarKind::Var => &mut decls.vars,
                };
                flatten_var_list(list, collection)?;
            }
            StmtKind::FunctionDecl(func) => {
                if let Some(name) = &func.name {
                    decls.functions.push((name.text.clone(), None));
                }
            }
            _ => {
                if let Some(ForInit::VarDecls(list)) = loop_head(stmt) {
                    flatten_var_list(list, &mut decls.loopvars)?;
                }
            }
        }
    }

    Ok(decls)
}

// =============================================================================
// Binding patterns
// =============================================================================

fn element_access(b: &AstBuilder, init: &Expr, index: usize) -> Expr {
    b.index(init.clone(), b.num(&index.to_string()))
}

fn or_default(b: &AstBuilder, value: Expr, default: Option<&Expr>) -> Expr {
    match default {
        Some(default) => b.binary(value, BinaryOp::Coalesce, default.clone()),
        None => value,
    }
}

fn push_binding(
    out: &mut DeclCollection,
    name: &BindingName,
    value: Option<Expr>,
) -> EmitResult<()> {
    match name {
        BindingName::Ident(ident) => {
            out.push((ident.text.clone(), value));
            Ok(())
        }
        pattern => {
            out.extend(solve_binding(pattern, value.as_ref())?);
            Ok(())
        }
    }
}

fn binding_key(element: &BindingElement) -> EmitResult<String> {
    match &element.property_name {
        Some(PropertyName::Computed(_)) => Err(EmitError::UnsupportedSyntax {
            message: "Computed keys in object binding patterns are not supported.".to_string(),
            origin: None,
        }),
        Some(name) => Ok(name.static_text().unwrap_or_default().to_string()),
        None => match &element.name {
            BindingName::Ident(ident) => Ok(ident.text.clone()),
            _ => Err(EmitError::UnsupportedSyntax {
                message: "A nested object binding pattern needs a property name.".to_string(),
                origin: None,
            }),
        },
    }
}

fn literal_member_value(members: &[ObjectMember], key: &str) -> Option<Expr> {
    members.iter().rev().find_map(|member| match &member.kind {
        ObjectMemberKind::Property { name, value } if name.static_text() == Some(key) => {
            Some(value.clone())
        }
        ObjectMemberKind::Shorthand(ident) if ident.text == key => Some(Expr {
            id: tssc_syntax::NodeId::SYNTHETIC,
            span: ident.span,
            kind: ExprKind::Ident(ident.clone()),
        }),
        _ => None,
    })
}

/// Flatten a binding pattern against its initializer, depth-first and left
/// to right.
///
/// - no initializer: every bound name, uninitialized
/// - array pattern, array literal: positional pairs, shortest zip
/// - array pattern, other value: `init[i]`, `init[i] ?? default`
/// - object pattern, object literal: the member with the same key
/// - object pattern, other value: `init.key`, `init.key ?? default`
pub fn solve_binding(pattern: &BindingName, init: Option<&Expr>) -> EmitResult<DeclCollection> {
    let b = AstBuilder::synthetic();
    let mut out = DeclCollection::new();

    let Some(init) = init else {
        for ident in pattern.bound_names() {
            out.push((ident.text.clone(), None));
        }
        return Ok(out);
    };

    match pattern {
        BindingName::Ident(ident) => out.push((ident.text.clone(), Some(init.clone()))),

        BindingName::Array(elements) => match &init.skip_parens().kind {
            ExprKind::Array(values) => {
                for (index, (element, value)) in elements.iter().zip(values).enumerate() {
                    let Some(element) = element else {
                        continue;
                    };
                    if element.rest {
                        let remaining = values[index..].to_vec();
                        push_binding(&mut out, &element.name, Some(b.array(remaining)))?;
                        continue;
                    }
                    let value = match value.kind {
                        ExprKind::Omitted => element.init.clone(),
                        _ => Some(value.clone()),
                    };
                    push_binding(&mut out, &element.name, value)?;
                }
            }
            _ => {
                for (index, element) in elements.iter().enumerate() {
                    let Some(element) = element else {
                        continue;
                    };
                    let value = if element.rest {
                        b.call(
                            b.member(init.clone(), "copyToEnd"),
                            vec![b.num(&index.to_string())],
                        )
                    } else {
                        or_default(&b, element_access(&b, init, index), element.init.as_ref())
                    };
                    push_binding(&mut out, &element.name, Some(value))?;
                }
            }
        },

        BindingName::Object(elements) => {
            let literal_members = match &init.skip_parens().kind {
                ExprKind::Object(members) => Some(members),
                _ => None,
            };
            for element in elements {
                if element.rest {
                    return Err(EmitError::UnsupportedSyntax {
                        message: "Rest elements in object binding patterns are not supported."
                            .to_string(),
                        origin: None,
                    });
                }
                let key = binding_key(element)?;
                let value = match literal_members {
                    Some(members) => {
                        literal_member_value(members, &key).or_else(|| element.init.clone())
                    }
                    None => Some(or_default(
                        &b,
                        b.member(init.clone(), &key),
                        element.init.as_ref(),
                    )),
                };
                push_binding(&mut out, &element.name, value)?;
            }
        }
    }

    Ok(out)
}

// =============================================================================
// Rendering
// =============================================================================

impl Emitter<'_> {
    /// `var /* kind */ a = 1, b ;`, or nothing for an empty collection.
    ///
    /// Initializers holding `++`/`--` are left out; the variable statement
    /// and [`Emitter::binding_lines`] re-emit them once the rewrite prelude
    /// can run.
    pub fn decl_line(
        &mut self,
        kind: DeclKind,
        collection: &DeclCollection,
        ctx: &GenContext,
    ) -> EmitResult<String> {
        if collection.is_empty() {
            return Ok(String::new());
        }
        let mut parts = Vec::with_capacity(collection.len());
        for (name, init) in collection {
            let name = self.escape_var(name, tssc_common::Span::DUMMY);
            match init {
                Some(init) if !contains_self_increment(init) => {
                    let value = self.lower_expr(init, &at_value_position(ctx))?;
                    parts.push(format!("{name} = {value}"));
                }
                _ => parts.push(name),
            }
        }
        Ok(format!("var /* {} */ {} ;", kind.as_str(), parts.join(", ")))
    }

    /// Assignments for the initializers of `collection`: the ones holding
    /// `++`/`--` always, the rest only when `force` is set.
    pub(crate) fn assign_initializers(
        &mut self,
        kind: &str,
        collection: &DeclCollection,
        ctx: &GenContext,
        force: bool,
    ) -> EmitResult<String> {
        let mut lines = Vec::new();
        for (name, init) in collection {
            let Some(init) = init else {
                continue;
            };
            let rewritten = contains_self_increment(init);
            if !force && !rewritten {
                continue;
            }
            let name = Self::escape_var_quiet(name);
            let stmt_ctx = with_unhandled_self_increment(
                &standalone(ctx, rewritten),
                rewritten || ctx.has_unhandled_self_increment,
            );
            let value = self.lower_expr(init, &stmt_ctx)?;
            // The rewrite prelude stays in front; its last line is the value.
            lines.push(match value.rsplit_once('\n') {
                Some((prelude, last)) if rewritten => format!("{prelude}\n/* {kind} */ {name} = {last} ;"),
                _ => format!("/* {kind} */ {name} = {value} ;"),
            });
        }
        Ok(lines.join("\n"))
    }

    /// The declaration line of a destructured binding followed by the
    /// initializers that [`Emitter::decl_line`] leaves out.
    pub(crate) fn binding_lines(
        &mut self,
        kind: DeclKind,
        collection: &DeclCollection,
        ctx: &GenContext,
    ) -> EmitResult<String> {
        let declared = self.decl_line(kind, collection, ctx)?;
        let assigned = self.assign_initializers(kind.as_str(), collection, ctx, false)?;
        Ok([declared, assigned]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Hoisted `var` lines for a block, one per non-empty kind.
    #[tracing::instrument(level = "trace", skip_all, fields(stmts = stmts.len()))]
    pub fn hoist_declarations(&mut self, stmts: &[Stmt], ctx: &GenContext) -> EmitResult<String> {
        let decls = extract_declarations(stmts)?;
        self.render_declarations(&decls, ctx)
    }

    pub(crate) fn render_declarations(
        &mut self,
        decls: &Declarations,
        ctx: &GenContext,
    ) -> EmitResult<String> {
        let mut lines = Vec::new();
        for (kind, collection) in decls.groups() {
            let line = self.decl_line(kind, collection, ctx)?;
            if !line.is_empty() {
                lines.push(line);
            }
        }
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
#[path = "../tests/hoist.rs"]
mod tests;
