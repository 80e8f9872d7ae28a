//! Structural questions about subtrees.
//!
//! Each query names the boundaries it does not cross. "Function" covers
//! every function-like node: declarations, expressions, arrows, methods,
//! accessors and constructors.

use smallvec::SmallVec;

use crate::ast::*;
use crate::ops::PrefixOp;
use crate::visit::{self, Visit};

// =============================================================================
// Self increment / decrement
// =============================================================================

fn is_self_update(expr: &Expr) -> Option<&Expr> {
    match &expr.kind {
        ExprKind::Prefix { op, operand } if op.is_self_update() => Some(operand),
        ExprKind::Postfix { operand, .. } => Some(operand),
        _ => None,
    }
}

struct SelfUpdateFinder<'ast> {
    cross_functions: bool,
    targets: SmallVec<[&'ast Expr; 4]>,
}

impl<'ast> Visit<'ast> for SelfUpdateFinder<'ast> {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        if let Some(operand) = is_self_update(expr) {
            self.targets.push(operand.skip_parens());
        }
        visit::walk_expr(self, expr);
    }

    fn visit_function(&mut self, func: &'ast FunctionLike) {
        if self.cross_functions {
            visit::walk_function(self, func);
        }
    }

    fn visit_class(&mut self, class: &'ast ClassDecl) {
        if self.cross_functions {
            visit::walk_class(self, class);
        }
    }
}

/// Operands of every `++`/`--` in `expr`, pre-order, parentheses stripped.
/// Does not cross functions or classes.
pub fn self_increment_targets(expr: &Expr) -> SmallVec<[&Expr; 4]> {
    let mut finder = SelfUpdateFinder {
        cross_functions: false,
        targets: SmallVec::new(),
    };
    finder.visit_expr(expr);
    finder.targets
}

/// Whether `expr` has a `++`/`--` outside nested functions and classes.
pub fn contains_self_increment(expr: &Expr) -> bool {
    !self_increment_targets(expr).is_empty()
}

/// Whether any `++`/`--` occurs anywhere in the statements.
pub fn unit_has_self_increment(stmts: &[Stmt]) -> bool {
    let mut finder = SelfUpdateFinder {
        cross_functions: true,
        targets: SmallVec::new(),
    };
    visit::walk_stmts(&mut finder, stmts);
    !finder.targets.is_empty()
}

// =============================================================================
// Jumps
// =============================================================================

#[derive(Default)]
struct JumpFinder {
    found: bool,
    /// Only unlabeled `break`, stopping at loops and switches.
    switch_scope: bool,
}

impl<'ast> Visit<'ast> for JumpFinder {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        if self.found {
            return;
        }
        match &stmt.kind {
            StmtKind::Break(label) if self.switch_scope => {
                if label.is_none() {
                    self.found = true;
                }
            }
            StmtKind::Break(_) | StmtKind::Continue(_) if !self.switch_scope => {
                self.found = true;
            }
            StmtKind::Switch { .. } if self.switch_scope => {}
            kind if self.switch_scope && kind.is_loop() => {}
            _ => visit::walk_stmt(self, stmt),
        }
    }

    fn visit_expr(&mut self, _expr: &'ast Expr) {}

    fn visit_function(&mut self, _func: &'ast FunctionLike) {}

    fn visit_class(&mut self, _class: &'ast ClassDecl) {}
}

/// Whether `stmt` holds a `break` or `continue`, not crossing functions or
/// classes.
pub fn contains_break_or_continue(stmt: &Stmt) -> bool {
    let mut finder = JumpFinder::default();
    finder.visit_stmt(stmt);
    finder.found
}

/// Whether a clause body holds an unlabeled `break` that leaves the
/// enclosing switch. Nested loops, switches and functions are not entered.
pub fn contains_switch_break(stmts: &[Stmt]) -> bool {
    let mut finder = JumpFinder {
        found: false,
        switch_scope: true,
    };
    visit::walk_stmts(&mut finder, stmts);
    finder.found
}

// =============================================================================
// super(...)
// =============================================================================

#[derive(Default)]
struct SuperCallFinder {
    found: bool,
}

impl<'ast> Visit<'ast> for SuperCallFinder {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        if self.found {
            return;
        }
        if let ExprKind::Call { callee, .. } = &expr.kind
            && matches!(callee.kind, ExprKind::Super)
        {
            self.found = true;
            return;
        }
        visit::walk_expr(self, expr);
    }

    fn visit_function(&mut self, _func: &'ast FunctionLike) {}

    fn visit_class(&mut self, _class: &'ast ClassDecl) {}
}

/// Whether `stmt` calls `super(...)` outside nested functions and classes.
pub fn contains_super_call(stmt: &Stmt) -> bool {
    let mut finder = SuperCallFinder::default();
    finder.visit_stmt(stmt);
    finder.found
}

// =============================================================================
// L-values
// =============================================================================

/// Whether `expr` can be the target of an assignment.
pub fn is_assignable(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Ident(_) | ExprKind::PropertyAccess { .. } | ExprKind::ElementAccess { .. } => true,
        ExprKind::Paren(inner) | ExprKind::TypeErased { expr: inner, .. } => is_assignable(inner),
        _ => false,
    }
}

/// Source-like text of an expression, used to key temporaries.
///
/// Two expressions get the same text only when they have the same shape.
/// Nodes with no compact spelling (functions, classes, literals with
/// members) are keyed by their node id, so they never compare equal.
pub fn lvalue_text(expr: &Expr) -> String {
    let list = |exprs: &[Expr]| exprs.iter().map(lvalue_text).collect::<Vec<_>>().join(", ");
    match &expr.kind {
        ExprKind::Ident(ident) => ident.text.clone(),
        ExprKind::This => "this".to_string(),
        ExprKind::Super => "super".to_string(),
        ExprKind::Null => "null".to_string(),
        ExprKind::Bool(value) => value.to_string(),
        ExprKind::Number(n) => n.raw.clone(),
        ExprKind::String(s) => format!("\"{s}\""),
        ExprKind::NoSubstTemplate(s) => format!("`{s}`"),
        ExprKind::Regex(s) => s.clone(),
        ExprKind::Array(elements) => format!("[{}]", list(elements)),
        ExprKind::PropertyAccess { object, name } => {
            format!("{}.{}", lvalue_text(object), name.text)
        }
        ExprKind::ElementAccess { object, index } => {
            format!("{}[{}]", lvalue_text(object), lvalue_text(index))
        }
        ExprKind::Call { callee, args } => format!("{}({})", lvalue_text(callee), list(args)),
        ExprKind::New { callee, args } => match args {
            Some(args) => format!("new {}({})", lvalue_text(callee), list(args)),
            None => format!("new {}", lvalue_text(callee)),
        },
        ExprKind::Paren(inner) => format!("({})", lvalue_text(inner)),
        ExprKind::Prefix { op, operand } => format!("{}{}", op.as_str(), lvalue_text(operand)),
        ExprKind::Postfix { op, operand } => format!("{}{}", lvalue_text(operand), op.as_str()),
        ExprKind::Binary { left, op, right } => {
            format!("{} {} {}", lvalue_text(left), op.as_str(), lvalue_text(right))
        }
        ExprKind::Conditional {
            cond,
            when_true,
            when_false,
        } => format!(
            "{} ? {} : {}",
            lvalue_text(cond),
            lvalue_text(when_true),
            lvalue_text(when_false)
        ),
        ExprKind::Spread(inner) => format!("...{}", lvalue_text(inner)),
        ExprKind::Omitted => String::new(),
        ExprKind::TypeErased { expr, .. } => lvalue_text(expr),
        ExprKind::TypeOf(inner) => format!("typeof {}", lvalue_text(inner)),
        ExprKind::Await(inner) => format!("await {}", lvalue_text(inner)),
        ExprKind::Delete(inner) => format!("delete {}", lvalue_text(inner)),
        ExprKind::Void(inner) => format!("void {}", lvalue_text(inner)),
        ExprKind::MetaProperty { keyword, name } => format!("{keyword}.{name}"),
        ExprKind::Template { .. }
        | ExprKind::TaggedTemplate { .. }
        | ExprKind::Object(_)
        | ExprKind::Function(_)
        | ExprKind::Class(_)
        | ExprKind::Yield(_) => format!("#{}", expr.id.0),
    }
}

/// `++x` / `x++` / `--x` / `x--` with an increment (as opposed to decrement).
pub fn is_increment(expr: &Expr) -> Option<bool> {
    match &expr.kind {
        ExprKind::Prefix {
            op: PrefixOp::Increment,
            ..
        } => Some(true),
        ExprKind::Prefix {
            op: PrefixOp::Decrement,
            ..
        } => Some(false),
        ExprKind::Postfix { op, .. } => Some(matches!(op, crate::ops::PostfixOp::Increment)),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../tests/query.rs"]
mod tests;
