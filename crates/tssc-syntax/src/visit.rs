//! Read-only traversal.
//!
//! Implement [`Visit`] and override the hooks of interest; call the matching
//! `walk_*` function from an override to keep descending. Returning without
//! walking prunes the subtree, which is how queries stop at function or
//! class boundaries.

use crate::ast::*;

pub trait Visit<'ast> {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }

    fn visit_function(&mut self, func: &'ast FunctionLike) {
        walk_function(self, func);
    }

    fn visit_class(&mut self, class: &'ast ClassDecl) {
        walk_class(self, class);
    }

    fn visit_binding(&mut self, binding: &'ast BindingName) {
        walk_binding(self, binding);
    }
}

pub fn walk_stmts<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, stmts: &'ast [Stmt]) {
    for stmt in stmts {
        v.visit_stmt(stmt);
    }
}

fn walk_var_list<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, list: &'ast VarDeclList) {
    for decl in &list.decls {
        v.visit_binding(&decl.name);
        if let Some(init) = &decl.init {
            v.visit_expr(init);
        }
    }
}

fn walk_for_init<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, init: &'ast ForInit) {
    match init {
        ForInit::VarDecls(list) => walk_var_list(v, list),
        ForInit::Expr(expr) => v.visit_expr(expr),
    }
}

pub fn walk_stmt<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, stmt: &'ast Stmt) {
    match &stmt.kind {
        StmtKind::Variable(list) => walk_var_list(v, list),
        StmtKind::Block(stmts) => walk_stmts(v, stmts),
        StmtKind::FunctionDecl(func) => v.visit_function(func),
        StmtKind::Expression(expr) | StmtKind::Throw(expr) => v.visit_expr(expr),
        StmtKind::If { cond, then, else_ } => {
            v.visit_expr(cond);
            v.visit_stmt(then);
            if let Some(else_) = else_ {
                v.visit_stmt(else_);
            }
        }
        StmtKind::Do { body, cond } => {
            v.visit_stmt(body);
            v.visit_expr(cond);
        }
        StmtKind::While { cond, body } => {
            v.visit_expr(cond);
            v.visit_stmt(body);
        }
        StmtKind::For {
            init,
            cond,
            incr,
            body,
        } => {
            if let Some(init) = init {
                walk_for_init(v, init);
            }
            if let Some(cond) = cond {
                v.visit_expr(cond);
            }
            if let Some(incr) = incr {
                v.visit_expr(incr);
            }
            v.visit_stmt(body);
        }
        StmtKind::ForIn { init, expr, body } | StmtKind::ForOf { init, expr, body } => {
            walk_for_init(v, init);
            v.visit_expr(expr);
            v.visit_stmt(body);
        }
        StmtKind::Return(value) => {
            if let Some(value) = value {
                v.visit_expr(value);
            }
        }
        StmtKind::Switch { expr, clauses } => {
            v.visit_expr(expr);
            for clause in clauses {
                if let Some(test) = &clause.test {
                    v.visit_expr(test);
                }
                walk_stmts(v, &clause.body);
            }
        }
        StmtKind::Labeled { body, .. } => v.visit_stmt(body),
        StmtKind::Try {
            block,
            catch,
            finally,
        } => {
            walk_stmts(v, block);
            if let Some(catch) = catch {
                if let Some(binding) = &catch.binding {
                    v.visit_binding(binding);
                }
                walk_stmts(v, &catch.block);
            }
            if let Some(finally) = finally {
                walk_stmts(v, finally);
            }
        }
        StmtKind::ClassDecl(class) => v.visit_class(class),
        StmtKind::With { object, body } => {
            v.visit_expr(object);
            v.visit_stmt(body);
        }
        StmtKind::Import
        | StmtKind::Continue(_)
        | StmtKind::Break(_)
        | StmtKind::Interface(_)
        | StmtKind::TypeAlias(_)
        | StmtKind::Empty
        | StmtKind::Debugger => {}
    }
}

fn walk_property_name<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, name: &'ast PropertyName) {
    if let PropertyName::Computed(expr) = name {
        v.visit_expr(expr);
    }
}

pub fn walk_expr<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, expr: &'ast Expr) {
    match &expr.kind {
        ExprKind::Template { spans, .. } => {
            for span in spans {
                v.visit_expr(&span.expr);
            }
        }
        ExprKind::TaggedTemplate { tag, template } => {
            v.visit_expr(tag);
            v.visit_expr(template);
        }
        ExprKind::Array(elements) => {
            for element in elements {
                v.visit_expr(element);
            }
        }
        ExprKind::Object(members) => {
            for member in members {
                match &member.kind {
                    ObjectMemberKind::Property { name, value } => {
                        walk_property_name(v, name);
                        v.visit_expr(value);
                    }
                    ObjectMemberKind::Shorthand(_) => {}
                    ObjectMemberKind::Method { name, func }
                    | ObjectMemberKind::Accessor { name, func } => {
                        walk_property_name(v, name);
                        v.visit_function(func);
                    }
                    ObjectMemberKind::Spread(expr) => v.visit_expr(expr),
                }
            }
        }
        ExprKind::Function(func) => v.visit_function(func),
        ExprKind::Class(class) => v.visit_class(class),
        ExprKind::PropertyAccess { object, .. } => v.visit_expr(object),
        ExprKind::ElementAccess { object, index } => {
            v.visit_expr(object);
            v.visit_expr(index);
        }
        ExprKind::Call { callee, args } => {
            v.visit_expr(callee);
            for arg in args {
                v.visit_expr(arg);
            }
        }
        ExprKind::New { callee, args } => {
            v.visit_expr(callee);
            for arg in args.iter().flatten() {
                v.visit_expr(arg);
            }
        }
        ExprKind::Paren(inner)
        | ExprKind::Spread(inner)
        | ExprKind::TypeErased { expr: inner, .. }
        | ExprKind::TypeOf(inner)
        | ExprKind::Await(inner)
        | ExprKind::Delete(inner)
        | ExprKind::Void(inner) => v.visit_expr(inner),
        ExprKind::Prefix { operand, .. } | ExprKind::Postfix { operand, .. } => {
            v.visit_expr(operand)
        }
        ExprKind::Binary { left, right, .. } => {
            v.visit_expr(left);
            v.visit_expr(right);
        }
        ExprKind::Conditional {
            cond,
            when_true,
            when_false,
        } => {
            v.visit_expr(cond);
            v.visit_expr(when_true);
            v.visit_expr(when_false);
        }
        ExprKind::Yield(value) => {
            if let Some(value) = value {
                v.visit_expr(value);
            }
        }
        ExprKind::Ident(_)
        | ExprKind::Number(_)
        | ExprKind::String(_)
        | ExprKind::NoSubstTemplate(_)
        | ExprKind::Regex(_)
        | ExprKind::Bool(_)
        | ExprKind::Null
        | ExprKind::This
        | ExprKind::Super
        | ExprKind::Omitted
        | ExprKind::MetaProperty { .. } => {}
    }
}

pub fn walk_function<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, func: &'ast FunctionLike) {
    for param in &func.params {
        v.visit_binding(&param.name);
        if let Some(init) = &param.init {
            v.visit_expr(init);
        }
    }
    match &func.body {
        Some(FunctionBody::Block(stmts)) => walk_stmts(v, stmts),
        Some(FunctionBody::Expr(expr)) => v.visit_expr(expr),
        None => {}
    }
}

pub fn walk_class<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, class: &'ast ClassDecl) {
    if let Some(extends) = &class.extends {
        v.visit_expr(extends);
    }
    for member in &class.members {
        match &member.kind {
            ClassMemberKind::Property { name, init, .. } => {
                walk_property_name(v, name);
                if let Some(init) = init {
                    v.visit_expr(init);
                }
            }
            ClassMemberKind::Method { name, func, .. }
            | ClassMemberKind::GetAccessor { name, func, .. }
            | ClassMemberKind::SetAccessor { name, func, .. } => {
                walk_property_name(v, name);
                v.visit_function(func);
            }
            ClassMemberKind::Constructor(func) => v.visit_function(func),
            ClassMemberKind::StaticBlock(stmts) => walk_stmts(v, stmts),
            ClassMemberKind::Semicolon | ClassMemberKind::IndexSignature => {}
        }
    }
}

fn walk_binding_element<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, element: &'ast BindingElement) {
    if let Some(name) = &element.property_name {
        walk_property_name(v, name);
    }
    v.visit_binding(&element.name);
    if let Some(init) = &element.init {
        v.visit_expr(init);
    }
}

pub fn walk_binding<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, binding: &'ast BindingName) {
    match binding {
        BindingName::Ident(_) => {}
        BindingName::Array(elements) => {
            for element in elements.iter().flatten() {
                walk_binding_element(v, element);
            }
        }
        BindingName::Object(elements) => {
            for element in elements {
                walk_binding_element(v, element);
            }
        }
    }
}
