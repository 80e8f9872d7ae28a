//! Node constructors.
//!
//! `AstBuilder` hands out fresh [`NodeId`]s from an interior counter so that
//! trees can be assembled with shared `&self` borrows. A builder made with
//! [`AstBuilder::synthetic`] stamps every node with [`NodeId::SYNTHETIC`];
//! the generator uses that form when it rewrites source constructs.
//!
//! All spans are [`Span::DUMMY`]; use [`AstBuilder::at`] to attach one.

use std::cell::Cell;

use crate::ast::*;
use crate::node_id::NodeId;
use crate::ops::{BinaryOp, PostfixOp, PrefixOp};
use tssc_common::Span;

#[derive(Debug, Default)]
pub struct AstBuilder {
    next_id: Cell<u32>,
    synthetic: bool,
}

impl AstBuilder {
    pub fn new() -> Self {
        AstBuilder::default()
    }

    pub fn synthetic() -> Self {
        AstBuilder {
            next_id: Cell::new(0),
            synthetic: true,
        }
    }

    fn fresh_id(&self) -> NodeId {
        if self.synthetic {
            return NodeId::SYNTHETIC;
        }
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        NodeId(id)
    }

    /// Id that the next constructed node will receive.
    pub fn peek_id(&self) -> NodeId {
        if self.synthetic {
            NodeId::SYNTHETIC
        } else {
            NodeId(self.next_id.get())
        }
    }

    pub fn expr(&self, kind: ExprKind) -> Expr {
        Expr {
            id: self.fresh_id(),
            span: Span::DUMMY,
            kind,
        }
    }

    pub fn stmt(&self, kind: StmtKind) -> Stmt {
        Stmt {
            id: self.fresh_id(),
            span: Span::DUMMY,
            kind,
        }
    }

    /// Attach a span to an expression.
    pub fn at(&self, mut expr: Expr, pos: u32, end: u32) -> Expr {
        expr.span = Span::new(pos, end);
        expr
    }

    pub fn stmt_at(&self, mut stmt: Stmt, pos: u32, end: u32) -> Stmt {
        stmt.span = Span::new(pos, end);
        stmt
    }

    // =========================================================================
    // Atoms
    // =========================================================================

    pub fn ident(&self, text: &str) -> Ident {
        Ident::new(text)
    }

    pub fn id(&self, text: &str) -> Expr {
        self.expr(ExprKind::Ident(self.ident(text)))
    }

    pub fn num(&self, raw: &str) -> Expr {
        self.expr(ExprKind::Number(NumberLit {
            raw: raw.to_string(),
            bigint: false,
        }))
    }

    pub fn bigint(&self, raw: &str) -> Expr {
        self.expr(ExprKind::Number(NumberLit {
            raw: raw.to_string(),
            bigint: true,
        }))
    }

    pub fn str(&self, text: &str) -> Expr {
        self.expr(ExprKind::String(text.to_string()))
    }

    pub fn boolean(&self, value: bool) -> Expr {
        self.expr(ExprKind::Bool(value))
    }

    pub fn null(&self) -> Expr {
        self.expr(ExprKind::Null)
    }

    pub fn this(&self) -> Expr {
        self.expr(ExprKind::This)
    }

    pub fn super_(&self) -> Expr {
        self.expr(ExprKind::Super)
    }

    pub fn omitted(&self) -> Expr {
        self.expr(ExprKind::Omitted)
    }

    pub fn template(&self, head: &str, spans: Vec<(Expr, &str)>) -> Expr {
        let spans = spans
            .into_iter()
            .map(|(expr, literal)| TemplateSpan {
                expr,
                literal: literal.to_string(),
            })
            .collect();
        self.expr(ExprKind::Template {
            head: head.to_string(),
            spans,
        })
    }

    pub fn tagged_template(&self, tag: Expr, template: Expr) -> Expr {
        self.expr(ExprKind::TaggedTemplate {
            tag: Box::new(tag),
            template: Box::new(template),
        })
    }

    // =========================================================================
    // Composite expressions
    // =========================================================================

    pub fn array(&self, elements: Vec<Expr>) -> Expr {
        self.expr(ExprKind::Array(elements))
    }

    pub fn object(&self, members: Vec<ObjectMember>) -> Expr {
        self.expr(ExprKind::Object(members))
    }

    pub fn prop(&self, name: &str, value: Expr) -> ObjectMember {
        ObjectMember {
            span: Span::DUMMY,
            kind: ObjectMemberKind::Property {
                name: self.pname(name),
                value,
            },
        }
    }

    pub fn prop_named(&self, name: PropertyName, value: Expr) -> ObjectMember {
        ObjectMember {
            span: Span::DUMMY,
            kind: ObjectMemberKind::Property { name, value },
        }
    }

    pub fn shorthand(&self, name: &str) -> ObjectMember {
        ObjectMember {
            span: Span::DUMMY,
            kind: ObjectMemberKind::Shorthand(self.ident(name)),
        }
    }

    pub fn method_member(&self, name: &str, params: Vec<Param>, body: Vec<Stmt>) -> ObjectMember {
        ObjectMember {
            span: Span::DUMMY,
            kind: ObjectMemberKind::Method {
                name: self.pname(name),
                func: self.function_like(FunctionKind::Method, Some(name), params, Some(body)),
            },
        }
    }

    pub fn spread_member(&self, expr: Expr) -> ObjectMember {
        ObjectMember {
            span: Span::DUMMY,
            kind: ObjectMemberKind::Spread(expr),
        }
    }

    pub fn pname(&self, name: &str) -> PropertyName {
        PropertyName::Ident(self.ident(name))
    }

    pub fn spread(&self, expr: Expr) -> Expr {
        self.expr(ExprKind::Spread(Box::new(expr)))
    }

    pub fn member(&self, object: Expr, name: &str) -> Expr {
        self.expr(ExprKind::PropertyAccess {
            object: Box::new(object),
            name: self.ident(name),
        })
    }

    pub fn index(&self, object: Expr, index: Expr) -> Expr {
        self.expr(ExprKind::ElementAccess {
            object: Box::new(object),
            index: Box::new(index),
        })
    }

    pub fn call(&self, callee: Expr, args: Vec<Expr>) -> Expr {
        self.expr(ExprKind::Call {
            callee: Box::new(callee),
            args,
        })
    }

    pub fn new_(&self, callee: Expr, args: Vec<Expr>) -> Expr {
        self.expr(ExprKind::New {
            callee: Box::new(callee),
            args: Some(args),
        })
    }

    pub fn paren(&self, expr: Expr) -> Expr {
        self.expr(ExprKind::Paren(Box::new(expr)))
    }

    pub fn prefix(&self, op: PrefixOp, operand: Expr) -> Expr {
        self.expr(ExprKind::Prefix {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn postfix(&self, op: PostfixOp, operand: Expr) -> Expr {
        self.expr(ExprKind::Postfix {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn binary(&self, left: Expr, op: BinaryOp, right: Expr) -> Expr {
        self.expr(ExprKind::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    pub fn assign(&self, left: Expr, right: Expr) -> Expr {
        self.binary(left, BinaryOp::Assign, right)
    }

    pub fn conditional(&self, cond: Expr, when_true: Expr, when_false: Expr) -> Expr {
        self.expr(ExprKind::Conditional {
            cond: Box::new(cond),
            when_true: Box::new(when_true),
            when_false: Box::new(when_false),
        })
    }

    pub fn type_erased(&self, wrapper: TypeWrapper, expr: Expr) -> Expr {
        self.expr(ExprKind::TypeErased {
            wrapper,
            expr: Box::new(expr),
        })
    }

    // =========================================================================
    // Functions and bindings
    // =========================================================================

    pub fn function_like(
        &self,
        kind: FunctionKind,
        name: Option<&str>,
        params: Vec<Param>,
        body: Option<Vec<Stmt>>,
    ) -> FunctionLike {
        FunctionLike {
            span: Span::DUMMY,
            kind,
            name: name.map(|n| self.ident(n)),
            params,
            body: body.map(FunctionBody::Block),
        }
    }

    /// Arrow function with a concise expression body.
    pub fn arrow(&self, params: Vec<Param>, body: Expr) -> Expr {
        self.expr(ExprKind::Function(Box::new(FunctionLike {
            span: Span::DUMMY,
            kind: FunctionKind::Arrow,
            name: None,
            params,
            body: Some(FunctionBody::Expr(Box::new(body))),
        })))
    }

    pub fn arrow_block(&self, params: Vec<Param>, body: Vec<Stmt>) -> Expr {
        self.expr(ExprKind::Function(Box::new(self.function_like(
            FunctionKind::Arrow,
            None,
            params,
            Some(body),
        ))))
    }

    pub fn function_expr(&self, params: Vec<Param>, body: Vec<Stmt>) -> Expr {
        self.expr(ExprKind::Function(Box::new(self.function_like(
            FunctionKind::Expression,
            None,
            params,
            Some(body),
        ))))
    }

    pub fn function_decl(&self, name: &str, params: Vec<Param>, body: Vec<Stmt>) -> Stmt {
        self.stmt(StmtKind::FunctionDecl(Box::new(self.function_like(
            FunctionKind::Declaration,
            Some(name),
            params,
            Some(body),
        ))))
    }

    pub fn param(&self, name: &str) -> Param {
        self.param_pattern(self.bind(name), None)
    }

    pub fn param_with(&self, name: &str, init: Expr) -> Param {
        self.param_pattern(self.bind(name), Some(init))
    }

    pub fn param_pattern(&self, name: BindingName, init: Option<Expr>) -> Param {
        Param {
            span: Span::DUMMY,
            name,
            init,
            optional: false,
            rest: false,
        }
    }

    pub fn optional_param(&self, name: &str) -> Param {
        Param {
            optional: true,
            ..self.param(name)
        }
    }

    pub fn rest_param(&self, name: &str) -> Param {
        Param {
            rest: true,
            ..self.param(name)
        }
    }

    pub fn bind(&self, name: &str) -> BindingName {
        BindingName::Ident(self.ident(name))
    }

    pub fn array_pattern(&self, elements: Vec<Option<BindingElement>>) -> BindingName {
        BindingName::Array(elements)
    }

    pub fn object_pattern(&self, elements: Vec<BindingElement>) -> BindingName {
        BindingName::Object(elements)
    }

    pub fn element(&self, name: BindingName) -> BindingElement {
        BindingElement {
            span: Span::DUMMY,
            property_name: None,
            name,
            init: None,
            rest: false,
        }
    }

    pub fn element_with(&self, name: BindingName, init: Expr) -> BindingElement {
        BindingElement {
            init: Some(init),
            ..self.element(name)
        }
    }

    /// `{ key: name }` element.
    pub fn keyed_element(&self, key: &str, name: BindingName) -> BindingElement {
        BindingElement {
            property_name: Some(self.pname(key)),
            ..self.element(name)
        }
    }

    pub fn rest_element(&self, name: BindingName) -> BindingElement {
        BindingElement {
            rest: true,
            ..self.element(name)
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub fn var_list(&self, kind: VarKind, decls: Vec<(BindingName, Option<Expr>)>) -> VarDeclList {
        VarDeclList {
            kind,
            decls: decls
                .into_iter()
                .map(|(name, init)| VarDecl {
                    span: Span::DUMMY,
                    name,
                    init,
                })
                .collect(),
        }
    }

    pub fn var_stmt(&self, kind: VarKind, decls: Vec<(BindingName, Option<Expr>)>) -> Stmt {
        self.stmt(StmtKind::Variable(self.var_list(kind, decls)))
    }

    pub fn let_(&self, name: &str, init: Option<Expr>) -> Stmt {
        self.var_stmt(VarKind::Let, vec![(self.bind(name), init)])
    }

    pub fn const_(&self, name: &str, init: Expr) -> Stmt {
        self.var_stmt(VarKind::Const, vec![(self.bind(name), Some(init))])
    }

    pub fn var(&self, name: &str, init: Option<Expr>) -> Stmt {
        self.var_stmt(VarKind::Var, vec![(self.bind(name), init)])
    }

    pub fn expr_stmt(&self, expr: Expr) -> Stmt {
        self.stmt(StmtKind::Expression(expr))
    }

    pub fn block(&self, stmts: Vec<Stmt>) -> Stmt {
        self.stmt(StmtKind::Block(stmts))
    }

    pub fn if_(&self, cond: Expr, then: Stmt, else_: Option<Stmt>) -> Stmt {
        self.stmt(StmtKind::If {
            cond,
            then: Box::new(then),
            else_: else_.map(Box::new),
        })
    }

    pub fn while_(&self, cond: Expr, body: Stmt) -> Stmt {
        self.stmt(StmtKind::While {
            cond,
            body: Box::new(body),
        })
    }

    pub fn do_(&self, body: Stmt, cond: Expr) -> Stmt {
        self.stmt(StmtKind::Do {
            body: Box::new(body),
            cond,
        })
    }

    pub fn for_(&self, init: Option<ForInit>, cond: Option<Expr>, incr: Option<Expr>, body: Stmt) -> Stmt {
        self.stmt(StmtKind::For {
            init,
            cond,
            incr,
            body: Box::new(body),
        })
    }

    pub fn for_of(&self, kind: VarKind, name: BindingName, expr: Expr, body: Stmt) -> Stmt {
        self.stmt(StmtKind::ForOf {
            init: ForInit::VarDecls(self.var_list(kind, vec![(name, None)])),
            expr,
            body: Box::new(body),
        })
    }

    pub fn for_in(&self, kind: VarKind, name: BindingName, expr: Expr, body: Stmt) -> Stmt {
        self.stmt(StmtKind::ForIn {
            init: ForInit::VarDecls(self.var_list(kind, vec![(name, None)])),
            expr,
            body: Box::new(body),
        })
    }

    pub fn break_(&self, label: Option<&str>) -> Stmt {
        self.stmt(StmtKind::Break(label.map(|l| self.ident(l))))
    }

    pub fn continue_(&self, label: Option<&str>) -> Stmt {
        self.stmt(StmtKind::Continue(label.map(|l| self.ident(l))))
    }

    pub fn ret(&self, value: Option<Expr>) -> Stmt {
        self.stmt(StmtKind::Return(value))
    }

    pub fn throw(&self, value: Expr) -> Stmt {
        self.stmt(StmtKind::Throw(value))
    }

    pub fn switch(&self, expr: Expr, clauses: Vec<SwitchClause>) -> Stmt {
        self.stmt(StmtKind::Switch { expr, clauses })
    }

    pub fn case(&self, test: Expr, body: Vec<Stmt>) -> SwitchClause {
        SwitchClause {
            span: Span::DUMMY,
            test: Some(test),
            body,
        }
    }

    pub fn default_case(&self, body: Vec<Stmt>) -> SwitchClause {
        SwitchClause {
            span: Span::DUMMY,
            test: None,
            body,
        }
    }

    pub fn labeled(&self, label: &str, body: Stmt) -> Stmt {
        self.stmt(StmtKind::Labeled {
            label: self.ident(label),
            body: Box::new(body),
        })
    }

    pub fn try_(
        &self,
        block: Vec<Stmt>,
        catch: Option<(Option<BindingName>, Vec<Stmt>)>,
        finally: Option<Vec<Stmt>>,
    ) -> Stmt {
        self.stmt(StmtKind::Try {
            block,
            catch: catch.map(|(binding, block)| CatchClause { binding, block }),
            finally,
        })
    }

    pub fn empty(&self) -> Stmt {
        self.stmt(StmtKind::Empty)
    }

    // =========================================================================
    // Classes
    // =========================================================================

    pub fn class(&self, name: Option<&str>, extends: Option<Expr>, members: Vec<ClassMember>) -> ClassDecl {
        ClassDecl {
            span: Span::DUMMY,
            name: name.map(|n| self.ident(n)),
            extends,
            members,
        }
    }

    pub fn class_decl(&self, class: ClassDecl) -> Stmt {
        self.stmt(StmtKind::ClassDecl(Box::new(class)))
    }

    pub fn class_expr(&self, class: ClassDecl) -> Expr {
        self.expr(ExprKind::Class(Box::new(class)))
    }

    fn class_member(&self, kind: ClassMemberKind) -> ClassMember {
        ClassMember {
            span: Span::DUMMY,
            kind,
        }
    }

    pub fn field(&self, name: &str, init: Option<Expr>, is_static: bool) -> ClassMember {
        self.class_member(ClassMemberKind::Property {
            name: self.pname(name),
            init,
            is_static,
            is_readonly: false,
            auto_accessor: false,
        })
    }

    pub fn method(&self, name: &str, params: Vec<Param>, body: Vec<Stmt>, is_static: bool) -> ClassMember {
        self.class_member(ClassMemberKind::Method {
            name: self.pname(name),
            is_static,
            func: self.function_like(FunctionKind::Method, Some(name), params, Some(body)),
        })
    }

    pub fn getter(&self, name: &str, body: Vec<Stmt>) -> ClassMember {
        self.class_member(ClassMemberKind::GetAccessor {
            name: self.pname(name),
            is_static: false,
            func: self.function_like(FunctionKind::Getter, Some(name), Vec::new(), Some(body)),
        })
    }

    pub fn setter(&self, name: &str, param: Param, body: Vec<Stmt>) -> ClassMember {
        self.class_member(ClassMemberKind::SetAccessor {
            name: self.pname(name),
            is_static: false,
            func: self.function_like(FunctionKind::Setter, Some(name), vec![param], Some(body)),
        })
    }

    pub fn constructor(&self, params: Vec<Param>, body: Vec<Stmt>) -> ClassMember {
        self.class_member(ClassMemberKind::Constructor(self.function_like(
            FunctionKind::Constructor,
            None,
            params,
            Some(body),
        )))
    }

    pub fn static_block(&self, body: Vec<Stmt>) -> ClassMember {
        self.class_member(ClassMemberKind::StaticBlock(body))
    }

    pub fn unit(&self, file_name: &str, statements: Vec<Stmt>) -> SourceUnit {
        SourceUnit::new(file_name, "", statements)
    }
}

#[cfg(test)]
#[path = "../tests/builder.rs"]
mod tests;
