//! Annotated syntax tree.
//!
//! Nodes own their children. Expressions and statements carry a [`NodeId`]
//! for type queries and a [`Span`] for diagnostics; smaller pieces
//! (parameters, members, clauses) carry only a span.

use crate::node_id::NodeId;
use crate::ops::{BinaryOp, PostfixOp, PrefixOp};
use tssc_common::Span;

// =============================================================================
// Units
// =============================================================================

/// One parsed source file.
#[derive(Clone, Debug)]
pub struct SourceUnit {
    pub file_name: String,
    /// Full source text; only used for diagnostics.
    pub text: String,
    pub statements: Vec<Stmt>,
}

impl SourceUnit {
    pub fn new(file_name: impl Into<String>, text: impl Into<String>, statements: Vec<Stmt>) -> Self {
        SourceUnit {
            file_name: file_name.into(),
            text: text.into(),
            statements,
        }
    }

    /// File name without directories and without its final extension.
    pub fn file_stem(&self) -> &str {
        let base = self
            .file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.file_name);
        match base.rfind('.') {
            Some(dot) if dot > 0 => &base[..dot],
            _ => base,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ident {
    pub span: Span,
    pub text: String,
}

impl Ident {
    pub fn new(text: impl Into<String>) -> Self {
        Ident {
            span: Span::DUMMY,
            text: text.into(),
        }
    }
}

// =============================================================================
// Expressions
// =============================================================================

#[derive(Clone, Debug)]
pub struct Expr {
    pub id: NodeId,
    pub span: Span,
    pub kind: ExprKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberLit {
    /// Literal text as written, including separators and radix prefix.
    pub raw: String,
    pub bigint: bool,
}

#[derive(Clone, Debug)]
pub struct TemplateSpan {
    pub expr: Expr,
    /// Literal text following the substitution.
    pub literal: String,
}

#[derive(Clone, Debug)]
pub enum ExprKind {
    Ident(Ident),
    Number(NumberLit),
    String(String),
    NoSubstTemplate(String),
    Template {
        head: String,
        spans: Vec<TemplateSpan>,
    },
    TaggedTemplate {
        tag: Box<Expr>,
        template: Box<Expr>,
    },
    Regex(String),
    Bool(bool),
    Null,
    This,
    Super,
    Array(Vec<Expr>),
    Object(Vec<ObjectMember>),
    Function(Box<FunctionLike>),
    Class(Box<ClassDecl>),
    PropertyAccess {
        object: Box<Expr>,
        name: Ident,
    },
    ElementAccess {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    New {
        callee: Box<Expr>,
        /// `None` for `new C` without parentheses.
        args: Option<Vec<Expr>>,
    },
    Paren(Box<Expr>),
    Prefix {
        op: PrefixOp,
        operand: Box<Expr>,
    },
    Postfix {
        op: PostfixOp,
        operand: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    Conditional {
        cond: Box<Expr>,
        when_true: Box<Expr>,
        when_false: Box<Expr>,
    },
    Spread(Box<Expr>),
    /// Hole in an array literal (`[a, , b]`).
    Omitted,
    /// `as`, `<T>x`, `x!`, `satisfies`, or an expression with type arguments.
    TypeErased {
        wrapper: TypeWrapper,
        expr: Box<Expr>,
    },
    TypeOf(Box<Expr>),
    Await(Box<Expr>),
    Yield(Option<Box<Expr>>),
    Delete(Box<Expr>),
    Void(Box<Expr>),
    MetaProperty {
        keyword: String,
        name: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeWrapper {
    As,
    TypeAssertion,
    NonNull,
    Satisfies,
    TypeArguments,
}

impl ExprKind {
    /// Syntax-kind name used in diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            ExprKind::Ident(_) => "Identifier",
            ExprKind::Number(_) => "NumericLiteral",
            ExprKind::String(_) => "StringLiteral",
            ExprKind::NoSubstTemplate(_) => "NoSubstitutionTemplateLiteral",
            ExprKind::Template { .. } => "TemplateExpression",
            ExprKind::TaggedTemplate { .. } => "TaggedTemplateExpression",
            ExprKind::Regex(_) => "RegularExpressionLiteral",
            ExprKind::Bool(true) => "TrueKeyword",
            ExprKind::Bool(false) => "FalseKeyword",
            ExprKind::Null => "NullKeyword",
            ExprKind::This => "ThisKeyword",
            ExprKind::Super => "SuperKeyword",
            ExprKind::Array(_) => "ArrayLiteralExpression",
            ExprKind::Object(_) => "ObjectLiteralExpression",
            ExprKind::Function(func) => match func.kind {
                FunctionKind::Arrow => "ArrowFunction",
                _ => "FunctionExpression",
            },
            ExprKind::Class(_) => "ClassExpression",
            ExprKind::PropertyAccess { .. } => "PropertyAccessExpression",
            ExprKind::ElementAccess { .. } => "ElementAccessExpression",
            ExprKind::Call { .. } => "CallExpression",
            ExprKind::New { .. } => "NewExpression",
            ExprKind::Paren(_) => "ParenthesizedExpression",
            ExprKind::Prefix { .. } => "PrefixUnaryExpression",
            ExprKind::Postfix { .. } => "PostfixUnaryExpression",
            ExprKind::Binary { .. } => "BinaryExpression",
            ExprKind::Conditional { .. } => "ConditionalExpression",
            ExprKind::Spread(_) => "SpreadElement",
            ExprKind::Omitted => "OmittedExpression",
            ExprKind::TypeErased { wrapper, .. } => match wrapper {
                TypeWrapper::As => "AsExpression",
                TypeWrapper::TypeAssertion => "TypeAssertionExpression",
                TypeWrapper::NonNull => "NonNullExpression",
                TypeWrapper::Satisfies => "SatisfiesExpression",
                TypeWrapper::TypeArguments => "ExpressionWithTypeArguments",
            },
            ExprKind::TypeOf(_) => "TypeOfExpression",
            ExprKind::Await(_) => "AwaitExpression",
            ExprKind::Yield(_) => "YieldExpression",
            ExprKind::Delete(_) => "DeleteExpression",
            ExprKind::Void(_) => "VoidExpression",
            ExprKind::MetaProperty { .. } => "MetaProperty",
        }
    }
}

impl Expr {
    /// Strip any number of enclosing parentheses.
    pub fn skip_parens(&self) -> &Expr {
        let mut expr = self;
        while let ExprKind::Paren(inner) = &expr.kind {
            expr = inner;
        }
        expr
    }

    pub fn as_ident(&self) -> Option<&Ident> {
        match &self.kind {
            ExprKind::Ident(ident) => Some(ident),
            _ => None,
        }
    }
}

// =============================================================================
// Object literals
// =============================================================================

#[derive(Clone, Debug)]
pub struct ObjectMember {
    pub span: Span,
    pub kind: ObjectMemberKind,
}

#[derive(Clone, Debug)]
pub enum ObjectMemberKind {
    Property { name: PropertyName, value: Expr },
    Shorthand(Ident),
    Method { name: PropertyName, func: FunctionLike },
    /// `get x() {}` / `set x(v) {}` inside an object literal.
    Accessor { name: PropertyName, func: FunctionLike },
    Spread(Expr),
}

#[derive(Clone, Debug)]
pub enum PropertyName {
    Ident(Ident),
    String(String),
    Number(NumberLit),
    Computed(Box<Expr>),
    Private(Ident),
}

impl PropertyName {
    /// Key text for non-computed names.
    pub fn static_text(&self) -> Option<&str> {
        match self {
            PropertyName::Ident(ident) | PropertyName::Private(ident) => Some(&ident.text),
            PropertyName::String(s) => Some(s),
            PropertyName::Number(n) => Some(&n.raw),
            PropertyName::Computed(_) => None,
        }
    }
}

// =============================================================================
// Functions and bindings
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FunctionKind {
    Expression,
    Arrow,
    Declaration,
    Method,
    Getter,
    Setter,
    Constructor,
}

#[derive(Clone, Debug)]
pub struct FunctionLike {
    pub span: Span,
    pub kind: FunctionKind,
    pub name: Option<Ident>,
    pub params: Vec<Param>,
    /// `None` for overload signatures and abstract members.
    pub body: Option<FunctionBody>,
}

#[derive(Clone, Debug)]
pub enum FunctionBody {
    Block(Vec<Stmt>),
    /// Concise arrow body.
    Expr(Box<Expr>),
}

#[derive(Clone, Debug)]
pub struct Param {
    pub span: Span,
    pub name: BindingName,
    pub init: Option<Expr>,
    pub optional: bool,
    pub rest: bool,
}

#[derive(Clone, Debug)]
pub enum BindingName {
    Ident(Ident),
    /// `None` entries are holes (`[a, , b]`).
    Array(Vec<Option<BindingElement>>),
    Object(Vec<BindingElement>),
}

#[derive(Clone, Debug)]
pub struct BindingElement {
    pub span: Span,
    /// `key` in `{ key: name }`; `None` for shorthand and array elements.
    pub property_name: Option<PropertyName>,
    pub name: BindingName,
    pub init: Option<Expr>,
    pub rest: bool,
}

impl BindingName {
    pub fn as_ident(&self) -> Option<&Ident> {
        match self {
            BindingName::Ident(ident) => Some(ident),
            _ => None,
        }
    }

    /// Every bound identifier, depth-first left to right.
    pub fn bound_names(&self) -> Vec<&Ident> {
        let mut out = Vec::new();
        self.collect_names(&mut out);
        out
    }

    fn collect_names<'a>(&'a self, out: &mut Vec<&'a Ident>) {
        match self {
            BindingName::Ident(ident) => out.push(ident),
            BindingName::Array(elements) => {
                for element in elements.iter().flatten() {
                    element.name.collect_names(out);
                }
            }
            BindingName::Object(elements) => {
                for element in elements {
                    element.name.collect_names(out);
                }
            }
        }
    }
}

// =============================================================================
// Statements
// =============================================================================

#[derive(Clone, Debug)]
pub struct Stmt {
    pub id: NodeId,
    pub span: Span,
    pub kind: StmtKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VarKind {
    Let,
    Const,
    Var,
}

impl VarKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            VarKind::Let => "let",
            VarKind::Const => "const",
            VarKind::Var => "var",
        }
    }
}

#[derive(Clone, Debug)]
pub struct VarDeclList {
    pub kind: VarKind,
    pub decls: Vec<VarDecl>,
}

#[derive(Clone, Debug)]
pub struct VarDecl {
    pub span: Span,
    pub name: BindingName,
    pub init: Option<Expr>,
}

#[derive(Clone, Debug)]
pub enum ForInit {
    VarDecls(VarDeclList),
    Expr(Expr),
}

#[derive(Clone, Debug)]
pub struct SwitchClause {
    pub span: Span,
    /// `None` for `default`.
    pub test: Option<Expr>,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug)]
pub struct CatchClause {
    pub binding: Option<BindingName>,
    pub block: Vec<Stmt>,
}

#[derive(Clone, Debug)]
pub enum StmtKind {
    Import,
    Variable(VarDeclList),
    Block(Vec<Stmt>),
    FunctionDecl(Box<FunctionLike>),
    Expression(Expr),
    If {
        cond: Expr,
        then: Box<Stmt>,
        else_: Option<Box<Stmt>>,
    },
    Do {
        body: Box<Stmt>,
        cond: Expr,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    For {
        init: Option<ForInit>,
        cond: Option<Expr>,
        incr: Option<Expr>,
        body: Box<Stmt>,
    },
    ForIn {
        init: ForInit,
        expr: Expr,
        body: Box<Stmt>,
    },
    ForOf {
        init: ForInit,
        expr: Expr,
        body: Box<Stmt>,
    },
    Continue(Option<Ident>),
    Break(Option<Ident>),
    Return(Option<Expr>),
    Switch {
        expr: Expr,
        clauses: Vec<SwitchClause>,
    },
    Labeled {
        label: Ident,
        body: Box<Stmt>,
    },
    Throw(Expr),
    Try {
        block: Vec<Stmt>,
        catch: Option<CatchClause>,
        finally: Option<Vec<Stmt>>,
    },
    ClassDecl(Box<ClassDecl>),
    Interface(Ident),
    TypeAlias(Ident),
    Empty,
    With {
        object: Expr,
        body: Box<Stmt>,
    },
    Debugger,
}

impl StmtKind {
    pub const fn kind_name(&self) -> &'static str {
        match self {
            StmtKind::Import => "ImportDeclaration",
            StmtKind::Variable(_) => "VariableStatement",
            StmtKind::Block(_) => "Block",
            StmtKind::FunctionDecl(_) => "FunctionDeclaration",
            StmtKind::Expression(_) => "ExpressionStatement",
            StmtKind::If { .. } => "IfStatement",
            StmtKind::Do { .. } => "DoStatement",
            StmtKind::While { .. } => "WhileStatement",
            StmtKind::For { .. } => "ForStatement",
            StmtKind::ForIn { .. } => "ForInStatement",
            StmtKind::ForOf { .. } => "ForOfStatement",
            StmtKind::Continue(_) => "ContinueStatement",
            StmtKind::Break(_) => "BreakStatement",
            StmtKind::Return(_) => "ReturnStatement",
            StmtKind::Switch { .. } => "SwitchStatement",
            StmtKind::Labeled { .. } => "LabeledStatement",
            StmtKind::Throw(_) => "ThrowStatement",
            StmtKind::Try { .. } => "TryStatement",
            StmtKind::ClassDecl(_) => "ClassDeclaration",
            StmtKind::Interface(_) => "InterfaceDeclaration",
            StmtKind::TypeAlias(_) => "TypeAliasDeclaration",
            StmtKind::Empty => "EmptyStatement",
            StmtKind::With { .. } => "WithStatement",
            StmtKind::Debugger => "DebuggerStatement",
        }
    }

    pub const fn is_loop(&self) -> bool {
        matches!(
            self,
            StmtKind::Do { .. }
                | StmtKind::While { .. }
                | StmtKind::For { .. }
                | StmtKind::ForIn { .. }
                | StmtKind::ForOf { .. }
        )
    }
}

// =============================================================================
// Classes
// =============================================================================

#[derive(Clone, Debug)]
pub struct ClassDecl {
    pub span: Span,
    pub name: Option<Ident>,
    pub extends: Option<Expr>,
    pub members: Vec<ClassMember>,
}

#[derive(Clone, Debug)]
pub struct ClassMember {
    pub span: Span,
    pub kind: ClassMemberKind,
}

#[derive(Clone, Debug)]
pub enum ClassMemberKind {
    Property {
        name: PropertyName,
        init: Option<Expr>,
        is_static: bool,
        is_readonly: bool,
        auto_accessor: bool,
    },
    Method {
        name: PropertyName,
        is_static: bool,
        func: FunctionLike,
    },
    GetAccessor {
        name: PropertyName,
        is_static: bool,
        func: FunctionLike,
    },
    SetAccessor {
        name: PropertyName,
        is_static: bool,
        func: FunctionLike,
    },
    Constructor(FunctionLike),
    StaticBlock(Vec<Stmt>),
    Semicolon,
    IndexSignature,
}
