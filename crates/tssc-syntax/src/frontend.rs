//! Upstream collaborators: the parser that produces [`SourceUnit`]s and the
//! type service that annotates their nodes.

use rustc_hash::FxHashMap;
use serde::Serialize;
use thiserror::Error;
use tssc_common::Position;

use crate::ast::SourceUnit;
use crate::node_id::NodeId;

/// Produces annotated syntax trees.
pub trait Frontend {
    fn parse(&self, unit_id: &str) -> Result<SourceUnit, ParseError>;
}

#[derive(Clone, Debug, Serialize)]
pub struct ParseDiagnostic {
    pub position: Option<Position>,
    pub message: String,
}

#[derive(Clone, Debug, Error)]
#[error("failed to parse {file}: {}", render_diagnostics(.diagnostics))]
pub struct ParseError {
    pub file: String,
    pub diagnostics: Vec<ParseDiagnostic>,
}

fn render_diagnostics(diagnostics: &[ParseDiagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| match d.position {
            Some(pos) => format!("({}, {}) {}", pos.line + 1, pos.character + 1, d.message),
            None => d.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

impl ParseError {
    pub fn new(file: impl Into<String>, diagnostics: Vec<ParseDiagnostic>) -> Self {
        ParseError {
            file: file.into(),
            diagnostics,
        }
    }
}

/// What the type checker knows about one node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TypeDescriptor {
    /// The value's type is an object literal type.
    pub is_object_literal: bool,
    /// The node denotes a method (as opposed to a plain function value).
    pub is_method: bool,
    /// The node denotes a class.
    pub is_class: bool,
    /// The symbol is declared by the default library (`Math`, `Array`, ...).
    pub from_default_library: bool,
    pub symbol_name: Option<String>,
    pub base_type_names: Vec<String>,
}

/// Answers type queries by node identity.
pub trait TypeService {
    fn type_of(&self, node: NodeId) -> TypeDescriptor;

    fn is_object_literal(&self, node: NodeId) -> bool {
        self.type_of(node).is_object_literal
    }

    fn is_method(&self, node: NodeId) -> bool {
        self.type_of(node).is_method
    }

    fn from_default_library(&self, node: NodeId) -> bool {
        self.type_of(node).from_default_library
    }
}

/// Type service without any information; lowering falls back to syntax.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTypeInfo;

impl TypeService for NoTypeInfo {
    fn type_of(&self, _node: NodeId) -> TypeDescriptor {
        TypeDescriptor::default()
    }
}

/// Precomputed answers, usually filled by a checker pass.
#[derive(Clone, Debug, Default)]
pub struct TypeTable {
    entries: FxHashMap<NodeId, TypeDescriptor>,
}

impl TypeTable {
    pub fn new() -> Self {
        TypeTable::default()
    }

    pub fn insert(&mut self, node: NodeId, descriptor: TypeDescriptor) {
        self.entries.insert(node, descriptor);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TypeService for TypeTable {
    fn type_of(&self, node: NodeId) -> TypeDescriptor {
        if node.is_synthetic() {
            return TypeDescriptor::default();
        }
        self.entries.get(&node).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "../tests/frontend.rs"]
mod tests;
