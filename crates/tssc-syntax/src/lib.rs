//! Syntax tree consumed by the tssc code generator.
//!
//! The tree is produced by an upstream parser/type checker (see [`frontend`]);
//! the generator only reads it. Every node category is a closed enum so that
//! lowering code matches exhaustively and new variants surface at build time.
//!
//! - [`ast`]: units, statements, expressions, classes, binding patterns
//! - [`ops`]: operator enums
//! - [`builder`]: id-allocating constructors for real and synthetic nodes
//! - [`visit`]: read-only traversal
//! - [`query`]: structural questions the generator asks about subtrees
//! - [`frontend`]: `Frontend` / `TypeService` collaborator traits

pub mod ast;
pub mod builder;
pub mod frontend;
pub mod node_id;
pub mod ops;
pub mod query;
pub mod visit;

pub use ast::*;
pub use builder::AstBuilder;
pub use frontend::{
    Frontend, NoTypeInfo, ParseDiagnostic, ParseError, TypeDescriptor, TypeService, TypeTable,
};
pub use node_id::NodeId;
pub use ops::{BinaryOp, PostfixOp, PrefixOp};
