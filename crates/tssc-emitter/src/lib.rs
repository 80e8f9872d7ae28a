//! sclang code generation for tssc.
//!
//! Lowers a [`tssc_syntax::SourceUnit`] to SuperCollider's sclang: a script
//! body (`.scd`) plus one class block per extracted class.
//!
//! # Usage
//!
//! ```ignore
//! use tssc_emitter::{ConvertOptions, Session};
//!
//! let mut session = Session::new();
//! session.add_unit(unit);
//! let converted = session.convert("main.ts")?;
//! println!("{}", converted.body);
//! ```
//!
//! - [`context`]: the immutable generation context threaded through lowering
//! - [`hoist`]: declaration hoisting and binding-pattern flattening
//! - [`emitter`]: expression, statement and class lowering
//! - [`preprocess`]: the once-per-unit scan and its session cache
//! - [`unit`]: unit assembly
//! - [`session`]: unit registry, artifact writing, batches

pub mod context;
pub mod emitter;
pub mod error;
pub mod hoist;
pub mod names;
pub mod preprocess;
pub mod session;
pub mod tracing_config;
pub mod unit;

pub use context::{BreakMeans, ClassInfo, GenContext, LoopInterrupt, SuperMeans, ThisBinding};
pub use emitter::{Emitter, has_early_return};
pub use error::{EmitError, EmitResult, ErrorOrigin};
pub use hoist::{DeclCollection, DeclKind, Declarations, extract_declarations, solve_binding};
pub use preprocess::{ExtractedClass, PreprocessingCache, PreprocessingPack, find_preprocessing_needed};
pub use session::{BatchReport, Session, UnitOutcome, default_output_path};
pub use unit::{ConvertOptions, ConvertedClass, ConvertedUnit, convert_unit};
