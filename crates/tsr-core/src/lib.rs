//! Two-pass mutation pipeline for tsr.
//!
//! - `semantics` - the port to a semantic analysis facility (`SemanticModel`, `SemanticHost`)
//! - `Scanner` - per-generation cache of type attributes and node identities
//! - `MutationContext` - per-unit working arena, skip set and semantic queries
//! - `Factory` - construction of runtime-check code
//! - `reflect` - type nodes to runtime descriptor expressions
//! - `normalize` / `mutate` - the two tree passes
//! - `Pipeline` - check, rewrite, re-derive and emit a program

pub mod error;
pub use error::{Result, TransformError};

pub mod semantics;
pub use semantics::{
    NodeRef, ResolvedType, SemanticHost, SemanticModel, SourceUnit, SymbolFlags, SymbolId,
    SymbolInfo, UnitId,
};

pub mod scanner;
pub use scanner::{DeclarationRecord, Scanner, TypeInfo};

pub mod context;
pub use context::{LibBinding, MutationContext};

pub mod factory;
pub use factory::Factory;

pub mod reflect;

pub mod mutators;
pub use mutators::{Mutation, Mutator, mutators_for};

pub mod normalize;
pub use normalize::normalize_unit;

pub mod mutate;
pub use mutate::mutate_unit;

pub mod workspace;
pub use workspace::{TempWorkspace, normalize_path};

pub mod pipeline;
pub use pipeline::{Pipeline, PipelineState, TransformOutcome};

#[cfg(test)]
#[path = "tests/test_support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/context_tests.rs"]
mod context_tests;

#[cfg(test)]
#[path = "tests/pass_tests.rs"]
mod pass_tests;

#[cfg(test)]
#[path = "tests/workspace_tests.rs"]
mod workspace_tests;
