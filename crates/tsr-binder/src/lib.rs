//! Module loading, name binding and the semantic host for tsr.
//!
//! - `load_program` - reads root files and follows relative imports
//! - `BinderState` - declares symbols into scopes and resolves references
//! - `Program` - a bound program implementing `SemanticModel`
//! - `BinderHost` - `SemanticHost` creating programs and emitting JavaScript

pub mod symbols;
pub use symbols::{ContainerKind, Scope, ScopeId, SymbolArena, can_merge_flags};

pub mod globals;

pub mod loader;
pub use loader::{LoadedProgram, load_program};

pub mod options;
pub use options::check_options;

pub mod state;
pub use state::{BindResult, BinderState};

mod state_binding;
mod state_import_export;
mod state_resolution;

pub mod program;
pub use program::Program;

pub mod host;
pub use host::BinderHost;
