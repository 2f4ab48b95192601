//! tsr rewrites a TypeScript program so that its static types are checked
//! at runtime.
//!
//! The work is split over the workspace crates:
//!
//! - `tsr_scanner` / `tsr_parser` / `tsr_emitter` - tokens, syntax tree, printer
//! - `tsr_common` - diagnostics, options, run events
//! - `tsr_core` - the two-pass mutation pipeline
//! - `tsr_binder` - the semantic host used by the CLI
//!
//! This crate adds the command-line front end and tracing setup.

pub mod cli;
pub mod tracing_config;

pub use tsr_binder::BinderHost;
pub use tsr_common::{
    CompilerOptions, Diagnostic, Observers, TransformEvent, TransformObserver, TransformOptions,
};
pub use tsr_core::{Pipeline, PipelineState, TransformError, TransformOutcome};
