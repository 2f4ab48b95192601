//! Common types shared by every tsr crate.
//!
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, message templates)
//! - Run configuration (`TransformOptions`, `CompilerOptions`)
//! - Run events and the observer interface (`TransformEvent`, `TransformObserver`)

pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticMessage, format_message};

pub mod options;
pub use options::{CompilerOptions, TransformOptions};

pub mod events;
pub use events::{Observers, TransformEvent, TransformObserver};
