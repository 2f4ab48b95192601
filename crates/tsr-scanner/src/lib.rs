//! TypeScript scanner/tokenizer for tsr.
//!
//! - `SyntaxKind` - Token types
//! - `ScannerState` - Tokenizer state machine with save/restore for look-ahead

mod syntax_kind;
pub use syntax_kind::*;

mod scanner_impl;
pub use scanner_impl::{ScannerDiagnostic, ScannerSnapshot, ScannerState, TokenFlags};

#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod scanner_tests;
