//! Printing of `tsr-parser` arenas.
//!
//! `print_to_string` serialises a tree back to TypeScript, or to JavaScript
//! when `PrintOptions::strip_types` is set. Parsed and synthesized nodes are
//! printed the same way; no source text is consulted.

pub mod source_writer;
pub use source_writer::SourceWriter;

pub mod emitter;
pub use emitter::{PrintOptions, Printer, print_node, print_to_string, quote_string};
