//! TypeScript parser and AST types for tsr.
//!
//! - `NodeIndex` / `NodeList` - handles into a `NodeArena`
//! - `Node` - the closed set of syntax node variants
//! - `NodeArena` - node storage with text ranges and parent links
//! - `fold` - generic traversal helpers over any arena-like tree
//! - `ParserState` - recursive-descent parser producing a `NodeArena`

pub mod base;
pub use base::{NodeIndex, NodeList, TextRange};

pub mod node;
pub use node::*;

pub mod arena;
pub use arena::NodeArena;

pub mod fold;

pub mod parser;
pub use parser::{ParseResult, ParserState, parse_source};
