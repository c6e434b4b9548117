//! Syntax layer shared by every Pick BASIC grammar and by the query engine.
//!
//! Trees are stored as an arena of node records addressed by [`NodeId`];
//! [`Node`] is a cheap copyable view into that arena. Grammars build trees
//! through [`TreeBuilder`] and are plugged in behind the [`Parser`] trait.

pub mod builder;
pub mod error;
pub mod kind;
pub mod parser;
pub mod text;
pub mod tree;
pub mod ts;

pub use builder::{Checkpoint, TreeBuilder};
pub use error::ParseError;
pub use kind::{Field, NodeKind};
pub use parser::Parser;
pub use text::{LineIndex, Point};
pub use tree::{Descendants, Node, NodeId, SyntaxTree};
pub use ts::TreeSitterParser;
