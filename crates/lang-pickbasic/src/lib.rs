//! Pick BASIC grammar.
//!
//! [`PickBasicParser`] plugs the hand-written dialect grammar into the
//! [`Parser`] seam of `pickscope-syntax`.

pub mod grammar;
pub mod lexer;

use pickscope_syntax::{ParseError, Parser, SyntaxTree};

#[derive(Debug, Default)]
pub struct PickBasicParser;

impl PickBasicParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for PickBasicParser {
    fn parse(
        &mut self,
        source: &str,
        previous: Option<&SyntaxTree>,
    ) -> Result<SyntaxTree, ParseError> {
        if let Some(previous) = previous.filter(|tree| tree.source() == source) {
            tracing::trace!("source unchanged, reusing previous tree");
            return Ok(previous.clone());
        }
        let tree = grammar::parse_source(source);
        tracing::trace!(nodes = tree.len(), bytes = source.len(), "parsed document");
        Ok(tree)
    }
}
