use crate::error::ParseError;
use crate::tree::SyntaxTree;

/// Grammar entry point.
///
/// `previous` is the tree last produced for the same document. It is only a
/// reuse hint: implementations must return a correct tree for `source`
/// whether or not they make use of it.
pub trait Parser: Send {
    fn parse(
        &mut self,
        source: &str,
        previous: Option<&SyntaxTree>,
    ) -> Result<SyntaxTree, ParseError>;
}

impl<P: Parser + ?Sized> Parser for Box<P> {
    fn parse(
        &mut self,
        source: &str,
        previous: Option<&SyntaxTree>,
    ) -> Result<SyntaxTree, ParseError> {
        (**self).parse(source, previous)
    }
}
