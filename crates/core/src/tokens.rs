//! Semantic highlighting: leaf classification and the protocol's relative
//! encoding.

use crate::hover::is_callee;
use crate::tables;
use lsp_types::{SemanticToken, SemanticTokenModifier, SemanticTokenType, SemanticTokensLegend};
use pickscope_syntax::text::utf16_len;
use pickscope_syntax::{Node, NodeKind, SyntaxTree};

/// Indices into [`legend`]'s token types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum TokenType {
    Keyword = 0,
    Operator = 1,
    Number = 2,
    String = 3,
    Function = 4,
    Variable = 5,
    Label = 6,
    Comment = 7,
}

pub fn legend() -> SemanticTokensLegend {
    SemanticTokensLegend {
        token_types: vec![
            SemanticTokenType::KEYWORD,
            SemanticTokenType::OPERATOR,
            SemanticTokenType::NUMBER,
            SemanticTokenType::STRING,
            SemanticTokenType::FUNCTION,
            SemanticTokenType::VARIABLE,
            SemanticTokenType::new("label"),
            SemanticTokenType::COMMENT,
        ],
        token_modifiers: vec![
            SemanticTokenModifier::DECLARATION,
            SemanticTokenModifier::READONLY,
        ],
    }
}

/// A classified token in absolute protocol coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedToken {
    pub line: u32,
    pub start: u32,
    /// UTF-16 width of the token's first line.
    pub length: u32,
    pub token_type: TokenType,
    pub modifiers: u32,
}

/// Every classifiable leaf plus whole comments, sorted by position.
/// Zero-width tokens (including synthesized missing nodes) are dropped.
pub fn classify(tree: &SyntaxTree) -> Vec<ClassifiedToken> {
    let mut tokens = Vec::new();
    let mut stack = vec![tree.root_node()];
    while let Some(node) = stack.pop() {
        if node.is(NodeKind::Comment) {
            push(tree, node, TokenType::Comment, &mut tokens);
        } else if node.is_leaf() {
            if let Some(token_type) = leaf_type(node) {
                push(tree, node, token_type, &mut tokens);
            }
        } else {
            stack.extend(node.children().rev());
        }
    }
    tokens.sort_by_key(|t| (t.line, t.start));
    tokens
}

fn leaf_type(node: Node<'_>) -> Option<TokenType> {
    match node.kind() {
        NodeKind::Number => Some(TokenType::Number),
        NodeKind::String => Some(TokenType::String),
        NodeKind::LabelName => Some(TokenType::Label),
        NodeKind::Identifier if is_callee(node) => Some(TokenType::Function),
        NodeKind::Identifier => Some(TokenType::Variable),
        _ => {
            let text = node.text();
            if tables::is_highlight_keyword(text) {
                Some(TokenType::Keyword)
            } else if tables::is_highlight_operator(text) {
                Some(TokenType::Operator)
            } else {
                None
            }
        }
    }
}

fn push(tree: &SyntaxTree, node: Node<'_>, token_type: TokenType, tokens: &mut Vec<ClassifiedToken>) {
    let first_line = node.text().lines().next().unwrap_or("");
    let length = utf16_len(first_line);
    if length == 0 {
        return;
    }
    let (line, start) = tree.utf16_position(node.start_point());
    tokens.push(ClassifiedToken {
        line,
        start,
        length,
        token_type,
        modifiers: 0,
    });
}

/// Relative encoding: the start column is relative to the previous token
/// only while both share a line.
pub fn encode(tokens: &[ClassifiedToken]) -> Vec<SemanticToken> {
    let mut previous_line = 0;
    let mut previous_start = 0;
    tokens
        .iter()
        .map(|token| {
            let delta_line = token.line - previous_line;
            let delta_start = if delta_line == 0 {
                token.start - previous_start
            } else {
                token.start
            };
            previous_line = token.line;
            previous_start = token.start;
            SemanticToken {
                delta_line,
                delta_start,
                length: token.length,
                token_type: token.token_type as u32,
                token_modifiers_bitset: token.modifiers,
            }
        })
        .collect()
}
