//! Adapter for grammars compiled with tree-sitter.
//!
//! Trees are lowered into the arena form once per parse. The tree-sitter
//! tree is kept as the arena's origin so the next parse of the same document
//! can hand it back to tree-sitter; before that, the edit between the old and
//! new source is computed and applied, otherwise tree-sitter would reuse
//! subtrees whose text has changed.

use crate::builder::TreeBuilder;
use crate::error::ParseError;
use crate::kind::{Field, NodeKind};
use crate::parser::Parser;
use crate::text::{LineIndex, Point};
use crate::tree::SyntaxTree;
use tree_sitter::{InputEdit, Language, Tree, TreeCursor};

pub struct TreeSitterParser {
    parser: tree_sitter::Parser,
}

impl TreeSitterParser {
    pub fn new(language: &Language) -> Result<Self, ParseError> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(language)
            .map_err(|e| ParseError::Language(e.to_string()))?;
        Ok(Self { parser })
    }
}

impl Parser for TreeSitterParser {
    fn parse(
        &mut self,
        source: &str,
        previous: Option<&SyntaxTree>,
    ) -> Result<SyntaxTree, ParseError> {
        let hint = previous.and_then(|prev| edited_origin(prev, source));
        if hint.is_some() {
            tracing::trace!("reparsing with previous tree as hint");
        }
        let tree = self
            .parser
            .parse(source, hint.as_ref())
            .ok_or(ParseError::NoTree)?;
        Ok(lower(tree, source))
    }
}

fn edited_origin(previous: &SyntaxTree, source: &str) -> Option<Tree> {
    let mut tree = previous.origin()?.clone();
    if let Some(edit) = compute_edit(previous.source(), source) {
        tree.edit(&edit);
    }
    Some(tree)
}

/// Single edit turning `old` into `new`, bounded by their common prefix
/// and suffix. `None` when the texts are identical.
pub fn compute_edit(old: &str, new: &str) -> Option<InputEdit> {
    if old == new {
        return None;
    }
    let (old_bytes, new_bytes) = (old.as_bytes(), new.as_bytes());

    let mut prefix = old_bytes
        .iter()
        .zip(new_bytes)
        .take_while(|(a, b)| a == b)
        .count();
    while !(old.is_char_boundary(prefix) && new.is_char_boundary(prefix)) {
        prefix -= 1;
    }

    let max_suffix = old.len().min(new.len()) - prefix;
    let mut suffix = old_bytes
        .iter()
        .rev()
        .zip(new_bytes.iter().rev())
        .take(max_suffix)
        .take_while(|(a, b)| a == b)
        .count();
    while !(old.is_char_boundary(old.len() - suffix) && new.is_char_boundary(new.len() - suffix))
    {
        suffix -= 1;
    }

    let old_end = old.len() - suffix;
    let new_end = new.len() - suffix;
    let old_lines = LineIndex::new(old);
    let new_lines = LineIndex::new(new);

    Some(InputEdit {
        start_byte: prefix,
        old_end_byte: old_end,
        new_end_byte: new_end,
        start_position: ts_point(old_lines.point(prefix)),
        old_end_position: ts_point(old_lines.point(old_end)),
        new_end_position: ts_point(new_lines.point(new_end)),
    })
}

/// Lowers a tree-sitter tree into the arena form.
pub fn lower(tree: Tree, source: &str) -> SyntaxTree {
    let mut builder = {
        let root = tree.root_node();
        let mut builder = TreeBuilder::new(source, kind_of(&root));
        let mut cursor = root.walk();
        if cursor.goto_first_child() {
            lower_siblings(&mut cursor, &mut builder);
        }
        builder
    };
    builder.set_origin(tree);
    builder.finish()
}

fn lower_siblings(cursor: &mut TreeCursor, builder: &mut TreeBuilder) {
    loop {
        let node = cursor.node();
        let field = cursor.field_name().and_then(Field::from_name);
        let kind = kind_of(&node);

        if node.is_missing() {
            builder.missing(kind, field, Some(node.kind()), node.start_byte());
        } else if node.child_count() == 0 {
            builder.leaf(kind, field, node.byte_range());
        } else {
            builder.open(kind, field);
            if cursor.goto_first_child() {
                lower_siblings(cursor, builder);
                cursor.goto_parent();
            }
            builder.close_spanning(node.byte_range());
        }

        if !cursor.goto_next_sibling() {
            break;
        }
    }
}

fn kind_of(node: &tree_sitter::Node) -> NodeKind {
    if node.is_error() {
        NodeKind::Error
    } else if !node.is_named() {
        NodeKind::Token
    } else {
        NodeKind::from_name(node.kind()).unwrap_or(NodeKind::Unknown)
    }
}

fn ts_point(point: Point) -> tree_sitter::Point {
    tree_sitter::Point::new(point.row, point.column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_covers_only_the_changed_region() {
        let edit = compute_edit("X = 1\nY = 2\n", "X = 1\nY = 42\n").unwrap();
        assert_eq!(edit.start_byte, 10);
        assert_eq!(edit.old_end_byte, 10);
        assert_eq!(edit.new_end_byte, 11);
        assert_eq!(edit.start_position, tree_sitter::Point::new(1, 4));
    }

    #[test]
    fn edit_never_splits_a_character() {
        let edit = compute_edit("A = \"é\"", "A = \"è\"").unwrap();
        assert_eq!(edit.start_byte, 5);
        assert_eq!(edit.old_end_byte, 7);
        assert_eq!(edit.new_end_byte, 7);
    }

    #[test]
    fn identical_sources_need_no_edit() {
        assert!(compute_edit("PRINT 1", "PRINT 1").is_none());
    }
}
