//! Position to node resolution.
//!
//! The search is depth-first and tries children before their parent, so the
//! innermost containing node wins. Containment is half-open: a position on
//! a token's end boundary belongs to whatever follows it.

use pickscope_syntax::{Node, NodeKind, Point};

/// Which nodes a caller accepts when no child of a containing node does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolvable {
    /// Any leaf, including keywords, operators and punctuation.
    AnyLeaf,
    /// Any leaf, plus `identifier`, `number` and `label_name` nodes.
    LeafOrNamed,
    /// Only `identifier`, `number` and `label_name` nodes.
    Named,
}

impl Resolvable {
    pub fn accepts(self, node: Node<'_>) -> bool {
        let named = matches!(
            node.kind(),
            NodeKind::Identifier | NodeKind::Number | NodeKind::LabelName
        );
        match self {
            Resolvable::AnyLeaf => node.is_leaf(),
            Resolvable::LeafOrNamed => node.is_leaf() || named,
            Resolvable::Named => named,
        }
    }
}

/// Deepest node under `root` containing `point` that `policy` accepts.
pub fn node_at<'t>(root: Node<'t>, point: Point, policy: Resolvable) -> Option<Node<'t>> {
    // A node is offered to `policy` only after all of its children declined.
    let mut stack = vec![(root, false)];
    while let Some((node, expanded)) = stack.pop() {
        if expanded {
            if policy.accepts(node) {
                return Some(node);
            }
            continue;
        }
        if !node.contains_point(point) {
            continue;
        }
        stack.push((node, true));
        stack.extend(node.children().rev().map(|child| (child, false)));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pickscope_pickbasic::PickBasicParser;
    use pickscope_syntax::{Parser, SyntaxTree};

    fn parse(source: &str) -> SyntaxTree {
        PickBasicParser::new().parse(source, None).unwrap()
    }

    #[test]
    fn innermost_leaf_wins() {
        let tree = parse("X = CHAR(254)\n");
        let node = node_at(tree.root_node(), Point::new(0, 5), Resolvable::AnyLeaf).unwrap();
        assert_eq!(node.kind(), NodeKind::Identifier);
        assert_eq!(node.text(), "CHAR");
    }

    #[test]
    fn end_boundary_is_exclusive() {
        let tree = parse("GOTO 10\n");
        let root = tree.root_node();
        let at_start = node_at(root, Point::new(0, 5), Resolvable::AnyLeaf).unwrap();
        assert_eq!(at_start.text(), "10");
        // Column 7 is one past the end of `10`.
        assert!(node_at(root, Point::new(0, 7), Resolvable::AnyLeaf).is_none());
        // Column 4 is the space after GOTO: inside the statement, on no leaf.
        assert!(node_at(root, Point::new(0, 4), Resolvable::AnyLeaf).is_none());
    }

    #[test]
    fn policy_filters_keywords() {
        let tree = parse("GOTO 10\n");
        let root = tree.root_node();
        let keyword = node_at(root, Point::new(0, 1), Resolvable::AnyLeaf).unwrap();
        assert_eq!(keyword.text(), "GOTO");
        assert!(node_at(root, Point::new(0, 1), Resolvable::Named).is_none());
        assert!(node_at(root, Point::new(0, 1), Resolvable::LeafOrNamed).is_some());
    }

    #[test]
    fn positions_outside_the_tree_are_absent() {
        let tree = parse("X = 1\n");
        assert!(node_at(tree.root_node(), Point::new(5, 0), Resolvable::AnyLeaf).is_none());
    }

    #[test]
    fn multi_line_containment_uses_rows() {
        let tree = parse("IF A THEN\n  B = 1\nEND\n");
        let root = tree.root_node();
        let node = node_at(root, Point::new(1, 2), Resolvable::Named).unwrap();
        assert_eq!(node.text(), "B");
        let statement = root.child(0).unwrap();
        assert!(statement.contains_point(Point::new(1, 40)));
        assert!(!statement.contains_point(Point::new(2, 3)));
    }

    #[test]
    fn returned_node_always_contains_the_point() {
        let source = "SUBROUTINE S(A)\nEQU AM TO CHAR(254)\n10 X = A + 1 ; * note\nGOTO 10\n";
        let tree = parse(source);
        let lines = tree.line_index();
        for row in 0..lines.line_count() {
            let width = lines.line(source, row).map_or(0, str::len);
            for column in 0..=width + 1 {
                let point = Point::new(row, column);
                for policy in [Resolvable::AnyLeaf, Resolvable::LeafOrNamed, Resolvable::Named] {
                    if let Some(node) = node_at(tree.root_node(), point, policy) {
                        assert!(node.contains_point(point), "{node:?} at {point:?}");
                        assert!(policy.accepts(node));
                    }
                }
            }
        }
    }
}
