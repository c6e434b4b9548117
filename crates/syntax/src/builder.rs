use crate::kind::{Field, NodeKind};
use crate::text::{LineIndex, Point};
use crate::tree::{NodeData, NodeId, SyntaxTree};
use std::ops::Range;

/// Position in the children of the currently open node, taken before a
/// child is built so it can later be wrapped by [`TreeBuilder::open_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// Event-style tree construction.
///
/// Leaves carry explicit byte ranges. Interior nodes either span their
/// children ([`close`](Self::close)) or an explicit range
/// ([`close_spanning`](Self::close_spanning)). Childless interior nodes
/// collapse to a zero-width span at the last position seen.
pub struct TreeBuilder {
    source: String,
    nodes: Vec<NodeData>,
    stack: Vec<NodeId>,
    cursor: usize,
    origin: Option<tree_sitter::Tree>,
}

impl TreeBuilder {
    /// Starts a tree whose root has the given kind.
    pub fn new(source: impl Into<String>, root: NodeKind) -> Self {
        let mut builder = Self {
            source: source.into(),
            nodes: Vec::new(),
            stack: Vec::new(),
            cursor: 0,
            origin: None,
        };
        builder.open(root, None);
        builder
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Records the tree-sitter tree the arena is being lowered from.
    pub fn set_origin(&mut self, origin: tree_sitter::Tree) {
        self.origin = Some(origin);
    }

    pub fn checkpoint(&self) -> Checkpoint {
        let children = self
            .stack
            .last()
            .map(|id| self.nodes[id.index()].children.len())
            .unwrap_or(0);
        Checkpoint(children)
    }

    pub fn open(&mut self, kind: NodeKind, field: Option<Field>) {
        let id = self.alloc(kind, field, self.cursor..self.cursor);
        self.attach(id);
        self.stack.push(id);
    }

    /// Opens a node that adopts every child built since `checkpoint`.
    pub fn open_at(&mut self, checkpoint: Checkpoint, kind: NodeKind, field: Option<Field>) {
        let id = self.alloc(kind, field, self.cursor..self.cursor);
        if let Some(parent) = self.stack.last().copied() {
            let siblings = &mut self.nodes[parent.index()].children;
            let adopted = siblings.split_off(checkpoint.0.min(siblings.len()));
            siblings.push(id);
            for child in &adopted {
                self.nodes[child.index()].parent = Some(id);
            }
            self.nodes[id.index()].parent = Some(parent);
            self.nodes[id.index()].children = adopted;
        }
        self.stack.push(id);
    }

    /// Labels the child built at `checkpoint` after the fact, for nodes that
    /// may since have been wrapped by [`open_at`](Self::open_at).
    pub fn set_field_at(&mut self, checkpoint: Checkpoint, field: Option<Field>) {
        let Some(parent) = self.stack.last().copied() else {
            return;
        };
        if let Some(child) = self.nodes[parent.index()].children.get(checkpoint.0).copied() {
            self.nodes[child.index()].field = field;
        }
    }

    pub fn leaf(&mut self, kind: NodeKind, field: Option<Field>, range: Range<usize>) {
        self.cursor = range.end;
        let id = self.alloc(kind, field, range);
        self.attach(id);
    }

    /// Zero-width node standing in for something error recovery expected.
    pub fn missing(
        &mut self,
        kind: NodeKind,
        field: Option<Field>,
        expected: Option<&'static str>,
        at: usize,
    ) {
        let id = self.alloc(kind, field, at..at);
        let data = &mut self.nodes[id.index()];
        data.missing = true;
        data.expected = expected;
        self.attach(id);
    }

    /// Closes the innermost open node, spanning its children.
    pub fn close(&mut self) {
        let Some(id) = self.stack.pop() else {
            return;
        };
        let data = &self.nodes[id.index()];
        let span = match (data.children.first(), data.children.last()) {
            (Some(first), Some(last)) => {
                self.nodes[first.index()].start_byte..self.nodes[last.index()].end_byte
            }
            _ => self.cursor..self.cursor,
        };
        let data = &mut self.nodes[id.index()];
        data.start_byte = span.start;
        data.end_byte = span.end;
    }

    /// Closes the innermost open node with an explicit span.
    pub fn close_spanning(&mut self, range: Range<usize>) {
        let Some(id) = self.stack.pop() else {
            return;
        };
        self.cursor = self.cursor.max(range.end);
        let data = &mut self.nodes[id.index()];
        data.start_byte = range.start;
        data.end_byte = range.end;
    }

    /// Closes every open node; the root always spans the whole source.
    pub fn finish(mut self) -> SyntaxTree {
        while self.stack.len() > 1 {
            self.close();
        }
        let len = self.source.len();
        self.close_spanning(0..len);

        let lines = LineIndex::new(&self.source);
        for data in &mut self.nodes {
            data.start = lines.point(data.start_byte);
            data.end = lines.point(data.end_byte);
        }

        SyntaxTree {
            source: self.source,
            nodes: self.nodes,
            root: NodeId(0),
            lines,
            origin: self.origin,
        }
    }

    fn alloc(&mut self, kind: NodeKind, field: Option<Field>, range: Range<usize>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind,
            field,
            missing: false,
            expected: None,
            start_byte: range.start,
            end_byte: range.end,
            start: Point::default(),
            end: Point::default(),
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn attach(&mut self, id: NodeId) {
        if let Some(parent) = self.stack.last().copied() {
            self.nodes[parent.index()].children.push(id);
            self.nodes[id.index()].parent = Some(parent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SyntaxTree {
        // X = 1 + 2
        let mut builder = TreeBuilder::new("X = 1 + 2\n", NodeKind::SourceFile);
        builder.open(NodeKind::AssignmentStatement, None);
        builder.open(NodeKind::Lvalue, None);
        builder.leaf(NodeKind::Identifier, None, 0..1);
        builder.close();
        builder.leaf(NodeKind::Token, None, 2..3);
        let checkpoint = builder.checkpoint();
        builder.leaf(NodeKind::Number, Some(Field::Value), 4..5);
        builder.open_at(checkpoint, NodeKind::BinaryExpression, Some(Field::Value));
        builder.leaf(NodeKind::Token, None, 6..7);
        builder.leaf(NodeKind::Number, None, 8..9);
        builder.close();
        builder.close();
        builder.finish()
    }

    #[test]
    fn interior_nodes_span_their_children() {
        let tree = sample();
        let root = tree.root_node();
        assert_eq!(root.byte_range(), 0..10);
        let statement = root.child(0).unwrap();
        assert_eq!(statement.kind(), NodeKind::AssignmentStatement);
        assert_eq!(statement.text(), "X = 1 + 2");
        assert_eq!(statement.child_count(), 3);
    }

    #[test]
    fn open_at_adopts_children_built_since_checkpoint() {
        let tree = sample();
        let statement = tree.root_node().child(0).unwrap();
        let value = statement.child_by_field(Field::Value).unwrap();
        assert_eq!(value.kind(), NodeKind::BinaryExpression);
        assert_eq!(value.text(), "1 + 2");
        let left = value.child(0).unwrap();
        assert_eq!(left.text(), "1");
        assert_eq!(left.parent(), Some(value));
    }

    #[test]
    fn missing_nodes_are_zero_width_and_flagged() {
        let mut builder = TreeBuilder::new("FOR I = 1 TO 3", NodeKind::SourceFile);
        builder.open(NodeKind::ForStatement, None);
        builder.leaf(NodeKind::Token, None, 0..3);
        builder.missing(NodeKind::Token, None, Some("NEXT"), 14);
        builder.close();
        let tree = builder.finish();
        let for_node = tree.root_node().child(0).unwrap();
        let next = for_node.child(1).unwrap();
        assert!(next.is_missing());
        assert_eq!(next.type_name(), "NEXT");
        assert_eq!(next.byte_range(), 14..14);
        assert_eq!(next.start_point(), Point::new(0, 14));
    }
}
