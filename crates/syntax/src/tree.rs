use crate::kind::{Field, NodeKind};
use crate::text::{LineIndex, Point};
use std::ops::Range;

/// Stable handle of a node inside one [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) field: Option<Field>,
    pub(crate) missing: bool,
    /// Grammar type of a missing anonymous token, e.g. `NEXT`.
    pub(crate) expected: Option<&'static str>,
    pub(crate) start_byte: usize,
    pub(crate) end_byte: usize,
    pub(crate) start: Point,
    pub(crate) end: Point,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

/// Immutable parse tree of one document.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub(crate) source: String,
    pub(crate) nodes: Vec<NodeData>,
    pub(crate) root: NodeId,
    pub(crate) lines: LineIndex,
    pub(crate) origin: Option<tree_sitter::Tree>,
}

impl SyntaxTree {
    pub fn root_node(&self) -> Node<'_> {
        Node {
            tree: self,
            id: self.root,
        }
    }

    pub fn node(&self, id: NodeId) -> Option<Node<'_>> {
        (id.index() < self.nodes.len()).then_some(Node { tree: self, id })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Byte point of a protocol (UTF-16) position.
    pub fn point_from_utf16(&self, line: u32, character: u32) -> Point {
        self.lines.point_from_utf16(&self.source, line, character)
    }

    /// Protocol (UTF-16) line and column of a byte point.
    pub fn utf16_position(&self, point: Point) -> (u32, u32) {
        (
            point.row as u32,
            self.lines.utf16_column(&self.source, point),
        )
    }

    /// The tree-sitter tree this arena was lowered from, if any.
    pub fn origin(&self) -> Option<&tree_sitter::Tree> {
        self.origin.as_ref()
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }
}

/// Copyable view of one node.
#[derive(Clone, Copy)]
pub struct Node<'t> {
    tree: &'t SyntaxTree,
    id: NodeId,
}

impl<'t> Node<'t> {
    fn data(&self) -> &'t NodeData {
        self.tree.data(self.id)
    }

    fn view(&self, id: NodeId) -> Node<'t> {
        Node {
            tree: self.tree,
            id,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'t SyntaxTree {
        self.tree
    }

    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind() == kind
    }

    /// Grammar type name: the token text for anonymous tokens, the expected
    /// token for missing ones.
    pub fn type_name(&self) -> &'t str {
        let data = self.data();
        if let Some(expected) = data.expected {
            return expected;
        }
        match data.kind {
            NodeKind::Token => self.text(),
            kind => kind.as_str(),
        }
    }

    pub fn text(&self) -> &'t str {
        let data = self.data();
        &self.tree.source[data.start_byte..data.end_byte]
    }

    pub fn byte_range(&self) -> Range<usize> {
        let data = self.data();
        data.start_byte..data.end_byte
    }

    pub fn start_point(&self) -> Point {
        self.data().start
    }

    pub fn end_point(&self) -> Point {
        self.data().end
    }

    pub fn is_missing(&self) -> bool {
        self.data().missing
    }

    pub fn is_error(&self) -> bool {
        self.data().kind == NodeKind::Error
    }

    pub fn is_leaf(&self) -> bool {
        self.data().children.is_empty()
    }

    pub fn field(&self) -> Option<Field> {
        self.data().field
    }

    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    pub fn child(&self, index: usize) -> Option<Node<'t>> {
        self.data().children.get(index).map(|id| self.view(*id))
    }

    pub fn children(self) -> impl DoubleEndedIterator<Item = Node<'t>> + 't {
        let tree = self.tree;
        tree.data(self.id)
            .children
            .iter()
            .map(move |id| Node { tree, id: *id })
    }

    pub fn parent(&self) -> Option<Node<'t>> {
        self.data().parent.map(|id| self.view(id))
    }

    pub fn child_by_field(&self, field: Field) -> Option<Node<'t>> {
        self.children().find(|child| child.field() == Some(field))
    }

    pub fn first_child_of_kind(&self, kind: NodeKind) -> Option<Node<'t>> {
        self.children().find(|child| child.kind() == kind)
    }

    /// This node and everything below it, in pre-order.
    pub fn descendants(&self) -> Descendants<'t> {
        Descendants {
            tree: self.tree,
            stack: vec![self.id],
        }
    }

    /// Half-open containment, row-major: `start <= point < end`.
    pub fn contains_point(&self, point: Point) -> bool {
        let start = self.start_point();
        let end = self.end_point();
        if point.row < start.row || point.row > end.row {
            return false;
        }
        if point.row == start.row && point.column < start.column {
            return false;
        }
        if point.row == end.row && point.column >= end.column {
            return false;
        }
        true
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let start = self.start_point();
        let end = self.end_point();
        write!(
            f,
            "{} [{}, {}] - [{}, {}]",
            self.type_name(),
            start.row,
            start.column,
            end.row,
            end.column
        )?;
        if self.is_missing() {
            f.write_str(" (missing)")?;
        }
        Ok(())
    }
}

/// Pre-order walk driven by an explicit stack.
pub struct Descendants<'t> {
    tree: &'t SyntaxTree,
    stack: Vec<NodeId>,
}

impl<'t> Iterator for Descendants<'t> {
    type Item = Node<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let data = self.tree.data(id);
        self.stack.extend(data.children.iter().rev().copied());
        Some(Node {
            tree: self.tree,
            id,
        })
    }
}
