//! Occurrence search for identifiers, labels and numeric labels.

use pickscope_syntax::{Node, NodeKind};

/// Every occurrence of `name` in the tree, in document order.
///
/// Identifiers and label names match case-insensitively. Numbers match
/// exactly and only where they name a label: inside a `label` or as the
/// target of a branch statement. Numeric literals used as values never
/// match.
pub fn find_references<'t>(root: Node<'t>, name: &str) -> Vec<Node<'t>> {
    if name.is_empty() {
        return Vec::new();
    }
    root.descendants()
        .filter(|node| !node.is_missing() && is_occurrence(*node, name))
        .collect()
}

fn is_occurrence(node: Node<'_>, name: &str) -> bool {
    match node.kind() {
        NodeKind::Identifier | NodeKind::LabelName => node.text().eq_ignore_ascii_case(name),
        NodeKind::Number => {
            node.text() == name && node.parent().is_some_and(|p| p.kind().is_label_bearing())
        }
        _ => false,
    }
}

/// Whether `inner` lies within `outer`'s byte span.
pub fn is_within(inner: Node<'_>, outer: Node<'_>) -> bool {
    let (inner, outer) = (inner.byte_range(), outer.byte_range());
    outer.start <= inner.start && inner.end <= outer.end
}
