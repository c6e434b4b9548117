use crate::declaration::{DeclarationStrategy, ExplicitDeclaration};
use crate::position::{Resolvable, node_at};
use crate::tables;
use pickscope_syntax::{Field, Node, NodeKind, Point};

/// Markdown description of the node under the cursor.
#[derive(Debug, Clone)]
pub struct HoverInfo<'t> {
    pub markdown: String,
    pub node: Node<'t>,
}

/// Classifies the node at `point`: keyword, function call, known function,
/// label, then identifier.
pub fn hover<'t>(root: Node<'t>, point: Point) -> Option<HoverInfo<'t>> {
    let node = node_at(root, point, Resolvable::LeafOrNamed)?;
    let markdown = describe(root, node)?;
    Some(HoverInfo { markdown, node })
}

fn describe(root: Node<'_>, node: Node<'_>) -> Option<String> {
    let text = node.text();

    if let Some(info) = tables::keyword_info(text) {
        return Some(info.to_string());
    }

    if is_callee(node) {
        return Some(match tables::function_info(text) {
            Some(info) => info.to_string(),
            None => format!("**{text}()**\n\nFunction call"),
        });
    }

    if let Some(info) = tables::function_info(text) {
        return Some(info.to_string());
    }

    match node.kind() {
        NodeKind::LabelName => Some(format!("**Label** `{text}`")),
        NodeKind::Identifier => Some(describe_identifier(root, text)),
        _ => None,
    }
}

/// Whether `node` is the `name` field of a `function_call`.
pub fn is_callee(node: Node<'_>) -> bool {
    node.field() == Some(Field::Name)
        && node.parent().is_some_and(|p| p.is(NodeKind::FunctionCall))
}

fn describe_identifier(root: Node<'_>, name: &str) -> String {
    let Some(declaration) = ExplicitDeclaration::data_forms().resolve(root, name) else {
        return format!("**Variable** `{name}`");
    };
    let heading = match declaration.kind() {
        NodeKind::EquateStatement => "**EQUATE** constant",
        NodeKind::DimStatement => "**DIM** array",
        _ => "**COMMON** variable",
    };
    format!("{heading}\n\n`{}`", declaration.text())
}
