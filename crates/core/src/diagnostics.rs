use crate::util::node_range;
use lsp_types::{Diagnostic, DiagnosticSeverity};
use pickscope_syntax::{Node, SyntaxTree};

/// One error diagnostic per missing node and per `ERROR` node, in
/// pre-order. The contents of an `ERROR` node are not reported again.
pub fn collect_diagnostics(tree: &SyntaxTree, source: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut stack = vec![tree.root_node()];
    while let Some(node) = stack.pop() {
        let message = if node.is_missing() {
            format!("Missing {}", node.type_name())
        } else if node.is_error() {
            "Syntax error".to_string()
        } else {
            stack.extend(node.children().rev());
            continue;
        };
        diagnostics.push(error(tree, node, source, message));
    }
    diagnostics
}

fn error(tree: &SyntaxTree, node: Node<'_>, source: &str, message: String) -> Diagnostic {
    Diagnostic {
        range: node_range(tree, node),
        severity: Some(DiagnosticSeverity::ERROR),
        source: Some(source.to_string()),
        message,
        ..Default::default()
    }
}
