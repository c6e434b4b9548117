use crate::tables::{self, COMPLETION_FUNCTIONS, COMPLETION_KEYWORDS};
use lsp_types::{CompletionItem, CompletionItemKind};
use pickscope_syntax::{Node, NodeKind};

pub const TRIGGER_CHARACTERS: &[&str] = &["."];

/// Keywords, then functions, then (when `root` is given) the document's own
/// identifiers that are neither.
pub fn completions(root: Option<Node<'_>>, include_document: bool) -> Vec<CompletionItem> {
    let keywords = COMPLETION_KEYWORDS.iter().map(|keyword| CompletionItem {
        label: keyword.to_string(),
        kind: Some(CompletionItemKind::KEYWORD),
        ..Default::default()
    });
    let functions = COMPLETION_FUNCTIONS.iter().map(|function| CompletionItem {
        label: function.to_string(),
        kind: Some(CompletionItemKind::FUNCTION),
        insert_text: Some(format!("{function}(")),
        ..Default::default()
    });
    let mut items: Vec<CompletionItem> = keywords.chain(functions).collect();

    if let Some(root) = root.filter(|_| include_document) {
        items.extend(document_identifiers(root).into_iter().map(|name| CompletionItem {
            label: name.to_string(),
            kind: Some(CompletionItemKind::VARIABLE),
            ..Default::default()
        }));
    }
    items
}

/// Distinct identifier spellings, compared case-insensitively with the first
/// spelling kept, sorted.
pub fn document_identifiers(root: Node<'_>) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for node in root.descendants() {
        if !node.is(NodeKind::Identifier) || node.is_missing() {
            continue;
        }
        let name = node.text();
        if tables::is_completion_keyword(name) || tables::is_completion_function(name) {
            continue;
        }
        if !names.iter().any(|seen| seen.eq_ignore_ascii_case(name)) {
            names.push(name);
        }
    }
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use pickscope_pickbasic::PickBasicParser;
    use pickscope_syntax::Parser;

    fn labels(items: &[CompletionItem], kind: CompletionItemKind) -> Vec<&str> {
        items
            .iter()
            .filter(|item| item.kind == Some(kind))
            .map(|item| item.label.as_str())
            .collect()
    }

    #[test]
    fn fixed_lists_without_a_document() {
        let items = completions(None, true);
        assert_eq!(items.len(), COMPLETION_KEYWORDS.len() + COMPLETION_FUNCTIONS.len());
        assert_eq!(items[0].label, "ABORT");
        let trim = items.iter().find(|item| item.label == "TRIM").unwrap();
        assert_eq!(trim.kind, Some(CompletionItemKind::FUNCTION));
        assert_eq!(trim.insert_text.as_deref(), Some("TRIM("));
    }

    #[test]
    fn document_identifiers_follow_the_fixed_lists() {
        let tree = PickBasicParser::new()
            .parse("total = 0\nFOR I = 1 TO 3\n  TOTAL = TOTAL + LEN(name)\nNEXT I\n", None)
            .unwrap();
        let items = completions(Some(tree.root_node()), true);
        assert_eq!(
            labels(&items, CompletionItemKind::VARIABLE),
            vec!["I", "name", "total"]
        );
        let last_function = items
            .iter()
            .rposition(|item| item.kind == Some(CompletionItemKind::FUNCTION))
            .unwrap();
        let first_variable = items
            .iter()
            .position(|item| item.kind == Some(CompletionItemKind::VARIABLE))
            .unwrap();
        assert!(last_function < first_variable);
    }

    #[test]
    fn document_identifiers_can_be_disabled() {
        let tree = PickBasicParser::new().parse("X = 1\n", None).unwrap();
        let items = completions(Some(tree.root_node()), false);
        assert!(labels(&items, CompletionItemKind::VARIABLE).is_empty());
    }
}
