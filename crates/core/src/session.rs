//! The query surface a language server drives.
//!
//! A [`Session`] owns the tree cache and the live configuration. Protocol
//! positions come in as UTF-16 and are converted to byte points before any
//! tree query; node spans go back out as protocol ranges.

use crate::cache::TreeCache;
use crate::completion::completions;
use crate::config::Config;
use crate::declaration::{find_definition, find_label, resolve_declaration};
use crate::diagnostics::collect_diagnostics;
use crate::error::{PickscopeError, Result};
use crate::hover::hover;
use crate::position::{Resolvable, node_at};
use crate::references::{find_references, is_within};
use crate::symbols::document_symbols;
use crate::tokens::{classify, encode};
use crate::util::{apply_content_change, node_range, to_point};
use lsp_types::{
    CompletionItem, Diagnostic, DocumentSymbol, Hover, HoverContents, Location, MarkupContent,
    MarkupKind, Position, SemanticToken, TextDocumentContentChangeEvent, Url,
};
use pickscope_pickbasic::PickBasicParser;
use pickscope_syntax::{Field, Node, NodeKind, Parser, SyntaxTree};
use std::sync::{Arc, RwLock};

pub struct Session {
    cache: TreeCache,
    config: RwLock<Config>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self::with_parser(config, PickBasicParser::new())
    }

    pub fn with_parser(config: Config, parser: impl Parser + 'static) -> Self {
        Self {
            cache: TreeCache::new(parser),
            config: RwLock::new(config),
        }
    }

    pub fn config(&self) -> Config {
        match self.config.read() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update_config(&self, update: impl FnOnce(&mut Config) -> Result<()>) -> Result<()> {
        let mut config = self
            .config
            .write()
            .map_err(|_| PickscopeError::Internal("config lock poisoned".to_string()))?;
        let mut next = config.clone();
        update(&mut next)?;
        *config = next;
        Ok(())
    }

    pub fn tree(&self, uri: &Url) -> Option<Arc<SyntaxTree>> {
        self.cache.get(uri)
    }

    pub fn is_open(&self, uri: &Url) -> bool {
        self.cache.contains(uri)
    }

    /// Parses a newly opened document and returns its diagnostics.
    pub fn open(&self, uri: &Url, text: &str) -> Result<Vec<Diagnostic>> {
        tracing::info!(%uri, "document opened");
        self.reparse(uri, text)
    }

    /// Replaces a document's full text.
    pub fn change(&self, uri: &Url, text: &str) -> Result<Vec<Diagnostic>> {
        self.reparse(uri, text)
    }

    /// Applies content changes in order to the cached text, then reparses.
    pub fn apply_changes(
        &self,
        uri: &Url,
        changes: &[TextDocumentContentChangeEvent],
    ) -> Result<Vec<Diagnostic>> {
        let tree = self
            .cache
            .get(uri)
            .ok_or_else(|| PickscopeError::DocumentNotOpen(uri.to_string()))?;
        let mut text = tree.source().to_string();
        for change in changes {
            apply_content_change(&mut text, change);
        }
        tracing::debug!(%uri, changes = changes.len(), "applied content changes");
        self.reparse(uri, &text)
    }

    /// Drops the document's tree. Returns whether it was open.
    pub fn close(&self, uri: &Url) -> bool {
        tracing::info!(%uri, "document closed");
        self.cache.remove(uri).is_some()
    }

    fn reparse(&self, uri: &Url, text: &str) -> Result<Vec<Diagnostic>> {
        let tree = self.cache.parse(uri, text)?;
        Ok(self.diagnostics_for(&tree))
    }

    fn diagnostics_for(&self, tree: &SyntaxTree) -> Vec<Diagnostic> {
        let config = self.config();
        if !config.diagnostics.enabled {
            return Vec::new();
        }
        collect_diagnostics(tree, &config.diagnostics.source)
    }

    pub fn diagnostics(&self, uri: &Url) -> Vec<Diagnostic> {
        self.cache
            .get(uri)
            .map(|tree| self.diagnostics_for(&tree))
            .unwrap_or_default()
    }

    pub fn definition(&self, uri: &Url, position: Position) -> Option<Location> {
        let tree = self.cache.get(uri)?;
        let root = tree.root_node();
        let node = node_at(root, to_point(&tree, position), Resolvable::AnyLeaf)?;
        let target = find_definition(root, node)?;
        tracing::debug!(%uri, symbol = node.text(), target = %target.kind(), "definition resolved");
        Some(Location::new(uri.clone(), node_range(&tree, target)))
    }

    /// Every occurrence of the name under the cursor, in document order.
    /// Without `include_declaration`, occurrences at the declaring site are
    /// left out.
    pub fn references(
        &self,
        uri: &Url,
        position: Position,
        include_declaration: bool,
    ) -> Vec<Location> {
        let Some(tree) = self.cache.get(uri) else {
            return Vec::new();
        };
        let root = tree.root_node();
        let Some(node) = node_at(root, to_point(&tree, position), Resolvable::Named) else {
            return Vec::new();
        };
        let name = node.text();
        let site = if include_declaration {
            None
        } else {
            declaration_site(root, node)
        };

        find_references(root, name)
            .into_iter()
            .filter(|occurrence| site.is_none_or(|site| !is_within(*occurrence, site)))
            .map(|occurrence| Location::new(uri.clone(), node_range(&tree, occurrence)))
            .collect()
    }

    pub fn hover(&self, uri: &Url, position: Position) -> Option<Hover> {
        let tree = self.cache.get(uri)?;
        let info = hover(tree.root_node(), to_point(&tree, position))?;
        Some(Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value: info.markdown,
            }),
            range: Some(node_range(&tree, info.node)),
        })
    }

    /// Completion does not depend on the cursor; an unopened document still
    /// gets the fixed keyword and function lists.
    pub fn completion(&self, uri: &Url) -> Vec<CompletionItem> {
        let include_document = self.config().completion.document_identifiers;
        let tree = self.cache.get(uri);
        completions(tree.as_ref().map(|t| t.root_node()), include_document)
    }

    pub fn document_symbols(&self, uri: &Url) -> Vec<DocumentSymbol> {
        let Some(tree) = self.cache.get(uri) else {
            return Vec::new();
        };
        document_symbols(tree.root_node())
            .into_iter()
            .map(|symbol| {
                let range = node_range(&tree, symbol.node);
                #[allow(deprecated)]
                DocumentSymbol {
                    name: symbol.name.to_string(),
                    detail: None,
                    kind: symbol.kind,
                    tags: None,
                    deprecated: None,
                    range,
                    selection_range: range,
                    children: None,
                }
            })
            .collect()
    }

    pub fn semantic_tokens(&self, uri: &Url) -> Vec<SemanticToken> {
        self.cache
            .get(uri)
            .map(|tree| encode(&classify(&tree)))
            .unwrap_or_default()
    }
}

/// The part of a declaration that introduces the name: a loop's variable,
/// an assignment's target, or the whole statement for the explicit forms
/// and labels.
fn declaration_site<'t>(root: Node<'t>, node: Node<'t>) -> Option<Node<'t>> {
    let declaration = match node.kind() {
        NodeKind::Identifier => resolve_declaration(root, node.text()),
        _ => find_label(root, node.text()),
    }?;
    let site = match declaration.kind() {
        NodeKind::ForStatement => declaration
            .child_by_field(Field::Variable)
            .or_else(|| declaration.first_child_of_kind(NodeKind::Identifier)),
        NodeKind::AssignmentStatement => declaration.first_child_of_kind(NodeKind::Lvalue),
        _ => None,
    };
    Some(site.unwrap_or(declaration))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsp_types::Range;

    fn uri() -> Url {
        Url::parse("file:///tmp/session.bp").unwrap()
    }

    fn session(source: &str) -> Session {
        let session = Session::new(Config::default());
        session.open(&uri(), source).unwrap();
        session
    }

    fn range(line: u32, start: u32, end: u32) -> Range {
        Range::new(Position::new(line, start), Position::new(line, end))
    }

    #[test]
    fn unopened_documents_answer_empty() {
        let session = Session::new(Config::default());
        let other = uri();
        assert!(session.definition(&other, Position::new(0, 0)).is_none());
        assert!(session.references(&other, Position::new(0, 0), true).is_empty());
        assert!(session.hover(&other, Position::new(0, 0)).is_none());
        assert!(session.document_symbols(&other).is_empty());
        assert!(session.semantic_tokens(&other).is_empty());
        assert!(session.diagnostics(&other).is_empty());
        assert!(!session.completion(&other).is_empty());
    }

    #[test]
    fn applying_changes_to_an_unopened_document_fails() {
        let session = Session::new(Config::default());
        let err = session.apply_changes(&uri(), &[]).unwrap_err();
        assert!(matches!(err, PickscopeError::DocumentNotOpen(_)));
    }

    #[test]
    fn incremental_changes_reparse_the_edited_text() {
        let session = session("X = 1\nGOTO 10\n");
        let change = TextDocumentContentChangeEvent {
            range: Some(range(1, 5, 7)),
            range_length: None,
            text: "20".to_string(),
        };
        let diagnostics = session.apply_changes(&uri(), &[change]).unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(session.tree(&uri()).unwrap().source(), "X = 1\nGOTO 20\n");
    }

    #[test]
    fn close_evicts_the_tree() {
        let session = session("X = 1\n");
        assert!(session.close(&uri()));
        assert!(!session.is_open(&uri()));
        assert!(!session.close(&uri()));
    }

    #[test]
    fn definition_from_branch_keyword_and_target() {
        let session = session("GOSUB DONE\nSTOP\nDONE: RETURN\n");
        let expected = Some(Location::new(uri(), range(2, 0, 5)));
        assert_eq!(session.definition(&uri(), Position::new(0, 8)), expected);
        assert_eq!(session.definition(&uri(), Position::new(0, 1)), expected);
    }

    #[test]
    fn references_can_leave_out_the_declaring_site() {
        let source = "FOR I = 1 TO 3\n  PRINT I\nNEXT I\n";
        let session = session(source);
        let all = session.references(&uri(), Position::new(1, 8), true);
        assert_eq!(all.len(), 3);
        let uses = session.references(&uri(), Position::new(1, 8), false);
        assert_eq!(
            uses.iter().map(|l| l.range).collect::<Vec<_>>(),
            vec![range(1, 8, 9), range(2, 5, 6)]
        );
    }

    #[test]
    fn first_assignment_target_is_the_declaring_site() {
        let session = session("X = 1\nX = X + 1\n");
        let uses = session.references(&uri(), Position::new(1, 0), false);
        assert_eq!(
            uses.iter().map(|l| l.range).collect::<Vec<_>>(),
            vec![range(1, 0, 1), range(1, 4, 5)]
        );
    }

    #[test]
    fn equate_value_is_a_use_not_a_declaration() {
        let session = session("EQU ATTR TO REC\nREC = ''\nPRINT REC\n");
        assert_eq!(
            session.definition(&uri(), Position::new(2, 6)),
            Some(Location::new(uri(), range(1, 0, 8)))
        );
        let uses = session.references(&uri(), Position::new(2, 6), false);
        assert_eq!(
            uses.iter().map(|l| l.range).collect::<Vec<_>>(),
            vec![range(0, 12, 15), range(2, 6, 9)]
        );
    }

    #[test]
    fn deeply_nested_source_is_still_served() {
        let source = format!("X = {}1\nPRINT X\n", "(".repeat(20_000));
        let session = session(&source);
        assert!(!session.diagnostics(&uri()).is_empty());
        assert!(!session.semantic_tokens(&uri()).is_empty());
        assert!(session.hover(&uri(), Position::new(0, 15_000)).is_none());
        assert_eq!(
            session.definition(&uri(), Position::new(1, 6)),
            Some(Location::new(uri(), range(0, 0, 20_005)))
        );
    }

    #[test]
    fn hover_is_markdown_with_the_node_range() {
        let session = session("PRINT X\n");
        let hover = session.hover(&uri(), Position::new(0, 2)).unwrap();
        let HoverContents::Markup(content) = hover.contents else {
            panic!("expected markup");
        };
        assert_eq!(content.kind, MarkupKind::Markdown);
        assert!(content.value.contains("PRINT"));
        assert_eq!(hover.range, Some(range(0, 0, 5)));
    }

    #[test]
    fn disabled_diagnostics_are_empty() {
        let mut config = Config::default();
        config.diagnostics.enabled = false;
        let session = Session::new(config);
        assert!(session.open(&uri(), "FOR I = 1 TO 3\n").unwrap().is_empty());
        session
            .update_config(|config| {
                config.diagnostics.enabled = true;
                Ok(())
            })
            .unwrap();
        assert_eq!(session.diagnostics(&uri()).len(), 1);
    }

    #[test]
    fn failed_config_update_keeps_the_old_config() {
        let session = Session::new(Config::default());
        let result = session.update_config(|config| {
            config.diagnostics.source = "changed".to_string();
            Err(PickscopeError::Internal("rejected".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(session.config().diagnostics.source, "pickbasic");
    }
}
