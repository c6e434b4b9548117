use crate::error::{PickscopeError, Result};
use dashmap::DashMap;
use lsp_types::Url;
use pickscope_syntax::{Parser, SyntaxTree};
use std::sync::{Arc, Mutex};

/// One parse tree per open document.
///
/// Entries are only ever replaced whole. A reparse hands the previous tree
/// to the parser as a reuse hint and then drops it.
pub struct TreeCache {
    trees: DashMap<Url, Arc<SyntaxTree>>,
    parser: Mutex<Box<dyn Parser>>,
}

impl TreeCache {
    pub fn new(parser: impl Parser + 'static) -> Self {
        Self {
            trees: DashMap::new(),
            parser: Mutex::new(Box::new(parser)),
        }
    }

    /// Parses `source` for `uri`, replacing any previous tree.
    pub fn parse(&self, uri: &Url, source: &str) -> Result<Arc<SyntaxTree>> {
        let previous = self.get(uri);
        let tree = {
            let mut parser = self
                .parser
                .lock()
                .map_err(|_| PickscopeError::Internal("parser lock poisoned".to_string()))?;
            parser.parse(source, previous.as_deref())?
        };
        let tree = Arc::new(tree);
        self.trees.insert(uri.clone(), tree.clone());
        tracing::debug!(%uri, nodes = tree.len(), reused_hint = previous.is_some(), "tree cached");
        Ok(tree)
    }

    pub fn get(&self, uri: &Url) -> Option<Arc<SyntaxTree>> {
        self.trees.get(uri).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, uri: &Url) -> Option<Arc<SyntaxTree>> {
        self.trees.remove(uri).map(|(_, tree)| tree)
    }

    pub fn contains(&self, uri: &Url) -> bool {
        self.trees.contains_key(uri)
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pickscope_pickbasic::PickBasicParser;
    use pickscope_syntax::ParseError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn uri(name: &str) -> Url {
        Url::parse(&format!("file:///tmp/{name}.bp")).unwrap()
    }

    /// Records whether a previous tree was offered on each call.
    struct HintRecorder {
        hinted: Arc<AtomicUsize>,
    }

    impl Parser for HintRecorder {
        fn parse(
            &mut self,
            source: &str,
            previous: Option<&SyntaxTree>,
        ) -> std::result::Result<SyntaxTree, ParseError> {
            if previous.is_some() {
                self.hinted.fetch_add(1, Ordering::SeqCst);
            }
            PickBasicParser::new().parse(source, None)
        }
    }

    struct Failing;

    impl Parser for Failing {
        fn parse(
            &mut self,
            _: &str,
            _: Option<&SyntaxTree>,
        ) -> std::result::Result<SyntaxTree, ParseError> {
            Err(ParseError::NoTree)
        }
    }

    #[test]
    fn parse_replaces_and_remove_evicts() {
        let cache = TreeCache::new(PickBasicParser::new());
        let doc = uri("a");
        cache.parse(&doc, "X = 1\n").unwrap();
        cache.parse(&doc, "X = 2\n").unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&doc).unwrap().source(), "X = 2\n");

        assert!(cache.remove(&doc).is_some());
        assert!(cache.get(&doc).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn previous_tree_is_offered_as_hint() {
        let hinted = Arc::new(AtomicUsize::new(0));
        let cache = TreeCache::new(HintRecorder {
            hinted: hinted.clone(),
        });
        let doc = uri("b");
        cache.parse(&doc, "X = 1\n").unwrap();
        assert_eq!(hinted.load(Ordering::SeqCst), 0);
        cache.parse(&doc, "X = 12\n").unwrap();
        assert_eq!(hinted.load(Ordering::SeqCst), 1);

        cache.parse(&uri("other"), "Y = 1\n").unwrap();
        assert_eq!(hinted.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn documents_are_independent() {
        let cache = TreeCache::new(PickBasicParser::new());
        cache.parse(&uri("a"), "A = 1\n").unwrap();
        cache.parse(&uri("b"), "B = 1\n").unwrap();
        cache.remove(&uri("a"));
        assert!(cache.contains(&uri("b")));
        assert!(!cache.contains(&uri("a")));
    }

    #[test]
    fn parser_failure_is_reported_and_nothing_cached() {
        let cache = TreeCache::new(Failing);
        let err = cache.parse(&uri("c"), "X = 1\n").unwrap_err();
        assert!(matches!(err, PickscopeError::Parsing(_)));
        assert!(cache.get(&uri("c")).is_none());
    }
}
