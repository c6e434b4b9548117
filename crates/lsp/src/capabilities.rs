use pickscope_core::completion::TRIGGER_CHARACTERS;
use pickscope_core::tokens;
use tower_lsp::lsp_types::*;

pub fn server_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Kind(
            TextDocumentSyncKind::INCREMENTAL,
        )),
        hover_provider: Some(HoverProviderCapability::Simple(true)),
        definition_provider: Some(OneOf::Left(true)),
        references_provider: Some(OneOf::Left(true)),
        document_symbol_provider: Some(OneOf::Left(true)),
        completion_provider: Some(CompletionOptions {
            trigger_characters: Some(TRIGGER_CHARACTERS.iter().map(|c| c.to_string()).collect()),
            ..Default::default()
        }),
        semantic_tokens_provider: Some(SemanticTokensServerCapabilities::SemanticTokensOptions(
            SemanticTokensOptions {
                legend: tokens::legend(),
                full: Some(SemanticTokensFullOptions::Bool(true)),
                range: None,
                ..Default::default()
            },
        )),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advertises_incremental_sync_and_queries() {
        let caps = server_capabilities();
        assert_eq!(
            caps.text_document_sync,
            Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::INCREMENTAL))
        );
        assert!(caps.hover_provider.is_some());
        assert!(caps.definition_provider.is_some());
        assert!(caps.references_provider.is_some());
        assert!(caps.document_symbol_provider.is_some());
    }

    #[test]
    fn completion_triggers_on_dot() {
        let caps = server_capabilities();
        let completion = caps.completion_provider.unwrap();
        assert_eq!(completion.trigger_characters, Some(vec![".".to_string()]));
    }

    #[test]
    fn semantic_tokens_carry_the_legend() {
        let caps = server_capabilities();
        let Some(SemanticTokensServerCapabilities::SemanticTokensOptions(options)) =
            caps.semantic_tokens_provider
        else {
            panic!("semantic tokens not advertised");
        };
        assert_eq!(options.legend.token_types.len(), 8);
        assert_eq!(options.legend.token_modifiers.len(), 2);
        assert_eq!(options.full, Some(SemanticTokensFullOptions::Bool(true)));
    }
}
