use crate::LspServer;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;

pub async fn semantic_tokens_full(
    server: &LspServer,
    params: SemanticTokensParams,
) -> Result<Option<SemanticTokensResult>> {
    let data = server.session.semantic_tokens(&params.text_document.uri);
    Ok(Some(SemanticTokensResult::Tokens(SemanticTokens {
        result_id: None,
        data,
    })))
}
