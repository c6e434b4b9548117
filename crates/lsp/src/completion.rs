use crate::LspServer;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;

pub async fn completion(
    server: &LspServer,
    params: CompletionParams,
) -> Result<Option<CompletionResponse>> {
    let uri = params.text_document_position.text_document.uri;
    let items = server.session.completion(&uri);
    Ok(Some(CompletionResponse::List(CompletionList {
        is_incomplete: false,
        items,
    })))
}
