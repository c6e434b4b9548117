use crate::LspServer;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;

pub async fn document_symbol(
    server: &LspServer,
    params: DocumentSymbolParams,
) -> Result<Option<DocumentSymbolResponse>> {
    let uri = params.text_document.uri;
    if !server.session.is_open(&uri) {
        return Ok(None);
    }
    let symbols = server.session.document_symbols(&uri);
    Ok(Some(DocumentSymbolResponse::Nested(symbols)))
}
