use crate::LspServer;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;

pub async fn definition(
    server: &LspServer,
    params: GotoDefinitionParams,
) -> Result<Option<GotoDefinitionResponse>> {
    let uri = params.text_document_position_params.text_document.uri;
    let position = params.text_document_position_params.position;

    Ok(server
        .session
        .definition(&uri, position)
        .map(GotoDefinitionResponse::Scalar))
}

pub async fn references(server: &LspServer, params: ReferenceParams) -> Result<Option<Vec<Location>>> {
    let uri = params.text_document_position.text_document.uri;
    let position = params.text_document_position.position;
    let include_declaration = params.context.include_declaration;

    if !server.session.is_open(&uri) {
        return Ok(None);
    }
    Ok(Some(
        server
            .session
            .references(&uri, position, include_declaration),
    ))
}
