pub mod capabilities;
pub mod completion;
pub mod goto;
pub mod hover;
pub mod semantic;
pub mod symbols;

use dashmap::DashMap;
use pickscope_core::{Config, Session};
use serde_json::Value;
use std::sync::Arc;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

/// Settings section read from `initializationOptions` and
/// `workspace/didChangeConfiguration`.
pub const SETTINGS_SECTION: &str = "pickscope";

pub struct LspServer {
    client: Client,
    pub session: Arc<Session>,
    /// Last version seen per open document.
    versions: DashMap<Url, i32>,
}

impl LspServer {
    pub fn new(client: Client, session: Arc<Session>) -> Self {
        Self {
            client,
            session,
            versions: DashMap::new(),
        }
    }

    async fn publish(
        &self,
        uri: Url,
        version: Option<i32>,
        diagnostics: pickscope_core::Result<Vec<Diagnostic>>,
    ) {
        match diagnostics {
            Ok(diagnostics) => {
                tracing::debug!(%uri, count = diagnostics.len(), "publishing diagnostics");
                self.client
                    .publish_diagnostics(uri, diagnostics, version)
                    .await;
            }
            Err(e) => {
                tracing::error!(%uri, "failed to analyze document: {e}");
                self.client
                    .log_message(MessageType::ERROR, format!("LSP Error: {} ({})", e, uri))
                    .await;
            }
        }
    }

    async fn apply_settings(&self, settings: &Value) {
        if let Err(e) = apply_settings(&self.session, settings) {
            tracing::warn!("ignoring invalid settings: {e}");
            self.client
                .log_message(MessageType::WARNING, format!("Invalid settings: {}", e))
                .await;
        }
    }
}

/// Overlays client settings onto the session's configuration. Settings may
/// be given bare or nested under [`SETTINGS_SECTION`].
pub fn apply_settings(session: &Session, settings: &Value) -> pickscope_core::Result<()> {
    let section = settings.get(SETTINGS_SECTION).unwrap_or(settings);
    session.update_config(|config| config.merge_json(section))
}

/// Applies a versioned change unless an equal or newer version was already
/// seen. The version is recorded only once the change has been applied.
fn apply_change(
    session: &Session,
    versions: &DashMap<Url, i32>,
    uri: &Url,
    version: i32,
    changes: &[TextDocumentContentChangeEvent],
) -> Option<pickscope_core::Result<Vec<Diagnostic>>> {
    let stale = versions
        .get(uri)
        .is_some_and(|seen| *seen.value() > version);
    if stale {
        return None;
    }
    let diagnostics = session.apply_changes(uri, changes);
    if diagnostics.is_ok() {
        versions.insert(uri.clone(), version);
    }
    Some(diagnostics)
}

#[tower_lsp::async_trait]
impl LanguageServer for LspServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        if let Some(options) = &params.initialization_options {
            self.apply_settings(options).await;
        }
        tracing::info!(
            client = ?params.client_info.as_ref().map(|i| &i.name),
            "initialize"
        );

        Ok(InitializeResult {
            server_info: Some(ServerInfo {
                name: "Pickscope".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            capabilities: capabilities::server_capabilities(),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "Pickscope language server ready")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        tracing::info!("shutdown");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        self.client
            .log_message(
                MessageType::LOG,
                format!("LSP Event: did_open uri={} version={}", uri, version),
            )
            .await;

        self.versions.insert(uri.clone(), version);
        let diagnostics = self.session.open(&uri, &params.text_document.text);
        self.publish(uri, Some(version), diagnostics).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        let Some(diagnostics) =
            apply_change(&self.session, &self.versions, &uri, version, &params.content_changes)
        else {
            tracing::debug!(%uri, version, "dropping out-of-order change");
            return;
        };
        self.publish(uri, Some(version), diagnostics).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.client
            .log_message(
                MessageType::LOG,
                format!("LSP Event: did_close uri={}", uri),
            )
            .await;
        self.versions.remove(&uri);
        self.session.close(&uri);
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        self.apply_settings(&params.settings).await;

        let open: Vec<(Url, i32)> = self
            .versions
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        for (uri, version) in open {
            let diagnostics = self.session.diagnostics(&uri);
            self.publish(uri, Some(version), Ok(diagnostics)).await;
        }
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let pos = params.text_document_position_params.position;
        self.client
            .log_message(
                MessageType::LOG,
                format!(
                    "LSP Request: textDocument/hover uri={} pos={}:{}",
                    uri, pos.line, pos.character
                ),
            )
            .await;
        let result = hover::hover(self, params).await;
        match &result {
            Ok(Some(_)) => {
                self.client
                    .log_message(MessageType::LOG, "LSP Response: found hover content")
                    .await
            }
            Ok(None) => {
                self.client
                    .log_message(MessageType::LOG, "LSP Response: no hover content")
                    .await
            }
            Err(e) => {
                self.client
                    .log_message(MessageType::ERROR, format!("LSP Error: {}", e))
                    .await
            }
        }
        result
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let pos = params.text_document_position_params.position;
        self.client
            .log_message(
                MessageType::LOG,
                format!(
                    "LSP Request: textDocument/definition uri={} pos={}:{}",
                    uri, pos.line, pos.character
                ),
            )
            .await;
        let result = goto::definition(self, params).await;
        match &result {
            Ok(Some(_)) => {
                self.client
                    .log_message(MessageType::LOG, "LSP Response: found definition")
                    .await
            }
            Ok(None) => {
                self.client
                    .log_message(MessageType::LOG, "LSP Response: no definition found")
                    .await
            }
            Err(e) => {
                self.client
                    .log_message(MessageType::ERROR, format!("LSP Error: {}", e))
                    .await
            }
        }
        result
    }

    async fn references(&self, params: ReferenceParams) -> Result<Option<Vec<Location>>> {
        let uri = &params.text_document_position.text_document.uri;
        let pos = params.text_document_position.position;
        self.client
            .log_message(
                MessageType::LOG,
                format!(
                    "LSP Request: textDocument/references uri={} pos={}:{}",
                    uri, pos.line, pos.character
                ),
            )
            .await;
        let result = goto::references(self, params).await;
        if let Ok(Some(locs)) = &result {
            self.client
                .log_message(
                    MessageType::LOG,
                    format!("LSP Response: found {} references", locs.len()),
                )
                .await;
        }
        result
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        self.client
            .log_message(
                MessageType::LOG,
                format!(
                    "LSP Request: textDocument/documentSymbol uri={}",
                    params.text_document.uri
                ),
            )
            .await;
        let result = symbols::document_symbol(self, params).await;
        if let Ok(Some(DocumentSymbolResponse::Nested(symbols))) = &result {
            self.client
                .log_message(
                    MessageType::LOG,
                    format!("LSP Response: found {} symbols", symbols.len()),
                )
                .await;
        }
        result
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;
        self.client
            .log_message(
                MessageType::LOG,
                format!("LSP Request: textDocument/completion uri={}", uri),
            )
            .await;
        completion::completion(self, params).await
    }

    async fn semantic_tokens_full(
        &self,
        params: SemanticTokensParams,
    ) -> Result<Option<SemanticTokensResult>> {
        self.client
            .log_message(
                MessageType::LOG,
                format!(
                    "LSP Request: textDocument/semanticTokens/full uri={}",
                    params.text_document.uri
                ),
            )
            .await;
        semantic::semantic_tokens_full(self, params).await
    }
}

pub async fn run_server(config: Config) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let session = Arc::new(Session::new(config));

    let (service, socket) =
        tower_lsp::LspService::new(move |client| LspServer::new(client, session.clone()));
    tower_lsp::Server::new(stdin, stdout, socket)
        .serve(service)
        .await;

    Ok(())
}
