use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use typfmt_core::{Config, FormatError, Formatter};
use typfmt_syntax::SyntaxError;

/// Shared server state.
struct ServerState {
    /// Open document texts (in-memory, may be unsaved).
    docs: HashMap<Url, String>,
    /// Options sent by the client in `initialize`.
    config: Config,
    /// Reported once the client is ready to receive log messages.
    config_warning: Option<String>,
}

pub struct TypfmtLanguageServer {
    client: Client,
    state: Arc<RwLock<ServerState>>,
}

impl TypfmtLanguageServer {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            state: Arc::new(RwLock::new(ServerState {
                docs: HashMap::new(),
                config: Config::default(),
                config_warning: None,
            })),
        }
    }

    /// Parse a document and publish its syntax errors.
    async fn publish(&self, uri: Url, text: &str, version: Option<i32>) {
        let errors = typfmt_syntax::parse(text).errors();
        let diags = errors.iter().map(|err| to_diagnostic(text, err)).collect();
        self.client.publish_diagnostics(uri, diags, version).await;
    }
}

/// Read `initializationOptions` into a [`Config`]. Missing options mean defaults.
fn config_from_options(options: Option<Value>) -> std::result::Result<Config, FormatError> {
    match options {
        None | Some(Value::Null) => Ok(Config::default()),
        Some(value) => Ok(serde_json::from_value(value)?),
    }
}

fn to_diagnostic(text: &str, err: &SyntaxError) -> Diagnostic {
    Diagnostic {
        range: byte_span_to_range(text, &err.span),
        severity: Some(DiagnosticSeverity::ERROR),
        source: Some("typfmt".into()),
        message: err.message.clone(),
        ..Default::default()
    }
}

/// A single edit replacing the whole document, or `None` when there is
/// nothing to do.
fn formatting_edits(text: &str, config: Config) -> Option<Vec<TextEdit>> {
    let formatted = Formatter::new(config).format_source(text).ok()?;
    if formatted == text {
        return None;
    }
    let range = Range {
        start: Position::new(0, 0),
        end: byte_offset_to_position(text, text.len()),
    };
    Some(vec![TextEdit::new(range, formatted)])
}

fn byte_span_to_range(text: &str, span: &std::ops::Range<usize>) -> Range {
    let start = byte_offset_to_position(text, span.start);
    let end = byte_offset_to_position(text, span.end);
    Range { start, end }
}

/// LSP positions count UTF-16 code units within a line.
fn byte_offset_to_position(text: &str, offset: usize) -> Position {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    let prefix = &text[..offset];
    let line = prefix.matches('\n').count() as u32;
    let line_start = prefix.rfind('\n').map_or(0, |i| i + 1);
    let character = prefix[line_start..].encode_utf16().count() as u32;
    Position { line, character }
}

#[tower_lsp::async_trait]
impl LanguageServer for TypfmtLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        {
            let mut state = self.state.write().await;
            match config_from_options(params.initialization_options) {
                Ok(config) => state.config = config,
                Err(e) => state.config_warning = Some(format!("{e}, using defaults")),
            }
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                document_formatting_provider: Some(OneOf::Left(true)),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "typfmt-lsp".into(),
                version: Some(env!("CARGO_PKG_VERSION").into()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "typfmt LSP initialized")
            .await;

        let warning = self.state.write().await.config_warning.take();
        if let Some(warning) = warning {
            self.client.log_message(MessageType::WARNING, warning).await;
        }
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        {
            let mut state = self.state.write().await;
            state.docs.insert(doc.uri.clone(), doc.text.clone());
        }
        self.publish(doc.uri, &doc.text, Some(doc.version)).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        if let Some(change) = params.content_changes.into_iter().last() {
            {
                let mut state = self.state.write().await;
                state.docs.insert(uri.clone(), change.text.clone());
            }
            self.publish(uri, &change.text, Some(version)).await;
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;
        let text = match params.text {
            Some(text) => Some(text),
            None => self.state.read().await.docs.get(&uri).cloned(),
        };
        if let Some(text) = text {
            self.publish(uri, &text, None).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        {
            let mut state = self.state.write().await;
            state.docs.remove(&uri);
        }
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn formatting(&self, params: DocumentFormattingParams) -> Result<Option<Vec<TextEdit>>> {
        let state = self.state.read().await;
        let Some(text) = state.docs.get(&params.text_document.uri) else {
            return Ok(None);
        };
        let config = state
            .config
            .clone()
            .with_tab_spaces(params.options.tab_size as usize);
        Ok(formatting_edits(text, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_count_lines() {
        let text = "ab\ncd\n";
        assert_eq!(byte_offset_to_position(text, 0), Position::new(0, 0));
        assert_eq!(byte_offset_to_position(text, 4), Position::new(1, 1));
        assert_eq!(byte_offset_to_position(text, 6), Position::new(2, 0));
    }

    #[test]
    fn positions_use_utf16_units() {
        // 'ä' is one UTF-16 unit, the emoji is a surrogate pair.
        let text = "ä😀x";
        assert_eq!(byte_offset_to_position(text, 6), Position::new(0, 3));
        assert_eq!(byte_offset_to_position(text, text.len()), Position::new(0, 4));
    }

    #[test]
    fn positions_clamp_to_text() {
        assert_eq!(byte_offset_to_position("ab", 10), Position::new(0, 2));
        // Inside a multi-byte character.
        assert_eq!(byte_offset_to_position("äb", 1), Position::new(0, 0));
    }

    #[test]
    fn syntax_errors_become_diagnostics() {
        let text = "#f(a, b\n";
        let errors = typfmt_syntax::parse(text).errors();
        assert!(!errors.is_empty());
        let diag = to_diagnostic(text, &errors[0]);
        assert_eq!(diag.severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(diag.source.as_deref(), Some("typfmt"));
        assert!(diag.message.starts_with("unclosed delimiter"));
    }

    #[test]
    fn formatting_replaces_whole_document() {
        let text = "#let a = (1,2)\n#f(x,y)";
        let edits = formatting_edits(text, Config::default()).unwrap();
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].range.start, Position::new(0, 0));
        assert_eq!(edits[0].range.end, Position::new(1, 7));
        assert_eq!(edits[0].new_text, "#let a = (1, 2)\n#f(x, y)\n");
    }

    #[test]
    fn formatting_skips_clean_documents() {
        assert!(formatting_edits("#let a = (1, 2)\n", Config::default()).is_none());
    }

    #[test]
    fn formatting_skips_broken_documents() {
        assert!(formatting_edits("#f(a, b\n", Config::default()).is_none());
    }

    #[test]
    fn tab_size_changes_indentation() {
        let config = Config::default().with_tab_spaces(4);
        let edits = formatting_edits("#{\n  x\n}\n", config).unwrap();
        assert_eq!(edits[0].new_text, "#{\n    x\n}\n");
    }

    #[test]
    fn options_map_to_config() {
        let config = config_from_options(Some(serde_json::json!({ "max_width": 80 }))).unwrap();
        assert_eq!(config.max_width, 80);
        assert_eq!(config.tab_spaces, Config::default().tab_spaces);

        assert_eq!(config_from_options(None).unwrap(), Config::default());
        assert_eq!(config_from_options(Some(Value::Null)).unwrap(), Config::default());
    }

    #[test]
    fn invalid_options_are_rejected() {
        let err = config_from_options(Some(serde_json::json!({ "max_width": "wide" }))).unwrap_err();
        assert!(err.to_string().starts_with("invalid configuration"));
    }
}
