//! Call contract for the external completion provider.
//!
//! The engine treats the provider as opaque: implementations are
//! user-supplied and only need to return text that parses against the
//! request's contract, or fail with a message. Transport, authentication,
//! and retry policy all live on the implementation side.

use serde_json::Value;

/// One completion call bound to a structured-output contract.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    /// JSON-Schema-style contract the returned text must conform to.
    pub contract: Value,
    pub temperature: f64,
    pub model: String,
}

/// External completion service.
///
/// `on_token` is advisory streaming: it may be called zero or more times
/// with partial text and is never parsed for control decisions; only the
/// returned string is authoritative.
pub trait CompletionProvider: Send + Sync {
    /// Stable identifier recorded in provenance (e.g. "anthropic").
    fn provider_id(&self) -> &str;

    /// Model used when a request does not name one.
    fn default_model(&self) -> &str;

    fn complete(
        &self,
        request: &CompletionRequest,
        on_token: &mut dyn FnMut(&str),
    ) -> anyhow::Result<String>;
}
