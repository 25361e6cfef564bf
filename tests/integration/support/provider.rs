use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::bail;
use personabase::generation::{CompletionProvider, CompletionRequest};

/// Deterministic in-memory provider returning scripted responses in order.
///
/// Each call records the full request so tests can assert on composed
/// prompts and contracts. An exhausted script fails the call, which doubles
/// as a mid-run provider failure.
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<CompletionRequest>>,
    stream_tokens: bool,
}

impl ScriptedProvider {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            calls: Mutex::new(Vec::new()),
            stream_tokens: false,
        }
    }

    pub fn streaming<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut provider = Self::new(responses);
        provider.stream_tokens = true;
        provider
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }
}

impl CompletionProvider for ScriptedProvider {
    fn provider_id(&self) -> &str {
        "scripted"
    }

    fn default_model(&self) -> &str {
        "scripted-v1"
    }

    fn complete(
        &self,
        request: &CompletionRequest,
        on_token: &mut dyn FnMut(&str),
    ) -> anyhow::Result<String> {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push(request.clone());
        let next = self
            .responses
            .lock()
            .expect("responses lock poisoned")
            .pop_front();
        match next {
            Some(response) => {
                if self.stream_tokens {
                    let midpoint = response.len() / 2;
                    let (head, tail) = response.split_at(midpoint);
                    on_token(head);
                    on_token(tail);
                }
                Ok(response)
            }
            None => bail!("scripted provider has no responses left"),
        }
    }
}

/// Provider that always fails with a fixed message.
pub struct FailingProvider {
    message: String,
}

impl FailingProvider {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl CompletionProvider for FailingProvider {
    fn provider_id(&self) -> &str {
        "failing"
    }

    fn default_model(&self) -> &str {
        "failing-v1"
    }

    fn complete(
        &self,
        _request: &CompletionRequest,
        _on_token: &mut dyn FnMut(&str),
    ) -> anyhow::Result<String> {
        bail!("{}", self.message)
    }
}
