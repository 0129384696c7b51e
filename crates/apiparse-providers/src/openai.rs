//! OpenAI adapter — `/chat/completions` with fixed sampling parameters.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use apiparse_core::config::{Config, OpenAiSampling};
use apiparse_core::{ChatMessage, DispatchError};

use crate::http::{self, CallOptions};
use crate::registry::{Provider, ResponsePath};

const PROVIDER: &str = Provider::OpenAi.display_name();

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f64,
    max_tokens: u32,
    messages: [ChatMessage; 2],
}

/// Adapter for OpenAI-compatible chat completion endpoints.
pub struct OpenAiAdapter {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    sampling: OpenAiSampling,
    default_timeout: Duration,
}

impl std::fmt::Debug for OpenAiAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiAdapter")
            .field("api_base", &self.api_base)
            .field("sampling", &self.sampling)
            .finish()
    }
}

impl OpenAiAdapter {
    pub fn new(config: &Config, client: reqwest::Client) -> Self {
        OpenAiAdapter {
            client,
            api_base: config.endpoints.openai_base.clone(),
            api_key: config.credentials.openai_api_key.clone(),
            sampling: config.sampling.openai.clone(),
            default_timeout: Duration::from_secs(config.http.timeout_secs),
        }
    }

    fn completions_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/chat/completions", base)
    }

    /// Run one chat completion and return the first choice's content.
    pub async fn send(
        &self,
        model: &str,
        context: &str,
        prompt: &str,
        options: &CallOptions,
    ) -> Result<String, DispatchError> {
        if self.api_key.is_empty() {
            return Err(DispatchError::authentication_missing(PROVIDER, "OPENAI_API_KEY"));
        }

        debug!(
            provider = PROVIDER,
            model = model,
            temperature = self.sampling.temperature,
            max_tokens = self.sampling.max_tokens,
            "Calling LLM"
        );

        let request_body = ChatCompletionRequest {
            model,
            temperature: self.sampling.temperature,
            max_tokens: self.sampling.max_tokens,
            messages: [ChatMessage::system(context), ChatMessage::user(prompt)],
        };

        let request = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request_body);

        let body = http::execute(PROVIDER, request, options, self.default_timeout).await?;
        let value = http::decode(PROVIDER, &body)?;
        http::extract(PROVIDER, &value, ResponsePath::CHOICE_CONTENT)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
