//! Workers AI adapter — chat-style models hosted by Cloudflare.
//!
//! `POST {base}/accounts/{account_id}/ai/run/{model_path}` with a bearer
//! token; the reply lives at `result.response`.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use apiparse_core::config::Config;
use apiparse_core::{ChatMessage, DispatchError};

use crate::http::{self, CallOptions};
use crate::registry::{OutputNormalization, Provider, ResponsePath};

const PROVIDER: &str = Provider::WorkersAi.display_name();

#[derive(Serialize)]
struct RunRequest<'a> {
    messages: &'a [ChatMessage],
}

/// Adapter for the Workers AI `ai/run` endpoint.
pub struct WorkersAiAdapter {
    client: reqwest::Client,
    api_base: String,
    token: String,
    account_id: String,
    default_timeout: Duration,
}

impl std::fmt::Debug for WorkersAiAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkersAiAdapter")
            .field("api_base", &self.api_base)
            .field("account_id", &self.account_id)
            .finish()
    }
}

impl WorkersAiAdapter {
    pub fn new(config: &Config, client: reqwest::Client) -> Self {
        WorkersAiAdapter {
            client,
            api_base: config.endpoints.workers_ai_base.clone(),
            token: config.credentials.cloudflare_token.clone(),
            account_id: config.credentials.cloudflare_account_id.clone(),
            default_timeout: Duration::from_secs(config.http.timeout_secs),
        }
    }

    /// Full run URL for a model path. Segments are always joined with `/`.
    fn run_url(&self, model_path: &str) -> String {
        format!(
            "{}/accounts/{}/ai/run/{}",
            self.api_base.trim_end_matches('/'),
            self.account_id.trim_matches('/'),
            model_path.trim_start_matches('/')
        )
    }

    /// Send a message pair to `model_path` and return `result.response`,
    /// normalized as the route requires.
    pub async fn send(
        &self,
        model_path: &str,
        messages: &[ChatMessage],
        normalization: OutputNormalization,
        options: &CallOptions,
    ) -> Result<String, DispatchError> {
        if self.token.is_empty() {
            return Err(DispatchError::authentication_missing(PROVIDER, "CLOUDFLARE_TOKEN"));
        }
        if self.account_id.is_empty() {
            return Err(DispatchError::authentication_missing(
                PROVIDER,
                "CLOUDFLARE_ACCOUNT_ID",
            ));
        }

        let url = self.run_url(model_path);
        debug!(
            provider = PROVIDER,
            model = model_path,
            messages = messages.len(),
            "Calling Workers AI"
        );

        let request = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&RunRequest { messages });

        let body = http::execute(PROVIDER, request, options, self.default_timeout).await?;
        let value = http::decode(PROVIDER, &body)?;
        let text = http::extract(PROVIDER, &value, ResponsePath::RESULT_RESPONSE)?;

        Ok(normalization.apply(text))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
