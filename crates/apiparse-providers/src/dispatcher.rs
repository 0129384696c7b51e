//! Model dispatcher — routes one (model, context, prompt) request to the
//! adapter named by the routing table.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use apiparse_core::config::{BedrockSampling, Config};
use apiparse_core::{DispatchError, PromptRequest};

use crate::bedrock::BedrockAdapter;
use crate::http::CallOptions;
use crate::openai::OpenAiAdapter;
use crate::registry::{find_model, Route};
use crate::traits::ModelDispatch;
use crate::workers_ai::WorkersAiAdapter;

/// Owns one HTTP client shared by all three adapters.
#[derive(Debug)]
pub struct Dispatcher {
    workers_ai: WorkersAiAdapter,
    openai: OpenAiAdapter,
    bedrock: BedrockAdapter,
    bedrock_sampling: BedrockSampling,
}

impl Dispatcher {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("apiparse/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });

        Dispatcher {
            workers_ai: WorkersAiAdapter::new(config, client.clone()),
            openai: OpenAiAdapter::new(config, client.clone()),
            bedrock: BedrockAdapter::new(config, client),
            bedrock_sampling: config.sampling.bedrock.clone(),
        }
    }

    /// Dispatch with the configured default timeout and no cancellation.
    pub async fn dispatch(
        &self,
        model: &str,
        context: &str,
        prompt: &str,
    ) -> Result<String, DispatchError> {
        self.dispatch_with(model, context, prompt, &CallOptions::default())
            .await
    }

    /// Dispatch with a per-call timeout and/or cancellation token.
    pub async fn dispatch_with(
        &self,
        model: &str,
        context: &str,
        prompt: &str,
        options: &CallOptions,
    ) -> Result<String, DispatchError> {
        let Some(spec) = find_model(model) else {
            warn!(model = model, "Unrecognized model");
            return Err(DispatchError::unrecognized_model(model));
        };

        let request = PromptRequest::new(context, prompt);
        info!(
            model = model,
            provider = spec.route.provider().display_name(),
            "Dispatching prompt"
        );

        let result = match &spec.route {
            Route::WorkersAi {
                path,
                wrapping,
                normalization,
            } => {
                let messages = wrapping.render(&request);
                self.workers_ai
                    .send(path, &messages, *normalization, options)
                    .await
            }
            Route::OpenAi { model: name } => {
                self.openai
                    .send(name, &request.context, &request.prompt, options)
                    .await
            }
            Route::Bedrock { family } => {
                let body = family.render_body(&request, &self.bedrock_sampling);
                self.bedrock.send(spec.id, &body, options).await
            }
        };

        match &result {
            Ok(text) => debug!(model = model, chars = text.len(), "Dispatch complete"),
            Err(e) => warn!(model = model, kind = e.kind().as_str(), error = %e, "Dispatch failed"),
        }
        result
    }
}

#[async_trait]
impl ModelDispatch for Dispatcher {
    async fn dispatch(
        &self,
        model: &str,
        context: &str,
        prompt: &str,
    ) -> Result<String, DispatchError> {
        Dispatcher::dispatch(self, model, context, prompt).await
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
