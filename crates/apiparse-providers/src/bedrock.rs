//! Bedrock adapter — `InvokeModel` on the Bedrock runtime, SigV4-signed.
//!
//! The caller supplies the serialized body; the adapter picks the response
//! path from the routing table by model id.

use std::time::Duration;

use chrono::Utc;
use reqwest::Url;
use tracing::debug;

use apiparse_core::config::Config;
use apiparse_core::DispatchError;

use crate::http::{self, CallOptions};
use crate::registry::{bedrock_family, Provider};
use crate::sigv4::{self, SignableRequest, SigningParams};

const PROVIDER: &str = Provider::Bedrock.display_name();
const SERVICE: &str = "bedrock";

/// Adapter for `POST /model/{modelId}/invoke`.
pub struct BedrockAdapter {
    client: reqwest::Client,
    endpoint: String,
    region: String,
    access_key: String,
    secret_key: String,
    session_token: Option<String>,
    default_timeout: Duration,
}

impl std::fmt::Debug for BedrockAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BedrockAdapter")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .finish()
    }
}

impl BedrockAdapter {
    pub fn new(config: &Config, client: reqwest::Client) -> Self {
        let region = config.credentials.region().to_string();
        BedrockAdapter {
            client,
            endpoint: config.endpoints.bedrock_endpoint_for(&region),
            region,
            access_key: config.credentials.aws_access_key_id.clone(),
            secret_key: config.credentials.aws_secret_access_key.clone(),
            session_token: config
                .credentials
                .aws_session_token
                .clone()
                .filter(|t| !t.is_empty()),
            default_timeout: Duration::from_secs(config.http.timeout_secs),
        }
    }

    /// Invoke URL with the model id percent-encoded as one path segment.
    fn invoke_url(&self, model_id: &str) -> Result<Url, DispatchError> {
        let raw = format!(
            "{}/model/{}/invoke",
            self.endpoint.trim_end_matches('/'),
            sigv4::uri_encode(model_id, true)
        );
        Url::parse(&raw)
            .map_err(|e| DispatchError::transport(PROVIDER, format!("invalid endpoint '{raw}': {e}")))
    }

    /// Invoke `model_id` with a pre-rendered JSON `body` and return the text
    /// at the model family's response path.
    pub async fn send(
        &self,
        model_id: &str,
        body: &str,
        options: &CallOptions,
    ) -> Result<String, DispatchError> {
        let family =
            bedrock_family(model_id).ok_or_else(|| DispatchError::unrecognized_model(model_id))?;

        if self.access_key.is_empty() {
            return Err(DispatchError::authentication_missing(PROVIDER, "AWS_ACCESS_KEY_ID"));
        }
        if self.secret_key.is_empty() {
            return Err(DispatchError::authentication_missing(
                PROVIDER,
                "AWS_SECRET_ACCESS_KEY",
            ));
        }

        let url = self.invoke_url(model_id)?;
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(DispatchError::transport(
                    PROVIDER,
                    format!("endpoint has no host: {url}"),
                ))
            }
        };

        let signed = sigv4::sign(
            &SignableRequest {
                method: "POST",
                host: &host,
                path: url.path(),
                headers: &[("content-type", "application/json")],
                body: body.as_bytes(),
            },
            &SigningParams {
                access_key: &self.access_key,
                secret_key: &self.secret_key,
                session_token: self.session_token.as_deref(),
                region: &self.region,
                service: SERVICE,
                time: Utc::now(),
            },
        );

        debug!(
            provider = PROVIDER,
            model = model_id,
            family = ?family,
            region = %self.region,
            "Invoking Bedrock model"
        );

        let mut request = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .header("accept", "application/json")
            .body(body.to_string());
        for (name, value) in signed {
            request = request.header(name, value);
        }

        let text = http::execute(PROVIDER, request, options, self.default_timeout).await?;
        let value = http::decode(PROVIDER, &text)?;
        http::extract(PROVIDER, &value, family.response_path())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
