//! Configuration schema.
//!
//! Hierarchy: `Config` → `Credentials`, `EndpointsConfig`, `SamplingConfig`,
//! `HttpConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration, loaded from `~/.apiparse/config.json` + env vars and
/// handed to the dispatcher at construction time.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub credentials: Credentials,
    pub endpoints: EndpointsConfig,
    pub sampling: SamplingConfig,
    pub http: HttpConfig,
}

// ─────────────────────────────────────────────
// Credentials
// ─────────────────────────────────────────────

/// Provider credentials. An empty string means "not set".
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Credentials {
    /// Workers AI bearer token (`CLOUDFLARE_TOKEN`).
    pub cloudflare_token: String,
    /// Workers AI account id, part of the endpoint path (`CLOUDFLARE_ACCOUNT_ID`).
    pub cloudflare_account_id: String,
    /// OpenAI API key (`OPENAI_API_KEY`).
    pub openai_api_key: String,
    /// AWS access key id for Bedrock (`AWS_ACCESS_KEY_ID`).
    pub aws_access_key_id: String,
    /// AWS secret access key for Bedrock (`AWS_SECRET_ACCESS_KEY`).
    pub aws_secret_access_key: String,
    /// Temporary-credential session token (`AWS_SESSION_TOKEN`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws_session_token: Option<String>,
    /// Bedrock region (`AWS_REGION`).
    pub aws_region: String,
}

impl Credentials {
    pub fn has_workers_ai(&self) -> bool {
        !self.cloudflare_token.is_empty() && !self.cloudflare_account_id.is_empty()
    }

    pub fn has_openai(&self) -> bool {
        !self.openai_api_key.is_empty()
    }

    pub fn has_bedrock(&self) -> bool {
        !self.aws_access_key_id.is_empty() && !self.aws_secret_access_key.is_empty()
    }

    /// Bedrock region, falling back to `us-east-1`.
    pub fn region(&self) -> &str {
        if self.aws_region.is_empty() {
            DEFAULT_AWS_REGION
        } else {
            &self.aws_region
        }
    }
}

// Secrets stay out of debug output and logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn mask(s: &str) -> &'static str {
            if s.is_empty() {
                "<unset>"
            } else {
                "<set>"
            }
        }
        f.debug_struct("Credentials")
            .field("cloudflare_token", &mask(&self.cloudflare_token))
            .field("cloudflare_account_id", &self.cloudflare_account_id)
            .field("openai_api_key", &mask(&self.openai_api_key))
            .field("aws_access_key_id", &self.aws_access_key_id)
            .field("aws_secret_access_key", &mask(&self.aws_secret_access_key))
            .field(
                "aws_session_token",
                &self.aws_session_token.as_deref().map(mask),
            )
            .field("aws_region", &self.aws_region)
            .finish()
    }
}

// ─────────────────────────────────────────────
// Endpoints
// ─────────────────────────────────────────────

pub const DEFAULT_WORKERS_AI_BASE: &str = "https://api.cloudflare.com/client/v4";
pub const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_AWS_REGION: &str = "us-east-1";

/// Provider base URLs. Overridable for proxies and tests.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EndpointsConfig {
    pub workers_ai_base: String,
    pub openai_base: String,
    /// Bedrock runtime endpoint. `None` derives it from the region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrock_endpoint: Option<String>,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            workers_ai_base: DEFAULT_WORKERS_AI_BASE.to_string(),
            openai_base: DEFAULT_OPENAI_BASE.to_string(),
            bedrock_endpoint: None,
        }
    }
}

impl EndpointsConfig {
    /// Bedrock runtime endpoint for `region`, unless overridden.
    pub fn bedrock_endpoint_for(&self, region: &str) -> String {
        match &self.bedrock_endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("https://bedrock-runtime.{region}.amazonaws.com"),
        }
    }
}

// ─────────────────────────────────────────────
// Sampling
// ─────────────────────────────────────────────

/// Sampling parameters. The defaults are the fixed policy values the
/// extraction suite was tuned against.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SamplingConfig {
    pub openai: OpenAiSampling,
    pub bedrock: BedrockSampling,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenAiSampling {
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for OpenAiSampling {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_tokens: 256,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BedrockSampling {
    /// Temperature for the prompt-template families.
    pub temperature: f64,
    /// Response cap for the Claude messages payload (which has no temperature).
    pub claude_max_tokens: u32,
    /// `anthropic_version` field of the Claude payload.
    pub anthropic_version: String,
}

impl Default for BedrockSampling {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            claude_max_tokens: 1000,
            anthropic_version: "bedrock-2023-05-31".to_string(),
        }
    }
}

// ─────────────────────────────────────────────
// HTTP
// ─────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpConfig {
    /// Default per-call timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 120 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sampling_policy() {
        let config = Config::default();
        assert_eq!(config.sampling.openai.temperature, 0.1);
        assert_eq!(config.sampling.openai.max_tokens, 256);
        assert_eq!(config.sampling.bedrock.temperature, 0.2);
        assert_eq!(config.sampling.bedrock.claude_max_tokens, 1000);
        assert_eq!(config.http.timeout_secs, 120);
    }

    #[test]
    fn test_bedrock_endpoint_from_region() {
        let endpoints = EndpointsConfig::default();
        assert_eq!(
            endpoints.bedrock_endpoint_for("eu-central-1"),
            "https://bedrock-runtime.eu-central-1.amazonaws.com"
        );
    }

    #[test]
    fn test_bedrock_endpoint_override() {
        let endpoints = EndpointsConfig {
            bedrock_endpoint: Some("http://localhost:4566".into()),
            ..Default::default()
        };
        assert_eq!(endpoints.bedrock_endpoint_for("us-east-1"), "http://localhost:4566");
    }

    #[test]
    fn test_credentials_presence() {
        let mut creds = Credentials::default();
        assert!(!creds.has_workers_ai());
        creds.cloudflare_token = "tok".into();
        assert!(!creds.has_workers_ai());
        creds.cloudflare_account_id = "acct".into();
        assert!(creds.has_workers_ai());
        assert!(!creds.has_bedrock());
        assert_eq!(creds.region(), "us-east-1");
    }

    #[test]
    fn test_debug_masks_secrets() {
        let creds = Credentials {
            openai_api_key: "sk-secret".into(),
            ..Default::default()
        };
        let out = format!("{creds:?}");
        assert!(!out.contains("sk-secret"));
        assert!(out.contains("<set>"));
    }

    #[test]
    fn test_json_uses_camel_case() {
        let raw = serde_json::to_value(Config::default()).unwrap();
        assert!(raw["sampling"]["openai"].get("maxTokens").is_some());
        assert!(raw["endpoints"].get("workersAiBase").is_some());
        assert!(raw["http"].get("timeoutSecs").is_some());
    }
}
