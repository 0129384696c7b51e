//! One HTTP round-trip with per-call timeout and cancellation, plus JSON
//! decoding and reply extraction shared by every adapter.

use std::time::Duration;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use apiparse_core::utils::truncate_string;
use apiparse_core::DispatchError;

use crate::registry::ResponsePath;

/// Per-call controls. Fields left as `None` use the dispatcher's defaults.
#[derive(Clone, Debug, Default)]
pub struct CallOptions {
    /// Upper bound on the whole round-trip, body included.
    pub timeout: Option<Duration>,
    /// Aborts the in-flight request when cancelled.
    pub cancel: Option<CancellationToken>,
}

impl CallOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Send `request`, wait for the full body, and fail on non-2xx statuses.
pub(crate) async fn execute(
    provider: &'static str,
    request: reqwest::RequestBuilder,
    options: &CallOptions,
    default_timeout: Duration,
) -> Result<String, DispatchError> {
    let after = options.timeout.unwrap_or(default_timeout);

    let round_trip = async {
        let response = request.send().await.map_err(|e| {
            error!(provider = provider, error = %e, "HTTP request failed");
            DispatchError::transport(provider, e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DispatchError::transport(provider, format!("reading body: {e}")))?;

        if !status.is_success() {
            error!(
                provider = provider,
                status = %status,
                body = %truncate_string(&body, 200),
                "API error"
            );
            return Err(DispatchError::http_status(provider, status.as_u16(), body));
        }

        Ok::<String, DispatchError>(body)
    };

    let timed = async {
        tokio::time::timeout(after, round_trip)
            .await
            .map_err(|_| DispatchError::Timeout { provider, after })?
    };

    match &options.cancel {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(provider = provider, "request cancelled by caller");
                    Err(DispatchError::Cancelled { provider })
                }
                result = timed => result,
            }
        }
        None => timed.await,
    }
}

/// Parse a response body as JSON.
pub(crate) fn decode(provider: &'static str, body: &str) -> Result<Value, DispatchError> {
    serde_json::from_str(body).map_err(|e| {
        error!(provider = provider, error = %e, "Failed to parse response JSON");
        DispatchError::response_decode(provider, e.to_string())
    })
}

/// Pull the reply text out of a decoded response.
pub(crate) fn extract(
    provider: &'static str,
    value: &Value,
    path: ResponsePath,
) -> Result<String, DispatchError> {
    path.extract(value)
        .map(str::to_string)
        .ok_or_else(|| DispatchError::field_not_found(provider, path.display))
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiparse_core::ErrorKind;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_decode_invalid_json() {
        let err = decode("Bedrock", "<html>gateway</html>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResponseDecodeFailure);
    }

    #[test]
    fn test_extract_missing_field() {
        let err = extract("Bedrock", &json!({"other": 1}), ResponsePath::GENERATION).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::FieldNotFound { provider: "Bedrock", path: "generation" }
        ));
    }

    #[tokio::test]
    async fn test_execute_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_string("fine"))
            .mount(&server)
            .await;

        let request = reqwest::Client::new().get(format!("{}/ok", server.uri()));
        let body = execute("Test", request, &CallOptions::default(), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(body, "fine");
    }

    #[tokio::test]
    async fn test_execute_non_2xx() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let request = reqwest::Client::new().get(server.uri());
        let err = execute("Test", request, &CallOptions::default(), Duration::from_secs(5))
            .await
            .unwrap_err();
        match err {
            DispatchError::HttpStatus { status, body, .. } => {
                assert_eq!(status, 503);
                assert_eq!(body, "overloaded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_execute_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let request = reqwest::Client::new().get(server.uri());
        let options = CallOptions::default().with_timeout(Duration::from_millis(50));
        let err = execute("Test", request, &options, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Timeout { .. }));
        assert_eq!(err.kind(), ErrorKind::TransportFailure);
    }

    #[tokio::test]
    async fn test_execute_cancelled_before_send() {
        let token = CancellationToken::new();
        token.cancel();

        // Nothing listens here; cancellation must win before any connect attempt matters.
        let request = reqwest::Client::new().get("http://127.0.0.1:1/");
        let options = CallOptions::default().with_cancellation(token);
        let err = execute("Test", request, &options, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[tokio::test]
    async fn test_execute_network_error() {
        let request = reqwest::Client::new().get("http://127.0.0.1:1/");
        let err = execute("Test", request, &CallOptions::default(), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Transport { .. }));
    }
}
