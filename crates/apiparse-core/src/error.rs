//! Dispatch error taxonomy.
//!
//! Every adapter failure reaches the dispatcher's caller as one of these
//! variants. Nothing is downgraded to a log line, and no partial text is ever
//! returned alongside an error.

use std::time::Duration;

use thiserror::Error;

/// Coarse classification of a [`DispatchError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnrecognizedModel,
    AuthenticationMissing,
    TransportFailure,
    ResponseDecodeFailure,
    FieldNotFound,
    Cancelled,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnrecognizedModel => "unrecognized_model",
            ErrorKind::AuthenticationMissing => "authentication_missing",
            ErrorKind::TransportFailure => "transport_failure",
            ErrorKind::ResponseDecodeFailure => "response_decode_failure",
            ErrorKind::FieldNotFound => "field_not_found",
            ErrorKind::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("model '{model}' is not in the routing table")]
    UnrecognizedModel { model: String },

    #[error("{provider}: credential {credential} is not set")]
    AuthenticationMissing {
        provider: &'static str,
        credential: &'static str,
    },

    #[error("{provider}: request failed: {reason}")]
    Transport {
        provider: &'static str,
        reason: String,
    },

    #[error("{provider}: HTTP {status}: {body}")]
    HttpStatus {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider}: no response within {after:?}")]
    Timeout {
        provider: &'static str,
        after: Duration,
    },

    #[error("{provider}: request cancelled")]
    Cancelled { provider: &'static str },

    #[error("{provider}: could not decode response: {reason}")]
    ResponseDecode {
        provider: &'static str,
        reason: String,
    },

    #[error("{provider}: no text at '{path}' in response")]
    FieldNotFound {
        provider: &'static str,
        path: &'static str,
    },
}

impl DispatchError {
    pub fn unrecognized_model(model: impl Into<String>) -> Self {
        Self::UnrecognizedModel {
            model: model.into(),
        }
    }

    pub fn authentication_missing(provider: &'static str, credential: &'static str) -> Self {
        Self::AuthenticationMissing {
            provider,
            credential,
        }
    }

    pub fn transport(provider: &'static str, reason: impl Into<String>) -> Self {
        Self::Transport {
            provider,
            reason: reason.into(),
        }
    }

    pub fn http_status(provider: &'static str, status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            provider,
            status,
            body: body.into(),
        }
    }

    pub fn response_decode(provider: &'static str, reason: impl Into<String>) -> Self {
        Self::ResponseDecode {
            provider,
            reason: reason.into(),
        }
    }

    pub fn field_not_found(provider: &'static str, path: &'static str) -> Self {
        Self::FieldNotFound { provider, path }
    }

    /// Classify this error into the dispatch taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::UnrecognizedModel { .. } => ErrorKind::UnrecognizedModel,
            DispatchError::AuthenticationMissing { .. } => ErrorKind::AuthenticationMissing,
            DispatchError::Transport { .. }
            | DispatchError::HttpStatus { .. }
            | DispatchError::Timeout { .. } => ErrorKind::TransportFailure,
            DispatchError::Cancelled { .. } => ErrorKind::Cancelled,
            DispatchError::ResponseDecode { .. } => ErrorKind::ResponseDecodeFailure,
            DispatchError::FieldNotFound { .. } => ErrorKind::FieldNotFound,
        }
    }

    /// Provider the failure came from, if it got that far.
    pub fn provider(&self) -> Option<&'static str> {
        match self {
            DispatchError::UnrecognizedModel { .. } => None,
            DispatchError::AuthenticationMissing { provider, .. }
            | DispatchError::Transport { provider, .. }
            | DispatchError::HttpStatus { provider, .. }
            | DispatchError::Timeout { provider, .. }
            | DispatchError::Cancelled { provider }
            | DispatchError::ResponseDecode { provider, .. }
            | DispatchError::FieldNotFound { provider, .. } => Some(*provider),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_model_message() {
        let err = DispatchError::unrecognized_model("gpt-99");
        assert_eq!(err.to_string(), "model 'gpt-99' is not in the routing table");
        assert_eq!(err.kind(), ErrorKind::UnrecognizedModel);
        assert!(err.provider().is_none());
    }

    #[test]
    fn test_http_status_is_transport_failure() {
        let err = DispatchError::http_status("OpenAI", 401, "invalid key");
        assert_eq!(err.kind(), ErrorKind::TransportFailure);
        assert_eq!(err.provider(), Some("OpenAI"));
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn test_timeout_is_transport_failure() {
        let err = DispatchError::Timeout {
            provider: "Bedrock",
            after: Duration::from_secs(3),
        };
        assert_eq!(err.kind(), ErrorKind::TransportFailure);
    }

    #[test]
    fn test_decode_and_field_are_distinct() {
        let decode = DispatchError::response_decode("Bedrock", "expected value at line 1");
        let field = DispatchError::field_not_found("Bedrock", "generation");
        assert_ne!(decode.kind(), field.kind());
        assert_eq!(field.to_string(), "Bedrock: no text at 'generation' in response");
    }

    #[test]
    fn test_authentication_missing_names_credential() {
        let err = DispatchError::authentication_missing("Workers AI", "CLOUDFLARE_TOKEN");
        assert_eq!(err.kind(), ErrorKind::AuthenticationMissing);
        assert!(err.to_string().contains("CLOUDFLARE_TOKEN"));
    }

    #[test]
    fn test_kind_as_str() {
        assert_eq!(ErrorKind::FieldNotFound.as_str(), "field_not_found");
        assert_eq!(ErrorKind::Cancelled.as_str(), "cancelled");
    }
}
