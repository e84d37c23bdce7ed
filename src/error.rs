use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;

/// JSON body of every error returned on the conversion route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorEnvelope {
    fn bare(error: &'static str) -> Self {
        Self { error, details: None }
    }

    fn with_details(error: &'static str, details: impl Into<String>) -> Self {
        Self {
            error,
            details: Some(details.into()),
        }
    }
}

/// Every way a request can fail, grouped by who has to fix it.
#[derive(Debug, Error)]
pub enum AppError {
    // Caller input.
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("instagram url is required")]
    MissingInstagramUrl,

    // Operator configuration.
    #[error("server misconfiguration: {0}")]
    Misconfigured(#[from] ConfigError),

    // Provider.
    #[error("provider responded with status {status}")]
    Upstream { status: u16, details: String },
    #[error("provider returned a non-JSON response")]
    NonJsonPayload { details: String },
    #[error("provider request timed out after {millis} ms")]
    Timeout { millis: u64 },

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<worker::Error> for AppError {
    fn from(e: worker::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl AppError {
    /// HTTP status sent back to the caller.
    ///
    /// Provider failures keep the provider's status, unless it is not a
    /// status a response can carry.
    pub fn status(&self) -> u16 {
        match self {
            AppError::MethodNotAllowed => 405,
            AppError::MissingInstagramUrl => 400,
            AppError::Misconfigured(_) => 500,
            AppError::Upstream { status, .. } if (200..=599).contains(status) => *status,
            AppError::Upstream { .. } => 502,
            AppError::NonJsonPayload { .. } => 502,
            AppError::Timeout { .. } => 504,
            AppError::Internal(_) => 500,
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        match self {
            AppError::MethodNotAllowed => ErrorEnvelope::bare("Method Not Allowed"),
            AppError::MissingInstagramUrl => ErrorEnvelope::bare("Instagram URL is required"),
            AppError::Misconfigured(e) => {
                ErrorEnvelope::with_details("Server misconfiguration", e.to_string())
            }
            AppError::Upstream { details, .. } => {
                ErrorEnvelope::with_details("Failed to fetch data from provider", details.as_str())
            }
            AppError::NonJsonPayload { details } => {
                ErrorEnvelope::with_details("Provider returned a non-JSON response", details.as_str())
            }
            AppError::Timeout { millis } => ErrorEnvelope::with_details(
                "Provider request timed out",
                format!("no response within {millis} ms"),
            ),
            AppError::Internal(message) => {
                ErrorEnvelope::with_details("An internal error occurred", message.as_str())
            }
        }
    }

    /// Serialized [`ErrorEnvelope`].
    pub fn to_json(&self) -> worker::Result<String> {
        serde_json::to_string(&self.envelope())
            .map_err(|e| worker::Error::RustError(format!("JSON serialization error: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- status codes ---

    #[test]
    fn caller_errors_are_4xx() {
        assert_eq!(AppError::MethodNotAllowed.status(), 405);
        assert_eq!(AppError::MissingInstagramUrl.status(), 400);
    }

    #[test]
    fn misconfiguration_is_500() {
        assert_eq!(AppError::from(ConfigError::MissingApiKey).status(), 500);
    }

    #[test]
    fn upstream_status_is_propagated() {
        let err = AppError::Upstream {
            status: 403,
            details: "forbidden".to_string(),
        };
        assert_eq!(err.status(), 403);

        let err = AppError::Upstream {
            status: 429,
            details: String::new(),
        };
        assert_eq!(err.status(), 429);
    }

    #[test]
    fn unrepresentable_upstream_status_becomes_502() {
        let err = AppError::Upstream {
            status: 999,
            details: String::new(),
        };
        assert_eq!(err.status(), 502);
    }

    #[test]
    fn gateway_failures() {
        let non_json = AppError::NonJsonPayload {
            details: "<html>".to_string(),
        };
        assert_eq!(non_json.status(), 502);
        assert_eq!(AppError::Timeout { millis: 10 }.status(), 504);
        assert_eq!(AppError::Internal("boom".to_string()).status(), 500);
    }

    // --- envelopes ---

    #[test]
    fn method_not_allowed_envelope() {
        assert_eq!(
            AppError::MethodNotAllowed.to_json().unwrap(),
            r#"{"error":"Method Not Allowed"}"#
        );
    }

    #[test]
    fn missing_url_envelope() {
        assert_eq!(
            AppError::MissingInstagramUrl.to_json().unwrap(),
            r#"{"error":"Instagram URL is required"}"#
        );
    }

    #[test]
    fn misconfiguration_names_the_secret() {
        let envelope = AppError::from(ConfigError::MissingApiKey).envelope();
        assert_eq!(envelope.error, "Server misconfiguration");
        assert_eq!(envelope.details.as_deref(), Some("INSTA_API_KEY is not set"));
    }

    #[test]
    fn upstream_envelope_carries_raw_text() {
        let err = AppError::Upstream {
            status: 403,
            details: "forbidden".to_string(),
        };
        let value: serde_json::Value = serde_json::from_str(&err.to_json().unwrap()).unwrap();
        assert_eq!(value["details"], "forbidden");
        assert_eq!(value["error"], "Failed to fetch data from provider");
    }

    #[test]
    fn non_json_envelope_carries_raw_text() {
        let err = AppError::NonJsonPayload {
            details: "<html>not json</html>".to_string(),
        };
        let value: serde_json::Value = serde_json::from_str(&err.to_json().unwrap()).unwrap();
        assert_eq!(value["details"], "<html>not json</html>");
    }

    #[test]
    fn timeout_envelope_mentions_limit() {
        let envelope = AppError::Timeout { millis: 2500 }.envelope();
        assert_eq!(envelope.details.as_deref(), Some("no response within 2500 ms"));
    }

    #[test]
    fn internal_envelope_carries_message() {
        let envelope = AppError::Internal("socket closed".to_string()).envelope();
        assert_eq!(envelope.error, "An internal error occurred");
        assert_eq!(envelope.details.as_deref(), Some("socket closed"));
    }
}
