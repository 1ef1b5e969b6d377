use thiserror::Error;

/// Failure reported by a persistence backend. Handlers pass it through untouched.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors from handling an inbound webhook call.
#[derive(Debug, Error)]
pub enum ReceiveError {
    #[error("unable to parse request JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("{0}")]
    UnknownStatus(String),
    #[error("unable to parse date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },
    #[error("unknown action '{0}'")]
    UnknownAction(String),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl ReceiveError {
    pub fn validation(message: impl Into<String>) -> Self {
        ReceiveError::Validation(message.into())
    }

    /// True when the caller sent something we cannot accept (maps to a 4xx).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ReceiveError::Backend(_))
    }

    /// Stable machine-readable code for logs and metrics.
    pub fn code(&self) -> &'static str {
        match self {
            ReceiveError::Parse(_) => "parse_error",
            ReceiveError::Validation(_) => "validation_error",
            ReceiveError::UnknownStatus(_) => "unknown_status",
            ReceiveError::InvalidDate { .. } => "invalid_date",
            ReceiveError::UnknownAction(_) => "unknown_action",
            ReceiveError::Backend(_) => "backend_error",
        }
    }
}

/// Errors from an outbound send that prevent producing any status at all.
///
/// Transport problems are not represented here: they degrade to an errored status.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("failed to encode outbound payload: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to build outbound request: {0}")]
    Request(#[from] http::Error),
}

impl SendError {
    pub fn config(message: impl Into<String>) -> Self {
        SendError::Config(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_backend_errors_are_server_side() {
        assert!(ReceiveError::validation("from is required").is_client_error());
        assert!(ReceiveError::UnknownAction("nope".into()).is_client_error());
        let backend = ReceiveError::from(BackendError::Unavailable("db down".into()));
        assert!(!backend.is_client_error());
        assert_eq!(backend.code(), "backend_error");
        assert_eq!(backend.to_string(), "backend unavailable: db down");
    }

    #[test]
    fn parse_errors_keep_serde_message() {
        let err: ReceiveError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.code(), "parse_error");
        assert!(err.to_string().starts_with("unable to parse request JSON"));
    }
}
