use std::fmt;
use thiserror::Error;

/// Classified failure of `POST /generate-mindmap`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("not logged in")]
    Unauthorized,
    #[error("usage limit reached: {0}")]
    RateLimited(String),
    #[error("mind map generation failed: {0}")]
    Unknown(String),
}

impl GenerateError {
    /// Maps a non-success response onto the taxonomy. 401 wins over the body text.
    pub fn classify(status: u16, body: &str) -> Self {
        if status == 401 {
            return GenerateError::Unauthorized;
        }

        match error_text(body) {
            Some(text) if is_rate_limit_message(&text) => GenerateError::RateLimited(text),
            Some(text) => GenerateError::Unknown(format!("HTTP {status}: {text}")),
            None => GenerateError::Unknown(format!("HTTP {status}")),
        }
    }
}

/// The backend reports usage exhaustion only through its error text.
pub fn is_rate_limit_message(text: &str) -> bool {
    text.to_lowercase().contains("limit")
}

/// Extracts the `error` field from a JSON error body, if there is one.
pub fn error_text(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|e| e.as_str())
        .map(str::to_string)
}

/// Which admin call failed. Admin failures carry nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminOperation {
    ListSessions,
    ListCache,
    Stats,
    TerminateSession,
    ResetUsage,
    ClearCache,
    SetLimit,
}

impl AdminOperation {
    pub fn failure_message(&self) -> &'static str {
        match self {
            AdminOperation::ListSessions => "Failed to fetch sessions",
            AdminOperation::ListCache => "Failed to fetch cache keys",
            AdminOperation::Stats => "Failed to fetch stats",
            AdminOperation::TerminateSession => "Failed to terminate session",
            AdminOperation::ResetUsage => "Failed to reset mind maps",
            AdminOperation::ClearCache => "Failed to clear cache",
            AdminOperation::SetLimit => "Failed to set limit",
        }
    }
}

impl fmt::Display for AdminOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AdminOperation::ListSessions => "list_sessions",
            AdminOperation::ListCache => "list_cached_diagrams",
            AdminOperation::Stats => "admin_stats",
            AdminOperation::TerminateSession => "terminate_session",
            AdminOperation::ResetUsage => "reset_usage",
            AdminOperation::ClearCache => "clear_cache_entry",
            AdminOperation::SetLimit => "set_usage_limit",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{}", .operation.failure_message())]
pub struct AdminError {
    pub operation: AdminOperation,
}

impl AdminError {
    pub fn new(operation: AdminOperation) -> Self {
        Self { operation }
    }
}

/// Failures of the session endpoints (`/user`, `/logout`).
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("not logged in")]
    Unauthenticated,
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid backend URL `{0}`")]
    InvalidUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_401_is_unauthorized_even_with_limit_text() {
        let err = GenerateError::classify(401, r#"{"error": "Limit reached."}"#);
        assert_eq!(err, GenerateError::Unauthorized);
    }

    #[test]
    fn test_limit_text_is_rate_limited() {
        let err = GenerateError::classify(500, r#"{"error": "Limit reached."}"#);
        assert_eq!(err, GenerateError::RateLimited("Limit reached.".into()));

        let err = GenerateError::classify(429, r#"{"error": "Daily LIMIT exceeded"}"#);
        assert!(matches!(err, GenerateError::RateLimited(_)));
    }

    #[test]
    fn test_other_failures_are_unknown() {
        let err = GenerateError::classify(500, r#"{"error": "Gemini exploded"}"#);
        assert!(matches!(err, GenerateError::Unknown(_)));

        let err = GenerateError::classify(502, "<html>Bad gateway</html>");
        assert_eq!(err, GenerateError::Unknown("HTTP 502".into()));
    }

    #[test]
    fn test_admin_error_message_names_the_operation() {
        let err = AdminError::new(AdminOperation::TerminateSession);
        assert_eq!(err.to_string(), "Failed to terminate session");
        assert_eq!(err.operation.to_string(), "terminate_session");
    }
}
