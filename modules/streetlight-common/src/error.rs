use thiserror::Error;

pub type Result<T> = std::result::Result<T, StreetlightError>;

#[derive(Debug, Error)]
pub enum StreetlightError {
    /// Caught locally before any request is sent (e.g. empty display name).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Request could not be sent or the response never arrived.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx HTTP response, message extracted from the body when possible.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Body was not valid JSON. Carries the raw text so an HTML error page
    /// or empty body is visible instead of silently defaulted.
    #[error("Non-JSON response (status {status}): {body}")]
    Decode { status: u16, body: String },

    /// Registration rejected because the account already exists. Kept
    /// distinct so the UI can offer the login path instead.
    #[error("Account already registered: {0}")]
    AccountExists(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for StreetlightError {
    fn from(err: reqwest::Error) -> Self {
        StreetlightError::Network(err.to_string())
    }
}

/// Pull a human-readable message out of an error response body.
/// The server uses `detail` (FastAPI convention) or `message`; fall back to
/// the raw text, then to a status-coded generic.
pub fn extract_api_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "message"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                return msg.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("Request failed with status {status}")
    } else {
        trimmed.to_string()
    }
}

impl StreetlightError {
    /// Build the error for a non-2xx response, mapping the server's
    /// duplicate-registration rejection to [`StreetlightError::AccountExists`].
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = extract_api_message(status, body);
        if (400..500).contains(&status)
            && message.to_ascii_lowercase().contains("already registered")
        {
            return StreetlightError::AccountExists(message);
        }
        StreetlightError::Api { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_detail_field() {
        assert_eq!(
            extract_api_message(401, r#"{"detail": "Invalid authentication credentials"}"#),
            "Invalid authentication credentials"
        );
    }

    #[test]
    fn extracts_message_field() {
        assert_eq!(
            extract_api_message(500, r#"{"message": "boom"}"#),
            "boom"
        );
    }

    #[test]
    fn falls_back_to_raw_text_then_generic() {
        assert_eq!(
            extract_api_message(502, "<html>Bad Gateway</html>"),
            "<html>Bad Gateway</html>"
        );
        assert_eq!(
            extract_api_message(503, "  "),
            "Request failed with status 503"
        );
    }

    #[test]
    fn duplicate_registration_is_distinguishable() {
        let err = StreetlightError::from_response(400, r#"{"detail": "Email already registered"}"#);
        assert!(matches!(err, StreetlightError::AccountExists(_)));

        let err = StreetlightError::from_response(401, r#"{"detail": "Invalid credentials"}"#);
        assert!(matches!(err, StreetlightError::Api { status: 401, .. }));
    }
}
