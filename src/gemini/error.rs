use thiserror::Error;

/// Substring the remote side uses when the supplied API key does not map to
/// a usable entity. Seeing it means the key is invalid or expired.
const ENTITY_NOT_FOUND: &str = "Requested entity was not found";

/// Errors from the Gemini clients
#[derive(Debug, Clone, Error)]
pub enum GeminiError {
    /// No credential available; raised before any network attempt
    #[error("API key is not available. Please select one.")]
    MissingKey,

    /// The remote side rejected the credential
    #[error("API key is invalid or expired: {0}")]
    InvalidKey(String),

    /// The remote model or API reported an error
    #[error("{0}")]
    Api(String),

    /// The request never produced a usable response
    #[error("Request failed: {0}")]
    Transport(String),
}

/// Wrap a remote error message, promoting the invalid-credential case
pub(crate) fn classify_api_error(message: String) -> GeminiError {
    if message.contains(ENTITY_NOT_FOUND) {
        GeminiError::InvalidKey(message)
    } else {
        GeminiError::Api(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_not_found_is_classified_as_invalid_key() {
        let err = classify_api_error("Requested entity was not found.".to_string());
        assert!(matches!(err, GeminiError::InvalidKey(_)));
    }

    #[test]
    fn other_messages_stay_generic() {
        let err = classify_api_error("model overloaded".to_string());
        assert!(matches!(err, GeminiError::Api(_)));
    }
}
