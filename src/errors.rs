/*!
 * Error types for the mtengines library.
 *
 * Transport failures are described by `ProviderError`; everything an engine
 * can reject a call with is described by `EngineError`. Both use the
 * thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to a vendor API
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Classify a non-success HTTP status into the matching error variant
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            401 | 403 => Self::AuthenticationError(format!("{} - {}", status_code, message)),
            _ => Self::ApiError { status_code, message },
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors an MT engine surfaces to its caller
#[derive(Error, Debug)]
pub enum EngineError {
    /// A required setting (language, model, region) is missing
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The vendor call failed
    #[error("Transport error: {0}")]
    Transport(#[from] ProviderError),

    /// The vendor answered, but not with what was expected
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The engine does not offer the requested operation
    #[error("Not implemented: {0}")]
    NotImplemented(String),
}

impl From<crate::xml::XmlError> for EngineError {
    fn from(error: crate::xml::XmlError) -> Self {
        Self::MalformedResponse(error.to_string())
    }
}
