//! Typed failures surfaced to the dispatcher.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The client-side deadline elapsed before the model answered.
    #[error("Request to model '{model}' timed out after {timeout:?}")]
    ModelTimeout { model: String, timeout: Duration },

    /// The service rejected, disabled, or does not know the selected model.
    #[error("Model '{model}' is unavailable: {message}")]
    ModelUnavailable { model: String, message: String },

    /// Any other non-success HTTP status.
    #[error("OpenRouter API error: {status} - {body}")]
    Transport { status: u16, body: String },

    #[error("No response from AI model")]
    EmptyResponse,

    #[error("Failed to reach OpenRouter: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response from OpenRouter: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Configuration(String),
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_names_model() {
        let err = Error::ModelTimeout {
            model: "mistralai/devstral-2512:free".to_string(),
            timeout: Duration::from_secs(30),
        };
        assert_eq!(
            err.to_string(),
            "Request to model 'mistralai/devstral-2512:free' timed out after 30s"
        );
    }

    #[test]
    fn test_transport_message() {
        let err = Error::Transport {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "OpenRouter API error: 502 - bad gateway");
    }
}
