use std::io;
use thiserror::Error;

/// Unified error type for the glowchat application
#[derive(Error, Debug)]
pub enum GlowError {
    /// Completion endpoint returned something we cannot use
    #[error("API error: {0}")]
    Api(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    /// Product catalog could not be read or parsed
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Network-related errors
    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for GlowError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GlowError::Network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            GlowError::Network(format!("Connection failed: {}", err))
        } else if err.is_status() {
            GlowError::Api(format!("API returned error status: {}", err))
        } else if err.is_decode() {
            GlowError::Serialization(format!("Malformed response body: {}", err))
        } else {
            GlowError::Network(format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for GlowError {
    fn from(err: serde_json::Error) -> Self {
        GlowError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for GlowError {
    fn from(err: serde_yml::Error) -> Self {
        GlowError::Serialization(format!("YAML error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_become_serialization_errors() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let converted: GlowError = err.into();
        assert!(matches!(converted, GlowError::Serialization(_)));
        assert!(converted.to_string().starts_with("Serialization error: JSON error"));
    }

    #[test]
    fn io_errors_keep_their_source() {
        let err = io::Error::new(io::ErrorKind::NotFound, "products.json");
        let converted: GlowError = err.into();
        assert_eq!(converted.to_string(), "IO error: products.json");
    }
}
