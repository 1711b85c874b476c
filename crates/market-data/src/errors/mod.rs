//! Error types for market data operations.

use thiserror::Error;

/// Errors that can occur while fetching or adapting upstream data.
///
/// `InvalidInput` and `Unsupported` are client mistakes and map to HTTP 400
/// at the API layer; `NotFound` maps to 404; everything else is a server
/// failure (500).
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// A parameter the upstream source rejects (bad date range, malformed
    /// symbol, out-of-range paging).
    #[error("{0}")]
    InvalidInput(String),

    /// A named lookup yielded no match.
    #[error("{0}")]
    NotFound(String),

    /// The selected source does not implement the requested operation.
    #[error("source '{source_id}' does not support {operation}")]
    Unsupported {
        /// The operation the caller asked for
        operation: String,
        /// The source that cannot serve it
        source_id: String,
    },

    /// The upstream service answered with an error or an unusable payload.
    #[error("{source_id}: {message}")]
    Provider {
        /// The source that failed
        source_id: String,
        /// What went wrong, as reported upstream or by the decoder
        message: String,
    },

    /// Transport-level failure talking to the upstream service.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn unsupported(source: &str, operation: &str) -> Self {
        Self::Unsupported {
            operation: operation.to_string(),
            source_id: source.to_string(),
        }
    }

    pub fn provider(source: &str, message: impl Into<String>) -> Self {
        Self::Provider {
            source_id: source.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_displays_bare_message() {
        let err = MarketDataError::invalid("invalid date range");
        assert_eq!(format!("{}", err), "invalid date range");
    }

    #[test]
    fn test_unsupported_names_source_and_operation() {
        let err = MarketDataError::unsupported("tcbs", "order_stats");
        assert_eq!(
            format!("{}", err),
            "source 'tcbs' does not support order_stats"
        );
    }

    #[test]
    fn test_provider_error_display() {
        let err = MarketDataError::provider("vci", "HTTP 502");
        assert_eq!(format!("{}", err), "vci: HTTP 502");
    }
}
