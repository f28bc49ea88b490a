use thiserror::Error;

/// Main error type for brokergraph
#[derive(Error, Debug)]
pub enum BrokerGraphError {
    /// Graph query execution faults reported by the database
    #[error("Graph query error: {0}")]
    Graph(String),

    /// Transport errors talking to the database or the LLM API
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON payloads
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Entity lookup by url matched nothing
    #[error("{0} not found")]
    NotFound(String),

    /// Language model API errors
    #[error("LLM API error: {0}")]
    Llm(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient Result type using BrokerGraphError
pub type Result<T> = std::result::Result<T, BrokerGraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BrokerGraphError::Config("Test error".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("Test error"));
    }

    #[test]
    fn test_not_found_display() {
        let err = BrokerGraphError::NotFound("Deal".to_string());
        assert_eq!(err.to_string(), "Deal not found");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BrokerGraphError = io_err.into();
        assert!(matches!(err, BrokerGraphError::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: BrokerGraphError = json_err.into();
        assert!(matches!(err, BrokerGraphError::Json(_)));
    }
}
