//! Typed failures for each stage of a run.
//!
//! Every stage returns its own error type so the driver can propagate it with `?`
//! and the binary can turn it into a non-zero exit. Nothing here is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Problems with the environment, detected before any file is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("shard index {index} out of range for shard total {total}")]
    InvalidShard { index: usize, total: usize },
}

/// Failures from a single chat-completion call.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to send request to chat completion API: {0}")]
    Request(#[from] reqwest::Error),

    #[error("chat completion API error ({status}): {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed chat completion response: {0}")]
    MalformedResponse(String),
}

/// Failures from the file driver.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to scan {path}: {source}")]
    Discover {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to translate {path}: {source}")]
    Translate {
        path: PathBuf,
        #[source]
        source: TranslateError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_message_names_variable() {
        let err = ConfigError::Missing("OPENAI_API_KEY");
        assert_eq!(err.to_string(), "OPENAI_API_KEY not set");
    }

    #[test]
    fn test_invalid_message_includes_value() {
        let err = ConfigError::Invalid {
            name: "MAX_CHARS",
            value: "abc".to_string(),
            reason: "invalid digit found in string".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("MAX_CHARS"));
        assert!(msg.contains("\"abc\""));
    }

    #[test]
    fn test_status_error_includes_code_and_body() {
        let err = TranslateError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn test_pipeline_error_names_file() {
        let err = PipelineError::Translate {
            path: PathBuf::from("docs/guide.md"),
            source: TranslateError::MalformedResponse("no choices".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("docs/guide.md"));
        assert!(msg.contains("no choices"));
    }
}
