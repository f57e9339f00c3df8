use std::path::PathBuf;

use speech_domain::DomainError;
use thiserror::Error;
use validator::ValidationErrors;

use crate::NerOutputMode;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Alignment error: {0}")]
    Alignment(#[from] AlignmentError),

    #[error(
        "Testing mode '{0}' is not supported. Supported testing modes are: {modes}",
        modes = NerOutputMode::supported_list()
    )]
    UnsupportedMode(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("failed to write `{}`: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApplicationError {
    /// Detail string reported by the remote service, if the failure happened there.
    pub fn remote_detail(&self) -> Option<&str> {
        match self {
            ApplicationError::Domain(error) => error.remote_detail(),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for ApplicationError {
    fn from(errors: ValidationErrors) -> Self {
        ApplicationError::Validation(errors.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid recognition option `{field}`: {message}")]
    InvalidOption { field: String, message: String },
}

impl From<ValidationErrors> for ConfigError {
    fn from(errors: ValidationErrors) -> Self {
        let (field, message) = errors
            .field_errors()
            .into_iter()
            .next()
            .map(|(field, field_errors)| {
                let message = field_errors
                    .first()
                    .and_then(|error| error.message.as_ref())
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| "invalid value".to_string());
                (field.to_string(), message)
            })
            .unwrap_or_else(|| ("options".to_string(), errors.to_string()));
        ConfigError::InvalidOption { field, message }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignmentError {
    #[error("received {predictions} token predictions for {queries} queries")]
    CountMismatch { predictions: usize, queries: usize },

    #[error("token `{token}` of query {query} has no character span")]
    MissingSpan { query: usize, token: String },

    #[error(
        "token `{token}` of query {query} spans {start}..{end}, outside the {length} characters of the query"
    )]
    SpanOutOfRange {
        query: usize,
        token: String,
        start: usize,
        end: usize,
        length: usize,
    },
}
