use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("{service} service error: {detail}")]
    RemoteService { service: String, detail: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl DomainError {
    pub fn remote_service_error(service: &str, detail: &str) -> Self {
        Self::RemoteService {
            service: service.to_string(),
            detail: detail.to_string(),
        }
    }

    pub fn invalid_input(message: &str) -> Self {
        Self::InvalidInput(message.to_string())
    }

    /// Detail string reported by the remote service, if this error came from it.
    pub fn remote_detail(&self) -> Option<&str> {
        match self {
            Self::RemoteService { detail, .. } => Some(detail),
            _ => None,
        }
    }
}
