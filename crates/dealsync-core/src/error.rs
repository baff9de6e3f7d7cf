use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("{service} API returned status {status}")]
    Remote { service: &'static str, status: u16 },

    #[error("missing configuration: {0}")]
    MissingConfig(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SyncError {
    /// Non-success HTTP response from an upstream service.
    pub fn remote(service: &'static str, status: reqwest::StatusCode) -> Self {
        Self::Remote {
            service,
            status: status.as_u16(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
