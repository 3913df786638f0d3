#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid text: {0}")]
    Text(#[from] nexus_types::TextError),
    #[error("envelope schema mismatch at {path}: {message}")]
    EnvelopeSchema { path: String, message: String },
    #[error("invalid envelope timestamp '{0}'")]
    InvalidTimestamp(String),
    #[error("failed to serialize envelope: {0}")]
    Serialization(serde_json::Error),
    #[error("duplicate hook group member '{0}'")]
    DuplicateMember(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
