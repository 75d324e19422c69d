use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Empty or whitespace-only prompt. Rejected before any network call.
    #[error("Please enter a prompt")]
    Validation,

    /// A generation request of the same kind is still outstanding.
    #[error("A generation request is already in progress")]
    InFlight,

    /// The gateway failed or returned no usable payload.
    #[error("{0}")]
    Generation(String),

    /// Image content failed to materialize after a successful generation.
    #[error("Content failed to load for artifact {0}")]
    ContentLoad(String),

    #[error("Artifact not found: {0}")]
    NotFound(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// True for failures the user can fix by editing the prompt.
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Error::Validation)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
