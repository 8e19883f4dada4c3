#[derive(Debug, thiserror::Error)]
pub enum PebbleError {
    /// The backing store could not load, persist, or destroy a session.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Session not started")]
    SessionNotStarted,

    /// A caller used a key the session reserves for its own bookkeeping.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PebbleError>;
