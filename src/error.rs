use crate::config::ParseError;

/// Errors that occurred while preparing, checking or encoding logs.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Logs failed to serialize to JSON.
    ///
    /// Note: This is an error in this crate. If you spot this, please open an issue.
    #[error("serializing logs failed with {0}")]
    Serialize(serde_json::Error),

    /// Logs failed to deserialize from JSON. Either the input is not JSON or it does not follow
    /// the log format.
    #[error("deserializing logs failed with {0}")]
    Deserialize(serde_json::Error),

    /// A log misses a required field or contains a value that cannot be sent.
    #[error("invalid log: {0}")]
    InvalidLog(String),

    /// A log container has to hold at least one log.
    #[error("log container is empty")]
    EmptyContainer,

    /// The app secret could not be parsed.
    #[error("invalid app secret: {0}")]
    AppSecret(#[from] ParseError),

    /// The app secret environment variable is not set or not unicode.
    #[error("reading app secret from environment failed with {0}")]
    Environment(std::env::VarError),
}
