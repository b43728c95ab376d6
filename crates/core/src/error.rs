use crate::AlgorithmKind;

/// Result alias that carries the custom [`SortVizError`] type.
pub type Result<T> = std::result::Result<T, SortVizError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum SortVizError {
    /// Free-form failure surfaced to the caller as a readable message.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Configuration documents that fail to parse.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// The shared cancellation signal was observed at a frame boundary.
    ///
    /// Algorithms propagate this with `?` so the whole call stack unwinds
    /// back to the run supervisor, which records the run as aborted.
    #[error("run cancelled")]
    Cancelled,
    /// A run with unbounded expected runtime was declined.
    #[error("{algorithm} on {len} elements needs explicit confirmation")]
    Unconfirmed { algorithm: AlgorithmKind, len: usize },
    #[error("a session is already running")]
    Busy,
}

impl SortVizError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    /// Returns `true` for the cooperative cancellation signal.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<&str> for SortVizError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for SortVizError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
