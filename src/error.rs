use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type shared by kernels, particles and particle sets.
///
/// Every fallible operation returns one of these instead of panicking. Each
/// variant carries enough context to be actionable.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid user or API argument (e.g. literal-list size, smoothing radius).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Index or slice bound beyond the end of a particle set.
    #[error("index {index} out of range for particle set of length {len}")]
    OutOfRange { index: usize, len: usize },

    /// Malformed row or header in a persisted particle set.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Mass-weighted quantity requested for a set whose total mass is zero.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Malformed kernel configuration document.
    #[error(transparent)]
    Config(#[from] serde_json::Error),

    /// Propagated I/O errors from export/load.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }
}
