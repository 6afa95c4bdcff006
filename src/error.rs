//! Main Crate Error

#[derive(thiserror::Error, Debug)]
/// Hopchain crate error enum.
pub enum Error {
    /// The path index points past the end of the path segments.
    #[error("Path.Index({index}) >= len(Path.PathSegments)({len})")]
    IndexOutOfRange {
        /// Offending index.
        index: u32,
        /// Number of segments in the path.
        len: usize,
    },

    /// The call [Context](crate::Context) was canceled.
    #[error("context canceled")]
    Cancelled,

    /// The call [Context](crate::Context) deadline passed.
    #[error("context deadline exceeded")]
    DeadlineExceeded,

    /// Error raised by another element of the chain (transport, policy, ...).
    #[error("{0}")]
    Handler(Box<dyn std::error::Error + Send + Sync>),

    #[cfg(feature = "codec")]
    #[error("Failed to parse connection bytes: {0}")]
    /// Transparent [serde_bencode::Error]
    BencodeError(#[from] serde_bencode::Error),
}

impl Error {
    /// Wrap an arbitrary error raised by a chain element.
    pub fn handler<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Handler(error.into())
    }
}

/// Alias for `Result<T, hopchain::Error>`.
pub type Result<T, E = Error> = std::result::Result<T, E>;
