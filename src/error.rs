//! Error types for stream filter decoding.
//!
//! Every decoder returns a typed failure. The filters that can still hand
//! back something useful after corruption (LZW and RunLength) carry the bytes
//! they produced before the failure point; see [`Error::partial_output`].

/// Result type alias for filter operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while decoding a filtered stream.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The filter name is not one of the known PDF filters.
    #[error("Unsupported filter: {0}")]
    UnsupportedFilter(String),

    /// ASCII85 data contained an invalid character or a misplaced terminator.
    #[error("Malformed ASCII85 data: {0}")]
    MalformedBase85(String),

    /// An LZW code referenced a dictionary entry that does not exist.
    #[error("Corrupt LZW stream: code {code} with table size {table_size}")]
    CorruptLzwStream {
        /// The offending code
        code: u16,
        /// Dictionary size when the code was read
        table_size: usize,
        /// Bytes decoded before the corrupt code
        partial: Vec<u8>,
    },

    /// The deflate collaborator rejected the data.
    #[error("FlateDecode inflate failed: {0}")]
    InflateFailed(String),

    /// Predictor parameters or row layout did not match the data.
    #[error("Corrupt predictor data: {0}")]
    CorruptPredictorData(String),

    /// A run-length run was cut short.
    #[error("Corrupt RunLength stream: {reason}")]
    CorruptRunLengthStream {
        /// What was missing
        reason: String,
        /// Bytes decoded before the truncated run
        partial: Vec<u8>,
    },

    /// Output grew past the configured cap.
    #[error("Resource limit exceeded: output would reach {attempted} bytes (limit {limit})")]
    ResourceLimitExceeded {
        /// Configured limit in bytes (or ratio, for ratio checks)
        limit: usize,
        /// Size the output would have reached
        attempted: usize,
    },

    /// No codec is registered for an external filter, or the codec does not
    /// support the requested variant.
    #[error("Filter not implemented: {0}")]
    NotImplemented(String),

    /// Invalid codec registration.
    #[error("Codec registration error: {0}")]
    Registration(String),

    /// An external codec failed on its input.
    #[error("{filter} decoding failed: {reason}")]
    Codec {
        /// Canonical filter name
        filter: &'static str,
        /// Codec-specific reason
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Bytes recovered before the failure, for filters where partial output
    /// is well defined.
    pub fn partial_output(&self) -> Option<&[u8]> {
        match self {
            Error::CorruptLzwStream { partial, .. }
            | Error::CorruptRunLengthStream { partial, .. } => Some(partial),
            _ => None,
        }
    }

    /// Consume the error and take the recovered bytes, if any.
    pub fn into_partial_output(self) -> Option<Vec<u8>> {
        match self {
            Error::CorruptLzwStream { partial, .. }
            | Error::CorruptRunLengthStream { partial, .. } => Some(partial),
            _ => None,
        }
    }
}
