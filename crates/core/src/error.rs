use thiserror::Error;

/// Failure writing to the persistent key-value store.
///
/// Reads never fail: a missing key, or a store that cannot be reached, reads
/// as absent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("local storage is unavailable")]
    Unavailable,

    #[error("storage quota exceeded while writing {key:?}")]
    QuotaExceeded { key: String },

    #[error("storage rejected write of {key:?}: {reason}")]
    WriteRejected { key: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("API URL must start with http:// or https://, got {0:?}")]
    InvalidApiUrl(String),

    #[error("base path must start with '/', got {0:?}")]
    InvalidBasePath(String),

    #[error("unknown route set {0:?} (expected \"full\" or \"without-convert\")")]
    UnknownRouteSet(String),
}

/// Errors talking to the backend's `/api/database` endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Rejected before anything was sent.
    #[error("{0}")]
    InvalidInput(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected response body: {0}")]
    Decode(String),

    /// 422: an expected business error, message is meant for the user.
    #[error("{0}")]
    Client(String),

    /// 5xx. The server may hide details, in which case the message is generic.
    #[error("{0}")]
    Server(String),

    /// The cached credentials behind the database key are gone.
    #[error("connection session time expired")]
    SessionExpired,

    #[error("unexpected HTTP status {0}")]
    UnexpectedStatus(u16),
}

impl ApiError {
    /// True when the stored database key no longer names a live session.
    pub fn invalidates_key(&self) -> bool {
        matches!(self, ApiError::SessionExpired)
    }
}
