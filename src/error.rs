use std::path::PathBuf;
use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for the update gate.
///
/// Every variant is request-level and terminal: the gate never retries.
/// Callers match on [`GateError::code`] to build the client-facing response.
#[derive(Debug, Error)]
pub enum GateError {
    // ── Version key protocol ─────────────────────────────────────────────
    #[error("version: {0}")]
    Version(#[from] VersionError),

    // ── Record / definition store ───────────────────────────────────────
    #[error("store: {0}")]
    Store(#[from] StoreError),
}

impl GateError {
    /// Stable error code surfaced to clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Version(err) => err.code(),
            Self::Store(StoreError::NotFound { .. }) => "ERR_NODE_NOT_FOUND",
            Self::Store(_) => "ERR_STORE_BACKEND",
        }
    }
}

// ─── Version key errors ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("version key cannot be blank [node id: {record_id}]")]
    BlankVersionKey { record_id: String },

    #[error("invalid lastUpdatedOn timestamp [node id: {record_id}]")]
    MissingTimestamp { record_id: String },

    #[error("unparseable timestamp: {value:?}")]
    MalformedTimestamp { value: String },

    #[error("invalid version key, unable to update the data [node id: {record_id}]")]
    StaleVersionKey { record_id: String },
}

impl VersionError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::BlankVersionKey { .. } => "BLANK_VERSION",
            Self::MissingTimestamp { .. } => "INVALID_TIMESTAMP",
            Self::MalformedTimestamp { .. } => "MALFORMED_TIMESTAMP",
            Self::StaleVersionKey { .. } => "ERR_STALE_VERSION_KEY",
        }
    }
}

// ─── Store errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("node not found: {id}")]
    NotFound { id: String },

    #[error("sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("backend: {0}")]
    Backend(String),
}

// ─── Config errors ──────────────────────────────────────────────────────────

/// Failures loading, validating or persisting `config.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not find home directory")]
    NoHomeDir,

    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config")]
    Serialize(#[from] toml::ser::Error),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("hot-reload of {} failed", path.display())]
    HotReload {
        path: PathBuf,
        #[source]
        source: Box<ConfigError>,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, GateError>;
