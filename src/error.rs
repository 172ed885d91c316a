use std::path::PathBuf;
use thiserror::Error;

/// Why a route could not be turned into a playable [`Route`](crate::core::Route)
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read route data from {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed route JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed route CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("route header has no column named any of {names:?}")]
    MissingColumn { names: Vec<String> },

    #[error("route record {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("unrecognised route data format")]
    UnknownFormat,

    #[error("route data contains no samples")]
    EmptyRoute,
}

/// Coarse classification shown to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadFailureKind {
    /// Route could not be retrieved or parsed
    RouteLoadFailure,
    /// Route was retrieved but holds zero samples
    EmptyRouteFailure,
}

impl LoadError {
    pub fn kind(&self) -> LoadFailureKind {
        match self {
            LoadError::EmptyRoute => LoadFailureKind::EmptyRouteFailure,
            _ => LoadFailureKind::RouteLoadFailure,
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("playback session must be created inside a Tokio runtime")]
    NoRuntime,

    #[error("a route load was already attempted for this session")]
    RouteAlreadyLoaded,

    #[error(transparent)]
    Load(#[from] LoadError),
}
