use std::path::PathBuf;

use fanout_core::error::CoreError;

/// Failure to load the worker roster or credential set.
///
/// Fatal to the enclosing dispatch: no worker is contacted.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure delivering a partition to a single worker.
///
/// Never propagated out of a dispatch; recorded in the worker's outcome.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The underlying HTTP request failed (network, DNS, connection reset).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The worker answered with a non-2xx status code.
    #[error("Worker returned HTTP {0}")]
    HttpStatus(u16),
}

/// Failure of a whole dispatch before any worker was contacted.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Config(#[from] ConfigLoadError),

    #[error(transparent)]
    Core(#[from] CoreError),
}
