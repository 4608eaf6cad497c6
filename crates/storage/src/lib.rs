//! Filesystem-backed bundle storage.
//!
//! Layout: `{root}/{bundle}/{submitter}.json`. Bundle directories are
//! created either by [`BundleStore::admit`] (exclusively) or lazily by
//! [`BundleStore::store_result`], and are never deleted once a fan-out has
//! been attempted.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fanout_core::bundle::BundleId;
use fanout_core::submitter::normalize_submitter;

/// Message returned to callers when a bundle name is already taken.
pub const BUNDLE_EXISTS_MESSAGE: &str = "Bundle directory already exists, please rename";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Bundle directory already exists, please rename: {0}")]
    BundleExists(BundleId),

    #[error("Invalid submitter address: {0:?}")]
    InvalidSubmitter(String),

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Exclusive claim on a freshly created bundle directory.
///
/// Returned by [`BundleStore::admit`]. Until [`BundleClaim::keep`] is
/// called, dropping the claim removes the directory again, so an admission
/// abandoned before any worker was contacted (an early error or a cancelled
/// request) does not reserve the bundle name.
#[derive(Debug)]
#[must_use = "dropping a claim without keeping it releases the bundle"]
pub struct BundleClaim {
    bundle: BundleId,
    path: PathBuf,
    kept: bool,
}

impl BundleClaim {
    /// Keep the bundle directory for good.
    pub fn keep(mut self) {
        self.kept = true;
        tracing::debug!(bundle = %self.bundle, "Bundle claim kept");
    }
}

impl Drop for BundleClaim {
    /// Remove the claimed directory if it is still empty.
    ///
    /// A directory that already received results (a worker called back
    /// early) is left in place.
    fn drop(&mut self) {
        if self.kept {
            return;
        }
        match std::fs::remove_dir(&self.path) {
            Ok(()) => {
                tracing::info!(bundle = %self.bundle, "Released bundle claim");
            }
            Err(e) => {
                tracing::warn!(
                    bundle = %self.bundle,
                    path = %self.path.display(),
                    error = %e,
                    "Could not release bundle claim",
                );
            }
        }
    }
}

/// Bundle directories rooted at a single storage path.
#[derive(Debug, Clone)]
pub struct BundleStore {
    root: PathBuf,
}

impl BundleStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn bundle_dir(&self, bundle: &BundleId) -> PathBuf {
        self.root.join(bundle.as_str())
    }

    /// Admit a new job by creating its bundle directory exclusively.
    ///
    /// Creation and the existence check are a single `mkdir`, so two
    /// concurrent submissions of the same bundle cannot both succeed.
    pub async fn admit(&self, bundle: &BundleId) -> Result<BundleClaim, StorageError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(io_err(&self.root))?;

        let path = self.bundle_dir(bundle);
        match tokio::fs::create_dir(&path).await {
            Ok(()) => {
                tracing::debug!(bundle = %bundle, path = %path.display(), "Bundle admitted");
                Ok(BundleClaim {
                    bundle: bundle.clone(),
                    path,
                    kept: false,
                })
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(StorageError::BundleExists(bundle.clone()))
            }
            Err(e) => Err(StorageError::Io { path, source: e }),
        }
    }

    /// Persist a result payload for `(bundle, submitter)`.
    ///
    /// The bundle directory is created if missing. The payload is written
    /// pretty-printed to a temporary file and renamed over
    /// `{submitter}.json`, so the last writer wins and readers never see a
    /// partial file.
    pub async fn store_result(
        &self,
        bundle: &BundleId,
        submitter: &str,
        payload: &serde_json::Value,
    ) -> Result<PathBuf, StorageError> {
        let name = normalize_submitter(submitter);
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(StorageError::InvalidSubmitter(submitter.to_string()));
        }

        let contents = serde_json::to_string_pretty(payload)?;

        let dir = self.bundle_dir(bundle);
        tokio::fs::create_dir_all(&dir).await.map_err(io_err(&dir))?;

        let target = dir.join(format!("{name}.json"));
        let staging = dir.join(format!(".{name}.{}.tmp", uuid::Uuid::new_v4()));

        tokio::fs::write(&staging, contents)
            .await
            .map_err(io_err(&staging))?;
        if let Err(e) = tokio::fs::rename(&staging, &target).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(StorageError::Io {
                path: target,
                source: e,
            });
        }

        tracing::info!(bundle = %bundle, submitter = name, "Result saved");
        Ok(target)
    }
}
