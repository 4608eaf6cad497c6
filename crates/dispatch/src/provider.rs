//! Sources of the worker roster and credential set.
//!
//! The dispatcher asks its provider for a fresh [`WorkerConfig`] on every
//! dispatch. [`FileConfigProvider`] re-reads both JSON files each time, so
//! edits take effect on the next submission without a restart.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fanout_core::roster::{CredentialSet, WorkerConfig, WorkerRoster};
use serde::de::DeserializeOwned;

use crate::error::ConfigLoadError;

#[async_trait]
pub trait WorkerConfigProvider: Send + Sync {
    async fn load(&self) -> Result<WorkerConfig, ConfigLoadError>;
}

/// Reads the roster (`["host:port", ...]`) and credentials (`[{...}, ...]`)
/// from two JSON files.
#[derive(Debug, Clone)]
pub struct FileConfigProvider {
    servers_path: PathBuf,
    sessions_path: PathBuf,
}

impl FileConfigProvider {
    pub fn new(servers_path: impl Into<PathBuf>, sessions_path: impl Into<PathBuf>) -> Self {
        Self {
            servers_path: servers_path.into(),
            sessions_path: sessions_path.into(),
        }
    }
}

#[async_trait]
impl WorkerConfigProvider for FileConfigProvider {
    async fn load(&self) -> Result<WorkerConfig, ConfigLoadError> {
        let roster: WorkerRoster = read_json_file(&self.servers_path).await?;
        let credentials: CredentialSet = read_json_file(&self.sessions_path).await?;
        Ok(WorkerConfig {
            roster,
            credentials,
        })
    }
}

async fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigLoadError> {
    let data = tokio::fs::read(path).await.map_err(|source| {
        tracing::error!(path = %path.display(), error = %source, "Error reading JSON file");
        ConfigLoadError::Read {
            path: path.to_path_buf(),
            source,
        }
    })?;

    serde_json::from_slice(&data).map_err(|source| {
        tracing::error!(path = %path.display(), error = %source, "Error parsing JSON file");
        ConfigLoadError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Fixed configuration held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigProvider {
    config: WorkerConfig,
}

impl StaticConfigProvider {
    pub fn new(config: WorkerConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl WorkerConfigProvider for StaticConfigProvider {
    async fn load(&self) -> Result<WorkerConfig, ConfigLoadError> {
        Ok(self.config.clone())
    }
}
