//! Worker roster and per-worker credential types.
//!
//! The roster and the credential set are index-aligned: `credentials[i]`
//! belongs to `roster[i]`. Both are deserialized straight from their JSON
//! config files, so shape errors surface at the load boundary.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Opaque per-worker session fields merged into each outbound task body.
pub type Credential = serde_json::Map<String, serde_json::Value>;

/// Ordered list of worker `host:port` addresses. Its length is the fan-out degree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct WorkerRoster(Vec<String>);

impl WorkerRoster {
    pub fn new(addresses: Vec<String>) -> Result<Self, CoreError> {
        for (i, address) in addresses.iter().enumerate() {
            if address.trim().is_empty() {
                return Err(CoreError::Validation(format!(
                    "Worker address at index {i} must not be empty"
                )));
            }
        }
        Ok(Self(addresses))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Task endpoint for the worker at `address`.
    pub fn task_url(address: &str) -> String {
        format!("http://{address}/task")
    }
}

impl TryFrom<Vec<String>> for WorkerRoster {
    type Error = CoreError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WorkerRoster> for Vec<String> {
    fn from(value: WorkerRoster) -> Self {
        value.0
    }
}

/// Ordered credential objects, one per roster entry.
///
/// Every entry must be a JSON object; anything else fails deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialSet(Vec<Credential>);

impl CredentialSet {
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self(credentials)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Credential> {
        self.0.get(index)
    }
}

/// A roster paired with its credentials, as loaded for one dispatch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkerConfig {
    pub roster: WorkerRoster,
    pub credentials: CredentialSet,
}

impl WorkerConfig {
    /// Number of trailing workers with no credential entry.
    ///
    /// Those workers are still dispatched to, just without credential fields.
    pub fn uncredentialed_workers(&self) -> usize {
        self.roster.len().saturating_sub(self.credentials.len())
    }
}
