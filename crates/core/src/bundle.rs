//! Bundle identifiers.
//!
//! A bundle names one job submission and doubles as the name of the
//! directory its results are stored under, so it must be a single,
//! non-empty path segment.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Validated bundle identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BundleId(String);

impl BundleId {
    pub fn parse(raw: impl Into<String>) -> Result<Self, CoreError> {
        let raw = raw.into();
        validate_bundle(&raw)?;
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validate a raw bundle string.
///
/// Rules:
/// - Must not be empty.
/// - Must not contain `/`, `\` or NUL.
/// - Must not be `.` or `..`.
pub fn validate_bundle(raw: &str) -> Result<(), CoreError> {
    if raw.is_empty() {
        return Err(CoreError::Validation("Bundle not defined".to_string()));
    }
    if raw.contains(['/', '\\', '\0']) || raw == "." || raw == ".." {
        return Err(CoreError::Validation(format!(
            "Bundle '{raw}' must be a single path segment"
        )));
    }
    Ok(())
}

impl TryFrom<String> for BundleId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<BundleId> for String {
    fn from(value: BundleId) -> Self {
        value.0
    }
}

impl AsRef<str> for BundleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BundleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
