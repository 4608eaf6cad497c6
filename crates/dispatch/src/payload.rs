//! Construction of the JSON body posted to a worker's `/task` endpoint.

use fanout_core::bundle::BundleId;
use fanout_core::roster::Credential;
use serde_json::{Map, Value};

/// Field carrying the worker's partition of work items.
pub const ITEMS_FIELD: &str = "chat_urls_or_usernames";

/// Field carrying the bundle identifier, when one is set.
pub const BUNDLE_FIELD: &str = "bundle";

/// Build the task body for one worker.
///
/// Starts from `{chat_urls_or_usernames, bundle?}` and merges the worker's
/// credential fields on top. On key collisions the credential value wins.
pub fn build_task_body(
    items: Vec<String>,
    bundle: Option<&BundleId>,
    credential: Option<&Credential>,
) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert(
        ITEMS_FIELD.to_string(),
        Value::Array(items.into_iter().map(Value::String).collect()),
    );
    if let Some(bundle) = bundle {
        body.insert(BUNDLE_FIELD.to_string(), Value::String(bundle.to_string()));
    }
    if let Some(credential) = credential {
        for (key, value) in credential {
            body.insert(key.clone(), value.clone());
        }
    }
    body
}

/// Credential keys that shadow a base task field.
pub fn shadowed_fields(credential: &Credential) -> Vec<&str> {
    [ITEMS_FIELD, BUNDLE_FIELD]
        .into_iter()
        .filter(|field| credential.contains_key(*field))
        .collect()
}
