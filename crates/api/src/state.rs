use std::sync::Arc;

use fanout_dispatch::Dispatcher;
use fanout_storage::BundleStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Partitions work and posts it to the worker roster.
    pub dispatcher: Arc<Dispatcher>,
    /// Bundle directories and result records.
    pub store: BundleStore,
}
