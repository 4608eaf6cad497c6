//! Partitioned fan-out of work items to a fixed pool of HTTP workers.
//!
//! [`Dispatcher::dispatch`] loads the worker roster and credentials from a
//! [`WorkerConfigProvider`], splits the work list into one partition per
//! worker and posts each partition to `http://{worker}/task`. Failures are
//! isolated per worker and reported in the returned [`DispatchReport`].

pub mod dispatcher;
pub mod error;
pub mod payload;
pub mod provider;

pub use dispatcher::{DispatchPlan, DispatchReport, Dispatcher, InFlight, WorkerOutcome};
pub use error::{ConfigLoadError, DeliveryError, DispatchError};
pub use provider::{FileConfigProvider, StaticConfigProvider, WorkerConfigProvider};
