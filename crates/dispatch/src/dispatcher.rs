//! Concurrent fan-out of work partitions to the worker roster.
//!
//! Each worker gets its own spawned task, started in roster order. The
//! dispatcher waits for every task to finish, successful or not, before
//! reporting. A failing worker never stops the others, and because the
//! tasks are spawned they also keep running if the caller stops waiting.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use fanout_core::bundle::BundleId;
use fanout_core::partition::partition;
use fanout_core::roster::{CredentialSet, WorkerConfig, WorkerRoster};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::task::JoinHandle;

use crate::error::{DeliveryError, DispatchError};
use crate::payload::{build_task_body, shadowed_fields};
use crate::provider::WorkerConfigProvider;

/// Result of delivering one partition to one worker.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerOutcome {
    /// Worker address as listed in the roster.
    pub worker: String,
    /// Number of work items in the partition sent to this worker.
    pub items: usize,
    pub success: bool,
    /// Worker acknowledgement; JSON when parseable, otherwise raw text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

impl WorkerOutcome {
    fn delivered(worker: String, items: usize, response: Value, started: Instant) -> Self {
        Self {
            worker,
            items,
            success: true,
            response: Some(response),
            error: None,
            elapsed_ms: started.elapsed().as_millis() as u64,
        }
    }

    fn failed(worker: String, items: usize, error: String, started: Instant) -> Self {
        Self {
            worker,
            items,
            success: false,
            response: None,
            error: Some(error),
            elapsed_ms: started.elapsed().as_millis() as u64,
        }
    }
}

/// Summary of one dispatch. Outcomes are listed in roster order.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle: Option<BundleId>,
    pub total_items: usize,
    pub delivered: usize,
    pub failed: usize,
    pub dispatched_at: DateTime<Utc>,
    pub outcomes: Vec<WorkerOutcome>,
}

/// Splits work across the configured workers and posts each partition.
pub struct Dispatcher {
    client: reqwest::Client,
    provider: Arc<dyn WorkerConfigProvider>,
}

impl Dispatcher {
    /// Create a dispatcher with a default HTTP client.
    ///
    /// The client keeps reqwest's defaults: no request timeout and no retry.
    pub fn new(provider: Arc<dyn WorkerConfigProvider>) -> Self {
        Self::with_client(reqwest::Client::new(), provider)
    }

    pub fn with_client(client: reqwest::Client, provider: Arc<dyn WorkerConfigProvider>) -> Self {
        Self { client, provider }
    }

    /// Load the current worker configuration, partition `items` across it
    /// and fan out.
    ///
    /// Returns an error only when the configuration cannot be loaded or the
    /// roster is empty; in both cases no worker has been contacted.
    /// Individual delivery failures are reported in the returned outcomes.
    pub async fn dispatch(
        &self,
        items: &[String],
        bundle: Option<&BundleId>,
    ) -> Result<DispatchReport, DispatchError> {
        let plan = self.plan(items).await?;
        Ok(self.start(plan, bundle).finish().await)
    }

    /// Load the worker configuration and partition `items` across it.
    ///
    /// Nothing is sent yet; a plan that is dropped contacts no worker.
    pub async fn plan(&self, items: &[String]) -> Result<DispatchPlan, DispatchError> {
        let config = self.provider.load().await?;

        let uncredentialed = config.uncredentialed_workers();
        if uncredentialed > 0 {
            tracing::warn!(
                workers = config.roster.len(),
                credentials = config.credentials.len(),
                uncredentialed,
                "Credential set is shorter than the worker roster",
            );
        }

        let partitions = partition(items, config.roster.len())?;

        Ok(DispatchPlan {
            config,
            partitions,
            total_items: items.len(),
        })
    }

    /// Spawn one delivery per worker in `plan`.
    ///
    /// Every request is in flight once this returns; the deliveries run to
    /// completion even if the returned [`InFlight`] is dropped.
    pub fn start(&self, plan: DispatchPlan, bundle: Option<&BundleId>) -> InFlight {
        tracing::info!(
            bundle = bundle.map(BundleId::as_str),
            total_items = plan.total_items,
            workers = plan.config.roster.len(),
            "Dispatching work to workers",
        );

        let dispatched_at = Utc::now();
        let pending = self.spawn_deliveries(
            plan.partitions,
            &plan.config.roster,
            &plan.config.credentials,
            bundle,
        );

        InFlight {
            bundle: bundle.cloned(),
            total_items: plan.total_items,
            dispatched_at,
            pending,
        }
    }

    /// Send `partitions[i]` to `roster[i]` together with `credentials[i]`.
    ///
    /// A roster entry without a matching partition receives an empty list;
    /// one without a matching credential receives no credential fields.
    /// Always yields exactly one outcome per roster entry.
    pub async fn fan_out(
        &self,
        partitions: Vec<Vec<String>>,
        roster: &WorkerRoster,
        credentials: &CredentialSet,
        bundle: Option<&BundleId>,
    ) -> Vec<WorkerOutcome> {
        join_deliveries(self.spawn_deliveries(partitions, roster, credentials, bundle)).await
    }

    fn spawn_deliveries(
        &self,
        partitions: Vec<Vec<String>>,
        roster: &WorkerRoster,
        credentials: &CredentialSet,
        bundle: Option<&BundleId>,
    ) -> Vec<PendingDelivery> {
        let mut partitions = partitions.into_iter();
        let mut pending = Vec::with_capacity(roster.len());

        for (index, worker) in roster.iter().enumerate() {
            let items = partitions.next().unwrap_or_default();
            let item_count = items.len();
            let credential = credentials.get(index);

            if let Some(credential) = credential {
                let shadowed = shadowed_fields(credential);
                if !shadowed.is_empty() {
                    tracing::debug!(worker = %worker, ?shadowed, "Credential overrides task fields");
                }
            }

            let body = build_task_body(items, bundle, credential);
            let client = self.client.clone();
            let address = worker.clone();
            let handle = tokio::spawn(async move {
                let started = Instant::now();
                match send_task(&client, &address, &body).await {
                    Ok(response) => {
                        tracing::info!(
                            worker = %address,
                            response = %response,
                            "Request to worker successful",
                        );
                        WorkerOutcome::delivered(address, item_count, response, started)
                    }
                    Err(e) => {
                        tracing::error!(worker = %address, error = %e, "Error sending request to worker");
                        WorkerOutcome::failed(address, item_count, e.to_string(), started)
                    }
                }
            });

            pending.push(PendingDelivery {
                worker: worker.clone(),
                items: item_count,
                started: Instant::now(),
                handle,
            });
        }

        pending
    }
}

/// Worker configuration and partitions for one dispatch, not yet sent.
#[derive(Debug)]
pub struct DispatchPlan {
    config: WorkerConfig,
    partitions: Vec<Vec<String>>,
    total_items: usize,
}

/// Deliveries that have been spawned and not yet collected.
#[derive(Debug)]
pub struct InFlight {
    bundle: Option<BundleId>,
    total_items: usize,
    dispatched_at: DateTime<Utc>,
    pending: Vec<PendingDelivery>,
}

impl InFlight {
    /// Wait for every delivery and summarize them in roster order.
    pub async fn finish(self) -> DispatchReport {
        let outcomes = join_deliveries(self.pending).await;

        let delivered = outcomes.iter().filter(|o| o.success).count();
        let failed = outcomes.len() - delivered;
        tracing::info!(
            bundle = self.bundle.as_ref().map(BundleId::as_str),
            delivered,
            failed,
            "Dispatch finished",
        );

        DispatchReport {
            bundle: self.bundle,
            total_items: self.total_items,
            delivered,
            failed,
            dispatched_at: self.dispatched_at,
            outcomes,
        }
    }
}

#[derive(Debug)]
struct PendingDelivery {
    worker: String,
    items: usize,
    started: Instant,
    handle: JoinHandle<WorkerOutcome>,
}

async fn join_deliveries(pending: Vec<PendingDelivery>) -> Vec<WorkerOutcome> {
    let (meta, handles): (Vec<_>, Vec<_>) = pending
        .into_iter()
        .map(|d| ((d.worker, d.items, d.started), d.handle))
        .unzip();

    futures::future::join_all(handles)
        .await
        .into_iter()
        .zip(meta)
        .map(|(joined, (worker, items, started))| {
            joined.unwrap_or_else(|e| {
                tracing::error!(worker = %worker, error = %e, "Worker delivery task failed");
                WorkerOutcome::failed(worker, items, format!("Delivery task failed: {e}"), started)
            })
        })
        .collect()
}

/// POST one task body and return the worker's acknowledgement.
async fn send_task(
    client: &reqwest::Client,
    worker: &str,
    body: &Map<String, Value>,
) -> Result<Value, DeliveryError> {
    let url = WorkerRoster::task_url(worker);
    let response = client.post(&url).json(body).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(DeliveryError::HttpStatus(status.as_u16()));
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned())))
}
