//! Handler for job submission (`POST /parse`).
//!
//! Validates the submission, claims the bundle name, then fans the work
//! list out across the worker roster. Individual worker failures do not
//! fail the request; they are listed in the returned report.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use fanout_core::bundle::BundleId;
use fanout_dispatch::DispatchReport;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /parse`.
///
/// Fields are kept loosely typed so malformed values produce the same
/// 400 messages as missing ones instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct SubmitJob {
    #[serde(default)]
    pub urls: Option<Value>,
    #[serde(default)]
    pub bundle: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct SubmitJobResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub report: DispatchReport,
}

/// Require a non-empty array of strings.
fn validate_urls(urls: Option<Value>) -> AppResult<Vec<String>> {
    let invalid = || AppError::BadRequest("Invalid URLs array".to_string());

    let Some(Value::Array(values)) = urls else {
        return Err(invalid());
    };
    if values.is_empty() {
        return Err(invalid());
    }
    values
        .into_iter()
        .map(|v| match v {
            Value::String(s) => Ok(s),
            _ => Err(invalid()),
        })
        .collect()
}

fn validate_bundle(bundle: Option<Value>) -> AppResult<BundleId> {
    match bundle {
        Some(Value::String(raw)) if !raw.is_empty() => Ok(BundleId::parse(raw)?),
        _ => Err(AppError::BadRequest("Bundle not defined".to_string())),
    }
}

// ---------------------------------------------------------------------------
// POST /parse
// ---------------------------------------------------------------------------

pub async fn submit_job(
    State(state): State<AppState>,
    payload: Result<Json<SubmitJob>, JsonRejection>,
) -> AppResult<Json<DataResponse<SubmitJobResponse>>> {
    let Json(input) = payload?;

    let urls = validate_urls(input.urls)?;
    let bundle = validate_bundle(input.bundle)?;

    // Until the deliveries start, an error or a dropped request releases
    // the claim and gives the bundle name back.
    let claim = state.store.admit(&bundle).await?;
    let plan = state.dispatcher.plan(&urls).await?;

    let in_flight = state.dispatcher.start(plan, Some(&bundle));
    claim.keep();

    let report = in_flight.finish().await;

    tracing::info!(
        bundle = %bundle,
        delivered = report.delivered,
        failed = report.failed,
        "Job submitted",
    );

    Ok(Json(DataResponse {
        data: SubmitJobResponse {
            message: "Requests sent successfully",
            report,
        },
    }))
}
