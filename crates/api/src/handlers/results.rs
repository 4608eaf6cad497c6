//! Handler for worker result uploads (`POST /{bundle}/save`).
//!
//! The record is keyed by the caller's address as seen on the connection,
//! never by anything in the body.

use std::net::SocketAddr;

use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, Path, State};
use axum::Json;
use fanout_core::bundle::BundleId;
use fanout_core::submitter::{normalize_submitter, submitter_from_peer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveResult {
    #[serde(default, rename = "jsonData")]
    pub json_data: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct StoredResult {
    pub message: &'static str,
    pub bundle: BundleId,
    pub submitter: String,
    pub file: String,
}

pub async fn save_result(
    State(state): State<AppState>,
    Path(bundle): Path<String>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    payload: Result<Json<SaveResult>, JsonRejection>,
) -> AppResult<Json<DataResponse<StoredResult>>> {
    let Json(input) = payload?;

    let Some(json_data) = input.json_data else {
        return Err(AppError::BadRequest(
            "Bundle and jsonData are required".to_string(),
        ));
    };
    let bundle = BundleId::parse(bundle)?;

    let address = submitter_from_peer(peer);
    tracing::info!(bundle = %bundle, submitter = %address, "Saving data for bundle");

    let path = state.store.store_result(&bundle, &address, &json_data).await?;
    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Json(DataResponse {
        data: StoredResult {
            message: "Data saved successfully",
            submitter: normalize_submitter(&address).to_string(),
            bundle,
            file,
        },
    }))
}
