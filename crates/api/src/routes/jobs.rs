use axum::routing::post;
use axum::Router;

use crate::handlers::jobs;
use crate::state::AppState;

/// Job submission.
///
/// Runs for as long as the slowest worker takes to acknowledge, so it is
/// mounted outside the request timeout.
///
/// ```text
/// POST /parse           -> submit_job
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/parse", post(jobs::submit_job))
}
