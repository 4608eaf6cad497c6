use axum::routing::post;
use axum::Router;

use crate::handlers::results;
use crate::state::AppState;

/// Result callbacks. Unauthenticated; workers call `save` directly.
///
/// ```text
/// POST /{bundle}/save   -> save_result
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{bundle}/save", post(results::save_result))
}
