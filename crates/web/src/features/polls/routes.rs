use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{close_poll, convert_poll, create_poll, get_poll};
use crate::state::AppState;

/// Mounted under the authenticated admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_poll))
        .route("/:poll_id", get(get_poll))
        .route("/:poll_id/close", post(close_poll))
        .route("/:poll_id/convert", post(convert_poll))
}
