use axum::{Router, routing::post};

use super::handlers::send_email;
use crate::state::AppState;

/// Mounted under the authenticated admin router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/send", post(send_email))
}
