use axum::{Router, middleware, routing::get};

use super::handlers::{get_karma_ranking, get_live_karma_ranking, get_user_karma};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/karma/live", get(get_live_karma_ranking))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/karma", get(get_karma_ranking))
        .route("/karma/users/:user_id", get(get_user_karma))
        .merge(protected)
}
