use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::ranking::{KarmaRanking, KarmaRankingEntry, KarmaRankingQuery, KarmaRankingResponse},
};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/rankings/karma",
    params(KarmaRankingQuery),
    responses(
        (status = 200, description = "Karma ranking, from the snapshot when available", body = KarmaRankingResponse),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "rankings"
)]
pub async fn get_karma_ranking(
    State(db): State<Database>,
    Query(query): Query<KarmaRankingQuery>,
) -> Result<Response, WebError> {
    query.validate().map_err(WebError::BadRequest)?;

    let ranking = services::load_ranking(db.pool()).await;
    let response = services::present(ranking, query.loads);

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/rankings/karma/live",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Karma ranking recomputed from stories, votes and comments", body = KarmaRanking),
        (status = 401, description = "Unauthorized")
    ),
    tag = "rankings"
)]
pub async fn get_live_karma_ranking(State(db): State<Database>) -> Result<Response, WebError> {
    let ranking = services::load_live_ranking(db.pool()).await?;

    Ok(Json(ranking).into_response())
}

#[utoipa::path(
    get,
    path = "/api/rankings/karma/users/{user_id}",
    params(
        ("user_id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Karma of a single user", body = KarmaRankingEntry),
        (status = 404, description = "User is not ranked")
    ),
    tag = "rankings"
)]
pub async fn get_user_karma(
    State(db): State<Database>,
    Path(user_id): Path<String>,
) -> Result<Response, WebError> {
    let entry = services::find_user_entry(db.pool(), &user_id)
        .await
        .ok_or(WebError::NotFound)?;

    Ok(Json(entry).into_response())
}
