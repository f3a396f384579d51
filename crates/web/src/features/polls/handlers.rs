use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::poll::{ConvertPollRequest, CreatePollRequest, PollConversionResponse, PollDetailResponse},
    models::Poll,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/admin/polls",
    request_body = CreatePollRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Poll created successfully", body = PollDetailResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "polls"
)]
pub async fn create_poll(
    State(db): State<Database>,
    Json(req): Json<CreatePollRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let poll = services::create_poll(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(poll)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/admin/polls/{poll_id}",
    params(
        ("poll_id" = Uuid, Path, description = "Poll ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Poll with its options", body = PollDetailResponse),
        (status = 404, description = "Poll not found")
    ),
    tag = "polls"
)]
pub async fn get_poll(
    State(db): State<Database>,
    Path(poll_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let poll = services::get_poll(db.pool(), poll_id).await?;

    Ok(Json(poll).into_response())
}

#[utoipa::path(
    post,
    path = "/api/admin/polls/{poll_id}/close",
    params(
        ("poll_id" = Uuid, Path, description = "Poll ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Poll closed", body = Poll),
        (status = 404, description = "Poll not found"),
        (status = 409, description = "Poll is not active")
    ),
    tag = "polls"
)]
pub async fn close_poll(
    State(db): State<Database>,
    Path(poll_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let poll = services::close_poll(db.pool(), poll_id).await?;

    Ok(Json(poll).into_response())
}

#[utoipa::path(
    post,
    path = "/api/admin/polls/{poll_id}/convert",
    params(
        ("poll_id" = Uuid, Path, description = "Poll ID")
    ),
    request_body = ConvertPollRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Contest created from the winning option", body = PollConversionResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Poll not found"),
        (status = 409, description = "Poll is not closed or was already converted")
    ),
    tag = "polls"
)]
pub async fn convert_poll(
    State(db): State<Database>,
    Path(poll_id): Path<Uuid>,
    Json(req): Json<ConvertPollRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    req.validate_schedule()
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    let converted = services::convert_poll(db.pool(), poll_id, &req).await?;

    Ok((StatusCode::CREATED, Json(converted)).into_response())
}
