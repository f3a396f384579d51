use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mailer::{DispatchOutcome, EmailRequest, Mailer};
use storage::Database;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/admin/emails/send",
    request_body = EmailRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Emails sent", body = DispatchOutcome),
        (status = 400, description = "Invalid email request"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Sending failed", body = DispatchOutcome)
    ),
    tag = "emails"
)]
pub async fn send_email(
    State(db): State<Database>,
    State(mailer): State<Arc<Mailer>>,
    Json(req): Json<EmailRequest>,
) -> Result<Response, WebError> {
    req.validate()
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    let outcome = services::send_email(db.pool(), &mailer, &req).await;

    let status = if outcome.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    Ok((status, Json(outcome)).into_response())
}
