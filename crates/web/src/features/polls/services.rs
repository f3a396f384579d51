use sqlx::PgPool;
use storage::{
    dto::poll::{ConvertPollRequest, CreatePollRequest, PollConversionResponse, PollDetailResponse},
    error::Result,
    models::Poll,
    services::poll_conversion,
};
use uuid::Uuid;

/// Create a poll with its options
pub async fn create_poll(pool: &PgPool, request: &CreatePollRequest) -> Result<PollDetailResponse> {
    poll_conversion::create_poll(pool, request).await
}

/// Get a poll with its options
pub async fn get_poll(pool: &PgPool, poll_id: Uuid) -> Result<PollDetailResponse> {
    poll_conversion::get_poll(pool, poll_id).await
}

/// Close an active poll
pub async fn close_poll(pool: &PgPool, poll_id: Uuid) -> Result<Poll> {
    poll_conversion::close_poll(pool, poll_id).await
}

/// Convert a closed poll into a contest
pub async fn convert_poll(
    pool: &PgPool,
    poll_id: Uuid,
    request: &ConvertPollRequest,
) -> Result<PollConversionResponse> {
    poll_conversion::convert_poll(pool, poll_id, request).await
}
