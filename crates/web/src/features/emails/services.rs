use mailer::{DispatchOutcome, EmailRequest, Mailer};
use sqlx::PgPool;
use storage::{
    error::StorageError, models::Contest, repository::contest::ContestRepository,
    services::audit, traits::ContestLookup,
};

/// Looks up the request's contest and dispatches. Every failure, including
/// an unreadable contest, comes back as an unsuccessful outcome.
pub async fn dispatch(
    contests: &dyn ContestLookup,
    mailer: &Mailer,
    request: &EmailRequest,
) -> DispatchOutcome {
    let contest: Option<Contest> = match request.contest_id {
        None => None,
        Some(contest_id) => match contests.find_contest(contest_id).await {
            Ok(contest) => Some(contest),
            // The mailer reports the missing contest itself.
            Err(StorageError::NotFound) => {
                tracing::warn!(%contest_id, "Email requested for unknown contest");
                None
            }
            Err(e) => {
                tracing::error!(%contest_id, "Could not load contest for email: {}", e);
                return DispatchOutcome::failed(e, request.test_mode);
            }
        },
    };

    mailer.dispatch(request, contest.as_ref()).await
}

/// Send a mailing and record it in the admin log when it went out
pub async fn send_email(pool: &PgPool, mailer: &Mailer, request: &EmailRequest) -> DispatchOutcome {
    let outcome = dispatch(&ContestRepository::new(pool), mailer, request).await;

    if outcome.success {
        audit::record_best_effort(
            pool,
            "email_sent",
            request.contest_id,
            serde_json::json!({
                "email_type": request.email_type.as_str(),
                "sent_count": outcome.sent_count,
                "recipients": outcome.recipients,
                "test_mode": outcome.test_mode,
            }),
        )
        .await;
    }

    outcome
}
