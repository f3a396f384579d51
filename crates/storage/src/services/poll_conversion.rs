use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::poll::{
    ConvertPollRequest, CreatePollRequest, PollConversionResponse, PollDetailResponse,
};
use crate::error::{Result, StorageError};
use crate::models::{Poll, PollOption, PollStatus};
use crate::repository::contest::{ContestRepository, NewContest};
use crate::repository::poll::PollRepository;
use crate::services::audit;

/// Most voted option. Ties go to the option listed first, then the oldest.
pub fn select_winning_option(options: &[PollOption]) -> Option<&PollOption> {
    options.iter().min_by(|a, b| {
        b.vote_count
            .cmp(&a.vote_count)
            .then_with(|| a.display_order.cmp(&b.display_order))
            .then_with(|| a.created_at.cmp(&b.created_at))
    })
}

/// Checks that `poll` can become a contest and returns its winning option.
pub fn ensure_convertible<'a>(poll: &Poll, options: &'a [PollOption]) -> Result<&'a PollOption> {
    match poll.status {
        PollStatus::Closed => {}
        PollStatus::Converted => {
            return Err(StorageError::InvalidState(
                "Poll was already converted into a contest".to_string(),
            ));
        }
        _ => {
            return Err(StorageError::InvalidState(
                "Poll must be closed before conversion".to_string(),
            ));
        }
    }

    select_winning_option(options)
        .ok_or_else(|| StorageError::InvalidState("Poll has no options".to_string()))
}

pub async fn create_poll(pool: &PgPool, req: &CreatePollRequest) -> Result<PollDetailResponse> {
    let repo = PollRepository::new(pool);
    let (poll, options) = repo.create(req).await?;

    tracing::info!("Created poll '{}' with {} options", poll.title, options.len());

    audit::record_best_effort(
        pool,
        "poll_created",
        Some(poll.id),
        serde_json::json!({ "title": poll.title, "options": options.len() }),
    )
    .await;

    Ok(PollDetailResponse { poll, options })
}

pub async fn get_poll(pool: &PgPool, poll_id: Uuid) -> Result<PollDetailResponse> {
    let repo = PollRepository::new(pool);
    let poll = repo.find_by_id(poll_id).await?;
    let options = repo.options(poll_id).await?;

    Ok(PollDetailResponse { poll, options })
}

pub async fn close_poll(pool: &PgPool, poll_id: Uuid) -> Result<Poll> {
    let repo = PollRepository::new(pool);
    let poll = repo.close(poll_id).await?;

    audit::record_best_effort(pool, "poll_closed", Some(poll.id), serde_json::json!({})).await;

    Ok(poll)
}

/// Turns a closed poll's winning option into a new contest.
///
/// The contest insert and the poll status change commit together; if either
/// fails nothing is persisted.
pub async fn convert_poll(
    pool: &PgPool,
    poll_id: Uuid,
    req: &ConvertPollRequest,
) -> Result<PollConversionResponse> {
    let repo = PollRepository::new(pool);
    let poll = repo.find_by_id(poll_id).await?;
    let options = repo.options(poll_id).await?;
    let winner = ensure_convertible(&poll, &options)?.clone();

    let new_contest = NewContest {
        title: winner.option_title.trim().to_string(),
        description: winner
            .option_description
            .clone()
            .or_else(|| poll.description.clone()),
        category: req.category.clone(),
        month: req.month.clone(),
        min_words: req.min_words,
        max_words: req.max_words,
        submission_deadline: req.submission_deadline,
        voting_deadline: req.voting_deadline,
    };

    let mut tx = pool.begin().await?;
    let contest = ContestRepository::create_in(&mut tx, &new_contest).await?;
    PollRepository::mark_converted(&mut tx, poll.id, contest.id).await?;
    tx.commit().await?;

    tracing::info!(
        "Converted poll '{}' into contest '{}' ({} votes)",
        poll.title,
        contest.title,
        winner.vote_count
    );

    audit::record_best_effort(
        pool,
        "poll_converted",
        Some(poll.id),
        serde_json::json!({
            "contest_id": contest.id,
            "winning_option_id": winner.id,
            "votes": winner.vote_count,
        }),
    )
    .await;

    Ok(PollConversionResponse {
        poll_id: poll.id,
        winning_option: winner,
        contest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn option(title: &str, votes: i32, order: i32, minutes: i64) -> PollOption {
        PollOption {
            id: Uuid::new_v4(),
            poll_id: Uuid::nil(),
            option_title: title.to_string(),
            option_description: None,
            vote_count: votes,
            display_order: order,
            created_at: Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap()
                + Duration::minutes(minutes),
        }
    }

    #[test]
    fn test_most_votes_wins() {
        let options = vec![
            option("Viajes", 3, 0, 0),
            option("Sueños", 9, 1, 0),
            option("Mar", 4, 2, 0),
        ];
        assert_eq!(select_winning_option(&options).unwrap().option_title, "Sueños");
    }

    #[test]
    fn test_tie_goes_to_first_listed() {
        let options = vec![
            option("Mar", 5, 2, 0),
            option("Viajes", 5, 0, 10),
            option("Sueños", 1, 1, 0),
        ];
        assert_eq!(select_winning_option(&options).unwrap().option_title, "Viajes");
    }

    #[test]
    fn test_tie_on_order_goes_to_oldest() {
        let options = vec![option("Nuevo", 2, 0, 30), option("Antiguo", 2, 0, 5)];
        assert_eq!(select_winning_option(&options).unwrap().option_title, "Antiguo");
    }

    fn poll(status: PollStatus) -> Poll {
        Poll {
            id: Uuid::new_v4(),
            title: "Tema de agosto".to_string(),
            description: None,
            status,
            voting_deadline: None,
            converted_contest_id: None,
            created_at: Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    fn rejection(result: Result<&PollOption>) -> String {
        match result {
            Err(StorageError::InvalidState(msg)) => msg,
            other => panic!("expected InvalidState, got {other:?}"),
        }
    }

    #[test]
    fn test_closed_poll_converts_to_winner() {
        let options = vec![option("Viajes", 3, 0, 0), option("Sueños", 7, 1, 0)];
        let winner = ensure_convertible(&poll(PollStatus::Closed), &options).unwrap();
        assert_eq!(winner.option_title, "Sueños");
    }

    #[test]
    fn test_active_poll_is_rejected() {
        let options = vec![option("Viajes", 3, 0, 0)];
        let msg = rejection(ensure_convertible(&poll(PollStatus::Active), &options));
        assert!(msg.contains("closed"));
    }

    #[test]
    fn test_converted_poll_is_rejected() {
        let options = vec![option("Viajes", 3, 0, 0)];
        let msg = rejection(ensure_convertible(&poll(PollStatus::Converted), &options));
        assert!(msg.contains("already converted"));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let options = vec![option("Viajes", 3, 0, 0)];
        assert!(ensure_convertible(&poll(PollStatus::Unknown), &options).is_err());
    }

    #[test]
    fn test_closed_poll_without_options_is_rejected() {
        let msg = rejection(ensure_convertible(&poll(PollStatus::Closed), &[]));
        assert!(msg.contains("no options"));
    }

    #[test]
    fn test_no_options_no_winner() {
        assert!(select_winning_option(&[]).is_none());
    }
}
