use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::poll::CreatePollRequest;
use crate::error::{Result, StorageError};
use crate::models::{Poll, PollOption, PollStatus};

const POLL_COLUMNS: &str =
    "id, title, description, status, voting_deadline, converted_contest_id, created_at";
const OPTION_COLUMNS: &str =
    "id, poll_id, option_title, option_description, vote_count, display_order, created_at";

/// Repository for Poll database operations
pub struct PollRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PollRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Poll> {
        let poll = sqlx::query_as::<_, Poll>(&format!(
            "SELECT {POLL_COLUMNS} FROM polls WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(poll)
    }

    /// Options of a poll in display order
    pub async fn options(&self, poll_id: Uuid) -> Result<Vec<PollOption>> {
        let options = sqlx::query_as::<_, PollOption>(&format!(
            "SELECT {OPTION_COLUMNS} FROM poll_options WHERE poll_id = $1 \
             ORDER BY display_order ASC, created_at ASC"
        ))
        .bind(poll_id)
        .fetch_all(self.pool)
        .await?;

        Ok(options)
    }

    /// Insert a poll and all of its options atomically
    pub async fn create(&self, req: &CreatePollRequest) -> Result<(Poll, Vec<PollOption>)> {
        let mut tx = self.pool.begin().await?;

        let poll = sqlx::query_as::<_, Poll>(&format!(
            r#"
            INSERT INTO polls (title, description, status, voting_deadline)
            VALUES ($1, $2, $3, $4)
            RETURNING {POLL_COLUMNS}
            "#
        ))
        .bind(req.title.trim())
        .bind(&req.description)
        .bind(PollStatus::Active.as_str())
        .bind(req.voting_deadline)
        .fetch_one(&mut *tx)
        .await?;

        let mut options = Vec::with_capacity(req.options.len());
        for (order, option) in req.options.iter().enumerate() {
            let inserted = sqlx::query_as::<_, PollOption>(&format!(
                r#"
                INSERT INTO poll_options (poll_id, option_title, option_description, display_order)
                VALUES ($1, $2, $3, $4)
                RETURNING {OPTION_COLUMNS}
                "#
            ))
            .bind(poll.id)
            .bind(option.title.trim())
            .bind(&option.description)
            .bind(order as i32)
            .fetch_one(&mut *tx)
            .await?;
            options.push(inserted);
        }

        tx.commit().await?;

        Ok((poll, options))
    }

    /// Move an active poll to closed
    pub async fn close(&self, id: Uuid) -> Result<Poll> {
        let closed = sqlx::query_as::<_, Poll>(&format!(
            r#"
            UPDATE polls SET status = $2
            WHERE id = $1 AND status = $3
            RETURNING {POLL_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(PollStatus::Closed.as_str())
        .bind(PollStatus::Active.as_str())
        .fetch_optional(self.pool)
        .await?;

        match closed {
            Some(poll) => Ok(poll),
            None => {
                let existing = self.find_by_id(id).await?;
                Err(StorageError::InvalidState(format!(
                    "Only active polls can be closed (poll is {})",
                    existing.status.as_str()
                )))
            }
        }
    }

    /// Link a closed poll to the contest created from it, inside the
    /// caller's transaction. Fails when the poll is no longer closed.
    pub async fn mark_converted(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        poll_id: Uuid,
        contest_id: Uuid,
    ) -> Result<Poll> {
        sqlx::query_as::<_, Poll>(&format!(
            r#"
            UPDATE polls SET status = $2, converted_contest_id = $3
            WHERE id = $1 AND status = $4
            RETURNING {POLL_COLUMNS}
            "#
        ))
        .bind(poll_id)
        .bind(PollStatus::Converted.as_str())
        .bind(contest_id)
        .bind(PollStatus::Closed.as_str())
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| {
            StorageError::InvalidState("Poll was modified during conversion".to_string())
        })
    }
}
