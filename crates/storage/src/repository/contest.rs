use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Contest, ContestStatus};
use crate::traits::ContestLookup;

pub(crate) const CONTEST_COLUMNS: &str = "id, title, description, category, month, status, \
    min_words, max_words, submission_deadline, voting_deadline, finalized_at, created_at";

/// Fields of a contest about to be created.
#[derive(Debug, Clone)]
pub struct NewContest {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub month: Option<String>,
    pub min_words: i32,
    pub max_words: i32,
    pub submission_deadline: DateTime<Utc>,
    pub voting_deadline: DateTime<Utc>,
}

/// Repository for Contest database operations
pub struct ContestRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContestRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a contest by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Contest> {
        let contest = sqlx::query_as::<_, Contest>(&format!(
            "SELECT {CONTEST_COLUMNS} FROM contests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(contest)
    }

    /// Create a contest inside the caller's transaction.
    pub async fn create_in(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        contest: &NewContest,
    ) -> Result<Contest> {
        let created = sqlx::query_as::<_, Contest>(&format!(
            r#"
            INSERT INTO contests (
                title, description, category, month, status,
                min_words, max_words, submission_deadline, voting_deadline
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {CONTEST_COLUMNS}
            "#
        ))
        .bind(&contest.title)
        .bind(&contest.description)
        .bind(&contest.category)
        .bind(&contest.month)
        .bind(ContestStatus::Submission.as_str())
        .bind(contest.min_words)
        .bind(contest.max_words)
        .bind(contest.submission_deadline)
        .bind(contest.voting_deadline)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.is_unique_violation() {
                StorageError::ConstraintViolation(
                    "A contest with this title already exists".to_string(),
                )
            } else {
                err
            }
        })?;

        Ok(created)
    }
}

#[async_trait]
impl<'a> ContestLookup for ContestRepository<'a> {
    async fn find_contest(&self, id: Uuid) -> Result<Contest> {
        self.find_by_id(id).await
    }
}
