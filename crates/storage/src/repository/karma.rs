use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::Result;
use crate::models::{Comment, Contest, Story, Vote};
use crate::repository::contest::CONTEST_COLUMNS;
use crate::services::fallback::{Resolver, ResolverChain};
use crate::services::karma::KarmaEvents;
use crate::traits::KarmaEventSource;

/// Reads every event table the karma calculator needs.
pub struct KarmaRepository {
    pool: PgPool,
    votes: ResolverChain<(), Vec<Vote>>,
}

impl KarmaRepository {
    pub fn new(pool: PgPool) -> Self {
        let votes = ResolverChain::new()
            .with(VotesViaRpc { pool: pool.clone() })
            .with(VotesDirect { pool: pool.clone() });

        Self { pool, votes }
    }

    pub async fn published_stories(&self) -> Result<Vec<Story>> {
        let stories = sqlx::query_as::<_, Story>(
            r#"
            SELECT id, user_id, likes_count, contest_id, published_at
            FROM stories
            WHERE published_at IS NOT NULL
            ORDER BY published_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(stories)
    }

    pub async fn comments(&self) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT user_id, story_id, created_at
            FROM comments
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    pub async fn contests(&self) -> Result<Vec<Contest>> {
        let contests = sqlx::query_as::<_, Contest>(&format!(
            "SELECT {CONTEST_COLUMNS} FROM contests ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(contests)
    }

    /// Votes are readable through an RPC or, depending on row-level
    /// security, the table itself. When neither works karma is computed
    /// without votes.
    pub async fn votes(&self) -> Vec<Vote> {
        match self.votes.resolve(&()).await {
            Some(votes) => votes,
            None => {
                tracing::warn!("Votes are not readable, computing karma without them");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl KarmaEventSource for KarmaRepository {
    async fn load_events(&self) -> Result<KarmaEvents> {
        let votes = self.votes().await;
        let comments = self.comments().await?;
        let stories = self.published_stories().await?;
        let contests = self.contests().await?;

        tracing::debug!(
            votes = votes.len(),
            comments = comments.len(),
            stories = stories.len(),
            contests = contests.len(),
            "Loaded karma events"
        );

        Ok(KarmaEvents {
            stories,
            votes,
            comments,
            contests,
        })
    }
}

struct VotesViaRpc {
    pool: PgPool,
}

#[async_trait]
impl Resolver<(), Vec<Vote>> for VotesViaRpc {
    fn name(&self) -> &'static str {
        "get_all_votes_for_karma"
    }

    async fn resolve(&self, _key: &()) -> Result<Option<Vec<Vote>>> {
        let votes = sqlx::query_as::<_, Vote>(
            "SELECT user_id, created_at FROM get_all_votes_for_karma()",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(votes))
    }
}

struct VotesDirect {
    pool: PgPool,
}

#[async_trait]
impl Resolver<(), Vec<Vote>> for VotesDirect {
    fn name(&self) -> &'static str {
        "votes"
    }

    async fn resolve(&self, _key: &()) -> Result<Option<Vec<Vote>>> {
        let votes = sqlx::query_as::<_, Vote>("SELECT user_id, created_at FROM votes")
            .fetch_all(&self.pool)
            .await?;

        Ok(Some(votes))
    }
}
