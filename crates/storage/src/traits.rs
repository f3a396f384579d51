use std::collections::HashSet;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{CachedRanking, Contest, RankingMetadata};
use crate::services::karma::KarmaEvents;

/// Read access to the community activity karma is computed from.
#[async_trait]
pub trait KarmaEventSource: Send + Sync {
    async fn load_events(&self) -> Result<KarmaEvents>;
}

/// Read access to the precomputed ranking snapshot.
#[async_trait]
pub trait RankingCache: Send + Sync {
    /// Snapshot rows ordered by position.
    async fn cached_rows(&self) -> Result<Vec<CachedRanking>>;

    /// Most recent snapshot refresh performed by an admin.
    async fn last_admin_update(&self) -> Result<Option<RankingMetadata>>;
}

#[async_trait]
pub trait SupporterBadges: Send + Sync {
    /// Subset of `user_ids` holding the supporter badge.
    async fn supporters(&self, user_ids: &[Uuid]) -> Result<HashSet<Uuid>>;
}

#[async_trait]
pub trait ContestLookup: Send + Sync {
    /// `StorageError::NotFound` when no contest has this id.
    async fn find_contest(&self, id: Uuid) -> Result<Contest>;
}
