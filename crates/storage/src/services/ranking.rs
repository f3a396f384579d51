use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::ranking::{KarmaRanking, KarmaRankingEntry, RankingSource};
use crate::error::Result;
use crate::models::{ANONYMOUS_AUTHOR, CachedRanking, KARMA_POINTS, KarmaPoints};
use crate::repository::badge::BadgeRepository;
use crate::repository::karma::KarmaRepository;
use crate::repository::profile::{DisplayNames, display_name_chain};
use crate::repository::ranking_cache::RankingCacheRepository;
use crate::services::karma::{KarmaAggregate, compute_karma};
use crate::traits::{KarmaEventSource, RankingCache, SupporterBadges};

/// Ids that external writers use in place of a missing user.
fn is_placeholder_id(id: &str) -> bool {
    let id = id.trim();
    id.is_empty() || id.eq_ignore_ascii_case("null") || id.eq_ignore_ascii_case("undefined")
}

/// Turns raw ranking ids into ids safe to send to the badge query.
pub fn badge_candidates<'a>(ids: impl IntoIterator<Item = &'a str>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| !is_placeholder_id(id))
        .filter_map(|id| Uuid::parse_str(id.trim()).ok())
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Loads the karma ranking, preferring the precomputed snapshot.
pub struct KarmaRankingService {
    events: Arc<dyn KarmaEventSource>,
    cache: Arc<dyn RankingCache>,
    badges: Arc<dyn SupporterBadges>,
    names: Arc<DisplayNames>,
    points: KarmaPoints,
}

impl KarmaRankingService {
    pub fn new(
        events: Arc<dyn KarmaEventSource>,
        cache: Arc<dyn RankingCache>,
        badges: Arc<dyn SupporterBadges>,
        names: Arc<DisplayNames>,
    ) -> Self {
        Self {
            events,
            cache,
            badges,
            names,
            points: KARMA_POINTS,
        }
    }

    pub fn for_pool(pool: &PgPool) -> Self {
        Self::new(
            Arc::new(KarmaRepository::new(pool.clone())),
            Arc::new(RankingCacheRepository::new(pool.clone())),
            Arc::new(BadgeRepository::new(pool.clone())),
            Arc::new(display_name_chain(pool)),
        )
    }

    /// Snapshot first, live computation when the snapshot is empty or failing.
    ///
    /// Never fails: when both paths error the ranking comes back empty with
    /// [`RankingSource::Unavailable`].
    pub async fn load(&self, now: DateTime<Utc>) -> KarmaRanking {
        match self.load_cached().await {
            Ok(Some(ranking)) => return ranking,
            Ok(None) => tracing::info!("Ranking cache is empty, computing karma live"),
            Err(e) => tracing::warn!("Ranking cache unavailable, computing karma live: {}", e),
        }

        match self.load_live(now).await {
            Ok(ranking) => ranking,
            Err(e) => {
                tracing::error!("Live karma computation failed, serving empty ranking: {:?}", e);
                KarmaRanking::unavailable()
            }
        }
    }

    async fn load_cached(&self) -> Result<Option<KarmaRanking>> {
        let rows = self.cache.cached_rows().await?;
        if rows.is_empty() {
            return Ok(None);
        }

        let last_updated = match self.cache.last_admin_update().await {
            Ok(meta) => meta.map(|m| m.last_updated),
            Err(e) => {
                tracing::warn!("Could not read ranking metadata: {}", e);
                None
            }
        };

        let candidates = badge_candidates(rows.iter().filter_map(|r| r.user_id.as_deref()));
        let supporters = self.supporters(&candidates).await;

        let unnamed = badge_candidates(
            rows.iter()
                .filter(|r| stored_name(r).is_none())
                .filter_map(|r| r.user_id.as_deref()),
        );
        let names = self.display_names(&unnamed).await;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let author = cached_author(&row, &names);
            let is_kofi_supporter = row
                .user_id
                .as_deref()
                .and_then(|id| Uuid::parse_str(id.trim()).ok())
                .is_some_and(|id| supporters.contains(&id));

            entries.push(KarmaRankingEntry {
                position: i64::from(row.position),
                user_id: row.user_id.unwrap_or_default(),
                author,
                total_karma: i64::from(row.total_karma),
                monthly_karma: 0,
                total_stories: i64::from(row.total_stories),
                contest_wins: i64::from(row.contest_wins),
                votes_given: i64::from(row.votes_given),
                comments_given: i64::from(row.comments_given),
                comments_received: i64::from(row.comments_received),
                is_kofi_supporter,
            });
        }

        tracing::debug!("Serving {} cached ranking entries", entries.len());

        Ok(Some(KarmaRanking {
            entries,
            source: RankingSource::Cache,
            last_updated,
        }))
    }

    /// Recomputes the ranking from the event tables, skipping the snapshot.
    pub async fn load_live(&self, now: DateTime<Utc>) -> Result<KarmaRanking> {
        let events = self.events.load_events().await?;
        let aggregates = compute_karma(&events, &self.points, now);

        let ids: Vec<Uuid> = aggregates.iter().map(|a| a.user_id).collect();
        let supporters = self.supporters(&ids).await;
        let names = self.display_names(&ids).await;

        let entries: Vec<KarmaRankingEntry> = aggregates
            .into_iter()
            .enumerate()
            .map(|(index, aggregate)| {
                let author = author_name(&names, &aggregate.user_id);
                let is_kofi_supporter = supporters.contains(&aggregate.user_id);
                live_entry(index, aggregate, author, is_kofi_supporter)
            })
            .collect();

        tracing::debug!("Computed live karma for {} users", entries.len());

        Ok(KarmaRanking {
            entries,
            source: RankingSource::Live,
            last_updated: Some(now),
        })
    }

    /// Badge flags are decoration; a failed lookup just leaves them off.
    async fn supporters(&self, ids: &[Uuid]) -> HashSet<Uuid> {
        if ids.is_empty() {
            return HashSet::new();
        }

        match self.badges.supporters(ids).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("Supporter badge lookup failed: {}", e);
                HashSet::new()
            }
        }
    }

    /// One lookup for every id; missing names are left to the caller.
    async fn display_names(&self, ids: &[Uuid]) -> HashMap<Uuid, String> {
        if ids.is_empty() {
            return HashMap::new();
        }

        self.names.resolve(ids).await.unwrap_or_else(|| {
            tracing::warn!("No display name source was readable for {} users", ids.len());
            HashMap::new()
        })
    }
}

fn author_name(names: &HashMap<Uuid, String>, user_id: &Uuid) -> String {
    names
        .get(user_id)
        .cloned()
        .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string())
}

fn stored_name(row: &CachedRanking) -> Option<&str> {
    row.user_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

fn cached_author(row: &CachedRanking, names: &HashMap<Uuid, String>) -> String {
    if let Some(name) = stored_name(row) {
        return name.to_string();
    }

    match row
        .user_id
        .as_deref()
        .filter(|id| !is_placeholder_id(id))
        .and_then(|id| Uuid::parse_str(id.trim()).ok())
    {
        Some(id) => author_name(names, &id),
        None => ANONYMOUS_AUTHOR.to_string(),
    }
}

fn live_entry(
    index: usize,
    aggregate: KarmaAggregate,
    author: String,
    is_kofi_supporter: bool,
) -> KarmaRankingEntry {
    KarmaRankingEntry {
        position: index as i64 + 1,
        user_id: aggregate.user_id.to_string(),
        author,
        total_karma: aggregate.total_karma,
        monthly_karma: aggregate.monthly_karma,
        total_stories: aggregate.total_stories,
        contest_wins: aggregate.contest_wins,
        votes_given: aggregate.votes_given,
        comments_given: aggregate.comments_given,
        comments_received: aggregate.comments_received,
        is_kofi_supporter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::models::{Comment, RankingMetadata, Story, Vote};
    use crate::services::fallback::{Resolver, ResolverChain};
    use crate::services::karma::KarmaEvents;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap()
    }

    #[derive(Default)]
    struct MockEvents {
        events: KarmaEvents,
        fail: bool,
        calls: AtomicU32,
    }

    #[async_trait]
    impl KarmaEventSource for MockEvents {
        async fn load_events(&self) -> Result<KarmaEvents> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StorageError::InvalidState("network down".to_string()));
            }
            Ok(self.events.clone())
        }
    }

    #[derive(Default)]
    struct MockCache {
        rows: Vec<CachedRanking>,
        fail: bool,
    }

    #[async_trait]
    impl RankingCache for MockCache {
        async fn cached_rows(&self) -> Result<Vec<CachedRanking>> {
            if self.fail {
                return Err(StorageError::InvalidState("permission denied".to_string()));
            }
            Ok(self.rows.clone())
        }

        async fn last_admin_update(&self) -> Result<Option<RankingMetadata>> {
            Ok(Some(RankingMetadata {
                last_updated: Utc.with_ymd_and_hms(2026, 5, 31, 23, 0, 0).unwrap(),
                contest_period: Some("Mayo 2026".to_string()),
                total_users: self.rows.len() as i32,
                updated_by_admin: true,
            }))
        }
    }

    #[derive(Default)]
    struct MockBadges {
        supporters: HashSet<Uuid>,
        received: Mutex<Vec<Uuid>>,
    }

    #[async_trait]
    impl SupporterBadges for MockBadges {
        async fn supporters(&self, user_ids: &[Uuid]) -> Result<HashSet<Uuid>> {
            self.received
                .lock()
                .unwrap()
                .extend(user_ids.iter().copied());
            Ok(user_ids
                .iter()
                .filter(|id| self.supporters.contains(id))
                .copied()
                .collect())
        }
    }

    struct NamedAs {
        name: &'static str,
        calls: AtomicU32,
    }

    fn named_as(name: &'static str) -> NamedAs {
        NamedAs {
            name,
            calls: AtomicU32::new(0),
        }
    }

    #[async_trait]
    impl Resolver<[Uuid], HashMap<Uuid, String>> for Arc<NamedAs> {
        fn name(&self) -> &'static str {
            "named"
        }

        async fn resolve(&self, user_ids: &[Uuid]) -> Result<Option<HashMap<Uuid, String>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(
                user_ids
                    .iter()
                    .map(|id| (*id, self.name.to_string()))
                    .collect(),
            ))
        }
    }

    fn cached_row(user_id: Option<&str>, position: i32) -> CachedRanking {
        CachedRanking {
            user_id: user_id.map(str::to_string),
            user_name: Some(format!("Autora {position}")),
            position,
            total_karma: 100 - position,
            total_stories: 1,
            contest_wins: 0,
            votes_given: 0,
            comments_given: 0,
            comments_received: 0,
        }
    }

    fn sample_events() -> KarmaEvents {
        let writer = Uuid::from_u128(10);
        let reader = Uuid::from_u128(20);
        let story = Story {
            id: Uuid::from_u128(99),
            user_id: writer,
            likes_count: 0,
            contest_id: None,
            published_at: now(),
        };
        KarmaEvents {
            votes: vec![Vote {
                user_id: reader,
                created_at: now(),
            }],
            comments: vec![Comment {
                user_id: reader,
                story_id: story.id,
                created_at: now(),
            }],
            stories: vec![story],
            contests: vec![],
        }
    }

    fn service(
        events: Arc<MockEvents>,
        cache: MockCache,
        badges: Arc<MockBadges>,
        names: DisplayNames,
    ) -> KarmaRankingService {
        KarmaRankingService::new(events, Arc::new(cache), badges, Arc::new(names))
    }

    #[tokio::test]
    async fn test_cache_hit_skips_live_computation() {
        let events = Arc::new(MockEvents {
            events: sample_events(),
            ..Default::default()
        });
        let cache = MockCache {
            rows: vec![cached_row(Some(&Uuid::from_u128(1).to_string()), 1)],
            ..Default::default()
        };
        let svc = service(
            events.clone(),
            cache,
            Arc::new(MockBadges::default()),
            ResolverChain::new(),
        );

        let ranking = svc.load(now()).await;

        assert_eq!(events.calls.load(Ordering::SeqCst), 0);
        assert_eq!(ranking.source, RankingSource::Cache);
        assert_eq!(ranking.entries.len(), 1);
        assert_eq!(ranking.entries[0].author, "Autora 1");
        assert!(ranking.last_updated.is_some());
    }

    #[tokio::test]
    async fn test_empty_cache_computes_live_once() {
        let events = Arc::new(MockEvents {
            events: sample_events(),
            ..Default::default()
        });
        let svc = service(
            events.clone(),
            MockCache::default(),
            Arc::new(MockBadges::default()),
            ResolverChain::new().with(Arc::new(named_as("Marta"))),
        );

        let ranking = svc.load(now()).await;

        assert_eq!(events.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ranking.source, RankingSource::Live);
        assert_eq!(ranking.entries.len(), 2);
        assert_eq!(ranking.entries[0].total_karma, 15 + 3);
        assert_eq!(ranking.entries[0].position, 1);
        assert_eq!(ranking.entries[1].total_karma, 1 + 2);
        assert_eq!(ranking.entries[1].author, "Marta");
    }

    #[tokio::test]
    async fn test_cache_error_falls_back_to_live() {
        let events = Arc::new(MockEvents {
            events: sample_events(),
            ..Default::default()
        });
        let cache = MockCache {
            fail: true,
            ..Default::default()
        };
        let svc = service(
            events.clone(),
            cache,
            Arc::new(MockBadges::default()),
            ResolverChain::new(),
        );

        let ranking = svc.load(now()).await;
        assert_eq!(events.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ranking.source, RankingSource::Live);
    }

    #[tokio::test]
    async fn test_both_paths_failing_degrade_to_empty() {
        let events = Arc::new(MockEvents {
            fail: true,
            ..Default::default()
        });
        let cache = MockCache {
            fail: true,
            ..Default::default()
        };
        let svc = service(
            events,
            cache,
            Arc::new(MockBadges::default()),
            ResolverChain::new(),
        );

        let ranking = svc.load(now()).await;
        assert!(ranking.entries.is_empty());
        assert_eq!(ranking.source, RankingSource::Unavailable);
    }

    #[tokio::test]
    async fn test_badge_lookup_never_sees_placeholder_ids() {
        let supporter = Uuid::from_u128(7);
        let badges = Arc::new(MockBadges {
            supporters: HashSet::from([supporter]),
            ..Default::default()
        });
        let cache = MockCache {
            rows: vec![
                cached_row(Some(&supporter.to_string()), 1),
                cached_row(Some("null"), 2),
                cached_row(Some("undefined"), 3),
                cached_row(None, 4),
                cached_row(Some(""), 5),
                cached_row(Some("not-a-uuid"), 6),
            ],
            ..Default::default()
        };
        let svc = service(
            Arc::new(MockEvents::default()),
            cache,
            badges.clone(),
            ResolverChain::new(),
        );

        let ranking = svc.load(now()).await;

        let received = badges.received.lock().unwrap().clone();
        assert_eq!(received, vec![supporter]);
        assert_eq!(ranking.entries.len(), 6);
        assert!(ranking.entries[0].is_kofi_supporter);
        assert!(!ranking.entries[1].is_kofi_supporter);
    }

    #[tokio::test]
    async fn test_unresolvable_names_use_anonymous_placeholder() {
        let mut row = cached_row(Some("undefined"), 1);
        row.user_name = None;
        let cache = MockCache {
            rows: vec![row],
            ..Default::default()
        };
        let svc = service(
            Arc::new(MockEvents::default()),
            cache,
            Arc::new(MockBadges::default()),
            ResolverChain::new().with(Arc::new(named_as("nunca"))),
        );

        let ranking = svc.load(now()).await;
        assert_eq!(ranking.entries[0].author, ANONYMOUS_AUTHOR);
    }

    #[tokio::test]
    async fn test_names_resolved_in_one_lookup_per_load() {
        let writer = Uuid::from_u128(1);
        let names = Arc::new(named_as("Lucía"));

        let mut unnamed = cached_row(Some(&writer.to_string()), 1);
        unnamed.user_name = None;
        let mut blank = cached_row(Some(&Uuid::from_u128(2).to_string()), 2);
        blank.user_name = Some("  ".to_string());
        let cache = MockCache {
            rows: vec![unnamed, blank, cached_row(Some(&Uuid::from_u128(3).to_string()), 3)],
            ..Default::default()
        };
        let svc = service(
            Arc::new(MockEvents::default()),
            cache,
            Arc::new(MockBadges::default()),
            ResolverChain::new().with(Arc::clone(&names)),
        );

        let ranking = svc.load(now()).await;
        assert_eq!(names.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ranking.entries[0].author, "Lucía");
        assert_eq!(ranking.entries[1].author, "Lucía");
        assert_eq!(ranking.entries[2].author, "Autora 3");

        let live = svc.load_live(now()).await.unwrap();
        assert!(live.entries.is_empty());
        assert_eq!(names.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_live_ranking_names_every_user_at_once() {
        let names = Arc::new(named_as("Marta"));
        let svc = service(
            Arc::new(MockEvents {
                events: sample_events(),
                ..Default::default()
            }),
            MockCache::default(),
            Arc::new(MockBadges::default()),
            ResolverChain::new().with(Arc::clone(&names)),
        );

        let ranking = svc.load_live(now()).await.unwrap();
        assert_eq!(ranking.entries.len(), 2);
        assert!(ranking.entries.iter().all(|e| e.author == "Marta"));
        assert_eq!(names.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_badge_candidates_dedupe_and_trim() {
        let id = Uuid::from_u128(3).to_string();
        let padded = format!(" {id} ");
        let ids = badge_candidates([id.as_str(), padded.as_str(), "NULL", "Undefined"]);
        assert_eq!(ids, vec![Uuid::from_u128(3)]);
    }
}
