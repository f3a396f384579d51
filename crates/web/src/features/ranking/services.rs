use chrono::Utc;
use sqlx::PgPool;
use storage::{
    dto::ranking::{KarmaRanking, KarmaRankingEntry, KarmaRankingResponse},
    error::Result,
    services::{presenter::RankingView, ranking::KarmaRankingService},
};

/// Karma ranking from the snapshot, or computed live. Never fails.
pub async fn load_ranking(pool: &PgPool) -> KarmaRanking {
    KarmaRankingService::for_pool(pool).load(Utc::now()).await
}

/// Karma ranking recomputed from the event tables.
pub async fn load_live_ranking(pool: &PgPool) -> Result<KarmaRanking> {
    KarmaRankingService::for_pool(pool).load_live(Utc::now()).await
}

/// One user's entry, if they are ranked.
pub async fn find_user_entry(pool: &PgPool, user_id: &str) -> Option<KarmaRankingEntry> {
    find_entry(load_ranking(pool).await, user_id)
}

fn find_entry(ranking: KarmaRanking, user_id: &str) -> Option<KarmaRankingEntry> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return None;
    }

    ranking
        .entries
        .into_iter()
        .find(|entry| entry.user_id.eq_ignore_ascii_case(user_id))
}

/// Visible slice of the ranking after `loads` "load more" steps.
pub fn present(ranking: KarmaRanking, loads: u32) -> KarmaRankingResponse {
    let mut view = RankingView::new(ranking.entries);
    for _ in 0..loads {
        if !view.can_load_more() {
            break;
        }
        view = view.load_more();
    }

    let total_users = view.total();
    let has_more = view.can_load_more();
    let can_show_less = view.can_show_less();
    let data = view.into_visible();

    KarmaRankingResponse {
        shown: data.len(),
        data,
        total_users,
        has_more,
        can_show_less,
        source: ranking.source,
        last_updated: ranking.last_updated,
    }
}
