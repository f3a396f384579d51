use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Comment, Contest, ContestStatus, KarmaPoints, Story, Vote};

/// Raw community activity the karma ranking is derived from.
#[derive(Debug, Clone, Default)]
pub struct KarmaEvents {
    pub stories: Vec<Story>,
    pub votes: Vec<Vote>,
    pub comments: Vec<Comment>,
    pub contests: Vec<Contest>,
}

impl KarmaEvents {
    /// Status of the contest that currently defines the site-wide phase.
    pub fn current_phase(&self, now: DateTime<Utc>) -> Option<ContestStatus> {
        Contest::current(&self.contests, now).map(|c| c.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KarmaAggregate {
    pub user_id: Uuid,
    pub total_karma: i64,
    pub monthly_karma: i64,
    pub total_stories: i64,
    pub contest_wins: i64,
    pub votes_given: i64,
    pub comments_given: i64,
    pub comments_received: i64,
}

impl KarmaAggregate {
    fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            total_karma: 0,
            monthly_karma: 0,
            total_stories: 0,
            contest_wins: 0,
            votes_given: 0,
            comments_given: 0,
            comments_received: 0,
        }
    }
}

#[derive(Default)]
struct Ledger {
    users: HashMap<Uuid, KarmaAggregate>,
}

impl Ledger {
    fn user(&mut self, user_id: Uuid) -> &mut KarmaAggregate {
        self.users
            .entry(user_id)
            .or_insert_with(|| KarmaAggregate::new(user_id))
    }
}

fn same_month(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Placement order inside a finished contest: most likes first, then the
/// earliest submission, then story id.
fn placement_order(a: &Story, b: &Story) -> Ordering {
    b.likes_count
        .cmp(&a.likes_count)
        .then_with(|| a.published_at.cmp(&b.published_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Aggregates every user's karma from the raw events.
///
/// Only users with positive karma are returned, highest first. Equal totals
/// are ordered by user id so that the same input always yields the same list.
pub fn compute_karma(
    events: &KarmaEvents,
    points: &KarmaPoints,
    now: DateTime<Utc>,
) -> Vec<KarmaAggregate> {
    let mut ledger = Ledger::default();

    for vote in &events.votes {
        let voter = ledger.user(vote.user_id);
        voter.votes_given += 1;
        voter.total_karma += i64::from(points.vote_given);
        if same_month(vote.created_at, now) {
            voter.monthly_karma += i64::from(points.vote_given);
        }
    }

    let story_authors: HashMap<Uuid, Uuid> = events
        .stories
        .iter()
        .map(|s| (s.id, s.user_id))
        .collect();

    for comment in &events.comments {
        let commenter = ledger.user(comment.user_id);
        commenter.comments_given += 1;
        commenter.total_karma += i64::from(points.comment_given);

        match story_authors.get(&comment.story_id) {
            Some(&author) if author != comment.user_id => {
                let author = ledger.user(author);
                author.comments_received += 1;
                author.total_karma += i64::from(points.comment_received);
            }
            _ => {}
        }
    }

    let phase = events.current_phase(now);
    let contests: HashMap<Uuid, &Contest> = events.contests.iter().map(|c| (c.id, c)).collect();

    for story in &events.stories {
        let revealed = story
            .contest_id
            .and_then(|id| contests.get(&id))
            .is_some_and(|c| c.likes_revealed(phase));

        let author = ledger.user(story.user_id);
        author.total_stories += 1;
        author.total_karma += i64::from(points.story_published);
        if revealed {
            author.total_karma += i64::from(story.likes_count) * i64::from(points.like_received);
        }
    }

    for contest in events
        .contests
        .iter()
        .filter(|c| c.status == ContestStatus::Results)
    {
        let mut entries: Vec<&Story> = events
            .stories
            .iter()
            .filter(|s| s.contest_id == Some(contest.id))
            .collect();
        entries.sort_by(|a, b| placement_order(a, b));

        for (place, story) in entries.iter().take(3).enumerate() {
            let author = ledger.user(story.user_id);
            if place == 0 {
                author.contest_wins += 1;
                author.total_karma += i64::from(points.contest_win);
            } else {
                author.total_karma += i64::from(points.contest_finalist);
            }
        }
    }

    let mut ranking: Vec<KarmaAggregate> = ledger
        .users
        .into_values()
        .filter(|u| u.total_karma > 0)
        .collect();

    ranking.sort_by(|a, b| {
        b.total_karma
            .cmp(&a.total_karma)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });

    ranking
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KARMA_POINTS;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 20, 12, 0, 0).unwrap()
    }

    fn user(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn contest(status: ContestStatus) -> Contest {
        Contest {
            id: Uuid::new_v4(),
            title: "Relatos de mayo".to_string(),
            description: None,
            category: Some("Ficción".to_string()),
            month: Some("Mayo 2026".to_string()),
            status,
            min_words: 100,
            max_words: 1000,
            submission_deadline: None,
            voting_deadline: Some(now() + Duration::days(3)),
            finalized_at: None,
            created_at: now() - Duration::days(20),
        }
    }

    fn story(author: Uuid, likes: i32, contest_id: Option<Uuid>, minutes: i64) -> Story {
        Story {
            id: Uuid::new_v4(),
            user_id: author,
            likes_count: likes,
            contest_id,
            published_at: now() - Duration::days(10) + Duration::minutes(minutes),
        }
    }

    fn vote(voter: Uuid, at: DateTime<Utc>) -> Vote {
        Vote {
            user_id: voter,
            created_at: at,
        }
    }

    fn comment(commenter: Uuid, story_id: Uuid) -> Comment {
        Comment {
            user_id: commenter,
            story_id,
            created_at: now(),
        }
    }

    fn find(ranking: &[KarmaAggregate], id: Uuid) -> &KarmaAggregate {
        ranking.iter().find(|u| u.user_id == id).unwrap()
    }

    fn scenario() -> (KarmaEvents, Uuid, Uuid) {
        let (a, b, c, d) = (user(1), user(2), user(3), user(4));
        let finished = contest(ContestStatus::Results);
        let winner = story(a, 10, Some(finished.id), 0);
        let winner_id = winner.id;

        let events = KarmaEvents {
            stories: vec![
                winner,
                story(c, 6, Some(finished.id), 1),
                story(d, 3, Some(finished.id), 2),
            ],
            votes: (0..4).map(|_| vote(b, now())).collect(),
            comments: vec![comment(b, winner_id), comment(b, winner_id)],
            contests: vec![finished],
        };

        (events, a, b)
    }

    #[test]
    fn test_reference_scenario() {
        let (events, a, b) = scenario();
        let ranking = compute_karma(&events, &KARMA_POINTS, now());

        // story + likes + win, plus the two comments received. The point
        // table awards comment-received points, so this is 116 and not 110.
        let author = find(&ranking, a);
        assert_eq!(author.total_karma, 15 + 20 + 75 + 6);
        assert_eq!(author.comments_received, 2);
        assert_eq!(author.contest_wins, 1);
        assert_eq!(author.total_stories, 1);

        let reader = find(&ranking, b);
        assert_eq!(reader.total_karma, 8);
        assert_eq!(reader.votes_given, 4);
        assert_eq!(reader.comments_given, 2);
        assert_eq!(reader.total_stories, 0);

        assert_eq!(ranking[0].user_id, a);
    }

    #[test]
    fn test_finalists_get_bonus_without_win() {
        let (events, _, _) = scenario();
        let ranking = compute_karma(&events, &KARMA_POINTS, now());

        let second = find(&ranking, user(3));
        assert_eq!(second.total_karma, 15 + 12 + 30);
        assert_eq!(second.contest_wins, 0);

        let third = find(&ranking, user(4));
        assert_eq!(third.total_karma, 15 + 6 + 30);
    }

    #[test]
    fn test_recomputation_is_idempotent() {
        let (events, _, _) = scenario();
        let first = compute_karma(&events, &KARMA_POINTS, now());
        let second = compute_karma(&events, &KARMA_POINTS, now());
        assert_eq!(first, second);
    }

    #[test]
    fn test_one_more_vote_adds_exactly_one_point() {
        let (mut events, a, b) = scenario();
        let before = compute_karma(&events, &KARMA_POINTS, now());

        events.votes.push(vote(b, now()));
        let after = compute_karma(&events, &KARMA_POINTS, now());

        assert_eq!(find(&after, b).total_karma, find(&before, b).total_karma + 1);
        for previous in &before {
            if previous.user_id != b {
                assert_eq!(find(&after, previous.user_id).total_karma, previous.total_karma);
            }
        }
        assert_eq!(find(&after, a).total_karma, 116);
    }

    #[test]
    fn test_self_comment_is_given_not_received() {
        let a = user(1);
        let own = story(a, 0, None, 0);
        let own_id = own.id;
        let events = KarmaEvents {
            stories: vec![own],
            comments: vec![comment(a, own_id)],
            ..Default::default()
        };

        let ranking = compute_karma(&events, &KARMA_POINTS, now());
        let author = find(&ranking, a);
        assert_eq!(author.comments_given, 1);
        assert_eq!(author.comments_received, 0);
        assert_eq!(author.total_karma, 15 + 2);
    }

    #[test]
    fn test_submission_phase_hides_likes() {
        let a = user(1);
        let open = contest(ContestStatus::Submission);
        let events = KarmaEvents {
            stories: vec![story(a, 500, Some(open.id), 0)],
            contests: vec![open],
            ..Default::default()
        };

        let ranking = compute_karma(&events, &KARMA_POINTS, now());
        assert_eq!(find(&ranking, a).total_karma, 15);
    }

    #[test]
    fn test_voting_likes_count_while_site_is_voting() {
        let a = user(1);
        let voting = contest(ContestStatus::Voting);
        let events = KarmaEvents {
            stories: vec![story(a, 4, Some(voting.id), 0)],
            contests: vec![voting],
            ..Default::default()
        };

        let ranking = compute_karma(&events, &KARMA_POINTS, now());
        assert_eq!(find(&ranking, a).total_karma, 15 + 8);
    }

    #[test]
    fn test_voting_likes_hidden_when_site_phase_differs() {
        let a = user(1);
        let mut stale = contest(ContestStatus::Voting);
        stale.voting_deadline = Some(now() - Duration::days(2));
        let mut next = contest(ContestStatus::Submission);
        next.voting_deadline = Some(now() + Duration::days(20));
        next.created_at = now() - Duration::days(1);
        let events = KarmaEvents {
            stories: vec![story(a, 4, Some(stale.id), 0)],
            contests: vec![stale, next],
            ..Default::default()
        };

        let ranking = compute_karma(&events, &KARMA_POINTS, now());
        assert_eq!(find(&ranking, a).total_karma, 15);
    }

    #[test]
    fn test_unrecognized_contest_does_not_hide_voting_likes() {
        let a = user(1);
        let voting = contest(ContestStatus::Voting);
        let mut archived = contest(ContestStatus::Unknown);
        archived.voting_deadline = Some(now() + Duration::days(1));
        let events = KarmaEvents {
            stories: vec![story(a, 4, Some(voting.id), 0)],
            contests: vec![archived, voting],
            ..Default::default()
        };

        let ranking = compute_karma(&events, &KARMA_POINTS, now());
        assert_eq!(find(&ranking, a).total_karma, 15 + 8);
    }

    #[test]
    fn test_monthly_karma_only_counts_current_month() {
        let b = user(2);
        let events = KarmaEvents {
            votes: vec![
                vote(b, now()),
                vote(b, Utc.with_ymd_and_hms(2026, 4, 30, 23, 59, 0).unwrap()),
                vote(b, Utc.with_ymd_and_hms(2025, 5, 2, 0, 0, 0).unwrap()),
            ],
            ..Default::default()
        };

        let ranking = compute_karma(&events, &KARMA_POINTS, now());
        let voter = find(&ranking, b);
        assert_eq!(voter.total_karma, 3);
        assert_eq!(voter.monthly_karma, 1);
    }

    #[test]
    fn test_tied_likes_favor_earliest_submission() {
        let (early, late) = (user(1), user(2));
        let finished = contest(ContestStatus::Results);
        let events = KarmaEvents {
            stories: vec![
                story(late, 5, Some(finished.id), 30),
                story(early, 5, Some(finished.id), 0),
            ],
            contests: vec![finished],
            ..Default::default()
        };

        let ranking = compute_karma(&events, &KARMA_POINTS, now());
        assert_eq!(find(&ranking, early).contest_wins, 1);
        assert_eq!(find(&ranking, late).contest_wins, 0);
        assert_eq!(ranking[0].user_id, early);
    }

    #[test]
    fn test_users_without_karma_are_dropped() {
        let events = KarmaEvents {
            contests: vec![contest(ContestStatus::Results)],
            ..Default::default()
        };
        assert!(compute_karma(&events, &KARMA_POINTS, now()).is_empty());
    }

    #[test]
    fn test_comment_on_unknown_story_credits_commenter_only() {
        let b = user(2);
        let events = KarmaEvents {
            comments: vec![comment(b, Uuid::new_v4())],
            ..Default::default()
        };

        let ranking = compute_karma(&events, &KARMA_POINTS, now());
        assert_eq!(ranking.len(), 1);
        assert_eq!(find(&ranking, b).total_karma, 2);
    }
}
