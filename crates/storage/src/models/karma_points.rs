use serde::Serialize;
use utoipa::ToSchema;

/// Points awarded per community event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct KarmaPoints {
    pub story_published: i32,
    pub like_received: i32,
    pub comment_received: i32,
    pub comment_given: i32,
    pub contest_win: i32,
    pub contest_finalist: i32,
    pub vote_given: i32,
    /// Kept for parity with the published point table; no event awards it yet.
    pub consecutive_months: i32,
}

pub const KARMA_POINTS: KarmaPoints = KarmaPoints {
    story_published: 15,
    like_received: 2,
    comment_received: 3,
    comment_given: 2,
    contest_win: 75,
    contest_finalist: 30,
    vote_given: 1,
    consecutive_months: 10,
};

impl Default for KarmaPoints {
    fn default() -> Self {
        KARMA_POINTS
    }
}
