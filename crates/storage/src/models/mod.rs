mod admin_action;
mod cached_ranking;
mod comment;
mod contest;
mod karma_points;
mod poll;
mod story;
mod user_profile;
mod vote;

pub use admin_action::AdminAction;
pub use cached_ranking::{CachedRanking, RankingMetadata};
pub use comment::Comment;
pub use contest::{Contest, ContestStatus};
pub use karma_points::{KARMA_POINTS, KarmaPoints};
pub use poll::{Poll, PollOption, PollStatus};
pub use story::Story;
pub use user_profile::{ANONYMOUS_AUTHOR, NotificationCategory, UserProfile, is_valid_email};
pub use vote::Vote;
