pub mod admin_action;
pub mod badge;
pub mod contest;
pub mod karma;
pub mod poll;
pub mod profile;
pub mod ranking_cache;
