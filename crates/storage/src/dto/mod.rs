pub mod poll;
pub mod ranking;
