pub mod audit;
pub mod fallback;
pub mod karma;
pub mod poll_conversion;
pub mod presenter;
pub mod ranking;
