pub mod emails;
pub mod polls;
pub mod ranking;
