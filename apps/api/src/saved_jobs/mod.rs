//! Per-seeker bookmarks of internal jobs.

pub mod handlers;
pub mod queries;
