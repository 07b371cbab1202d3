//! Admin console: read-only overview plus user moderation.

pub mod handlers;
pub mod queries;
