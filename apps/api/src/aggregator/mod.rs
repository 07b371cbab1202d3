//! Job search across internal listings and the external feeds.

pub mod feeds;
pub mod handlers;
pub mod search;

pub use search::{ApplyTarget, JobListing, Source};
