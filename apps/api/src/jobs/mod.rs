//! Employer-owned job listings.

pub mod handlers;
pub mod queries;
