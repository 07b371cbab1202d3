//! Job applications: submitting with a resume, employer triage, seeker history.

pub mod handlers;
pub mod queries;
