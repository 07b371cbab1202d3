//! Registration, login and the session extractors that gate every other route.

pub mod handlers;
pub mod password;
pub mod session;

pub use session::{CurrentUser, MaybeUser};
