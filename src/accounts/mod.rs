//! User accounts: registration, profile updates and admin moderation

mod models;
mod storage;

pub use models::*;
pub use storage::{AccountStorage, MAX_LIST_LIMIT, MIN_PASSWORD_LEN};
