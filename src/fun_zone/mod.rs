//! Shared creative content: poems, jokes, stories and the like

mod models;
mod storage;

pub use models::*;
pub use storage::{FunZoneStorage, MAX_POPULAR_LIMIT};
