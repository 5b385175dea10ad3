//! Daily diary entries with mood tracking

mod models;
mod storage;

pub use models::*;
pub use storage::DiaryStorage;
