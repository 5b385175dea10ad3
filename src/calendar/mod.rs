//! Calendar events and task tracking
//!
//! Events carry a time range and a status. Completed and in-progress
//! events feed the time-spent analytics for skills and projects.

mod models;
mod storage;

pub use models::*;
pub use storage::CalendarStorage;
