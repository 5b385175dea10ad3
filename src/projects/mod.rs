//! Projects and skills
//!
//! Both are named targets that calendar events can reference. Reading one
//! back includes the hours logged against it.

mod models;
mod storage;

pub use models::*;
pub use storage::{ProjectStorage, SkillStorage};
