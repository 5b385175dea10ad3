//! devtrack: personal development tracker backend
//!
//! Accounts, calendar events, projects and skills, flashcards with spaced
//! repetition, diary, fun zone, learning materials, an improvement log and
//! analytics over all of them, served as a JSON REST API.

pub mod accounts;
pub mod analytics;
pub mod auth;
pub mod calendar;
pub mod config;
pub mod diary;
pub mod flashcards;
pub mod fun_zone;
pub mod http;
pub mod improvement;
pub mod learning;
pub mod projects;
pub mod store;
pub mod timestamps;
