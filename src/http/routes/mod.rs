//! Route tables, one module per resource

mod accounts;
mod admin;
mod analytics;
mod calendar;
mod diary;
mod flashcards;
mod fun_zone;
mod improvement;
mod learning;
mod projects;

use axum::routing::MethodRouter;
use axum::Router;

use super::AppState;

/// Register `methods` at `path` and at `path/`
fn with_slash(router: Router<AppState>, path: &str, methods: MethodRouter<AppState>) -> Router<AppState> {
    router
        .route(path, methods.clone())
        .route(&format!("{}/", path), methods)
}

/// Everything mounted under `/api/v1`
pub(super) fn api() -> Router<AppState> {
    Router::new()
        .merge(accounts::routes())
        .merge(calendar::routes())
        .merge(projects::routes())
        .merge(flashcards::routes())
        .merge(diary::routes())
        .merge(fun_zone::routes())
        .merge(learning::routes())
        .merge(improvement::routes())
        .merge(analytics::routes())
        .merge(admin::routes())
}
