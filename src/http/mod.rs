//! REST API for devtrack
//!
//! Everything lives under `/api/v1` except the welcome message and the
//! health check. Errors render as `{"detail": "..."}`.

mod error;
mod extract;
mod middleware;
mod routes;

use std::future::Future;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub use error::{ApiError, ApiResult};
pub use extract::{AdminAccount, CurrentAccount, Form, Json, Path, Query};

use crate::accounts::AccountStorage;
use crate::analytics::Analytics;
use crate::auth::{AuthVerifier, TokenSigner, TokenVerifier};
use crate::calendar::CalendarStorage;
use crate::config::Settings;
use crate::diary::DiaryStorage;
use crate::flashcards::FlashcardStorage;
use crate::fun_zone::FunZoneStorage;
use crate::improvement::ImprovementStorage;
use crate::learning::LearningStorage;
use crate::projects::{ProjectStorage, SkillStorage};
use crate::store::DocumentStore;

pub const API_VERSION: &str = "1.0.0";

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub signer: Arc<TokenSigner>,
    pub verifier: Arc<dyn AuthVerifier>,
    pub accounts: AccountStorage,
    pub calendar: CalendarStorage,
    pub projects: ProjectStorage,
    pub skills: SkillStorage,
    pub flashcards: FlashcardStorage,
    pub diary: DiaryStorage,
    pub fun_zone: FunZoneStorage,
    pub learning: LearningStorage,
    pub improvement: ImprovementStorage,
    pub analytics: Analytics,
}

impl AppState {
    pub fn new(settings: Settings, store: Arc<dyn DocumentStore>) -> Self {
        let signer = Arc::new(TokenSigner::new(
            &settings.secret_key,
            settings.token_ttl_minutes,
        ));
        let accounts = AccountStorage::new(Arc::clone(&store));
        let verifier = Arc::new(TokenVerifier::new(Arc::clone(&signer), accounts.clone()));

        Self {
            settings: Arc::new(settings),
            signer,
            verifier,
            accounts,
            calendar: CalendarStorage::new(Arc::clone(&store)),
            projects: ProjectStorage::new(Arc::clone(&store)),
            skills: SkillStorage::new(Arc::clone(&store)),
            flashcards: FlashcardStorage::new(Arc::clone(&store)),
            diary: DiaryStorage::new(Arc::clone(&store)),
            fun_zone: FunZoneStorage::new(Arc::clone(&store)),
            learning: LearningStorage::new(Arc::clone(&store)),
            improvement: ImprovementStorage::new(Arc::clone(&store)),
            analytics: Analytics::new(store),
        }
    }
}

async fn welcome() -> Json<Value> {
    Json(json!({
        "message": "Welcome to Personal Development Tracker API",
        "version": API_VERSION,
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Build the full application router
pub fn router(state: AppState) -> Router {
    let cors = middleware::cors_layer(&state.settings.allowed_origins);
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .nest("/api/v1", routes::api())
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .layer(cors)
        .with_state(state)
}

/// Serve the API on `listener` until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    log::info!("devtrack API listening on http://{}", addr);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    log::info!("devtrack API shut down");
    Ok(())
}
