use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use uuid::Uuid;

use super::with_slash;
use crate::http::{ApiResult, AppState, CurrentAccount, Json, Path, Query};
use crate::improvement::{AddProgressRequest, CreateLogRequest, ImprovementLog, LogQuery, UpdateLogRequest};

pub(super) fn routes() -> Router<AppState> {
    let router = Router::new()
        .route(
            "/improvement-log/{id}",
            get(get_log).put(update_log).delete(delete_log),
        )
        .route("/improvement-log/{id}/progress", post(add_progress));
    with_slash(router, "/improvement-log", post(create_log).get(list_logs))
}

async fn create_log(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Json(request): Json<CreateLogRequest>,
) -> ApiResult<(StatusCode, Json<ImprovementLog>)> {
    let log = state.improvement.create(account.id, request).await?;
    Ok((StatusCode::CREATED, Json(log)))
}

async fn list_logs(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Query(query): Query<LogQuery>,
) -> ApiResult<Json<Vec<ImprovementLog>>> {
    Ok(Json(state.improvement.list(account.id, &query).await?))
}

async fn get_log(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ImprovementLog>> {
    Ok(Json(state.improvement.get(account.id, id).await?))
}

async fn update_log(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateLogRequest>,
) -> ApiResult<Json<ImprovementLog>> {
    Ok(Json(state.improvement.update(account.id, id, request).await?))
}

async fn add_progress(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
    Json(request): Json<AddProgressRequest>,
) -> ApiResult<Json<ImprovementLog>> {
    Ok(Json(state.improvement.add_progress(account.id, id, request).await?))
}

async fn delete_log(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.improvement.delete(account.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
