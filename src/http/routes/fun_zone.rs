use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use uuid::Uuid;

use super::with_slash;
use crate::fun_zone::{
    CreateFunContentRequest, FunContent, FunContentQuery, LikeStatus, PopularQuery,
    UpdateFunContentRequest,
};
use crate::http::{ApiResult, AppState, CurrentAccount, Json, Path, Query};

pub(super) fn routes() -> Router<AppState> {
    let router = Router::new()
        .route("/fun-zone/popular/week", get(popular_week))
        .route(
            "/fun-zone/{id}",
            get(get_content).put(update_content).delete(delete_content),
        )
        .route("/fun-zone/{id}/like", post(toggle_like));
    with_slash(router, "/fun-zone", post(create_content).get(list_contents))
}

async fn create_content(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Json(request): Json<CreateFunContentRequest>,
) -> ApiResult<(StatusCode, Json<FunContent>)> {
    let content = state.fun_zone.create(account.id, request).await?;
    Ok((StatusCode::CREATED, Json(content)))
}

async fn list_contents(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Query(query): Query<FunContentQuery>,
) -> ApiResult<Json<Vec<FunContent>>> {
    Ok(Json(state.fun_zone.list(account.id, &query).await?))
}

async fn popular_week(
    State(state): State<AppState>,
    CurrentAccount(_account): CurrentAccount,
    Query(query): Query<PopularQuery>,
) -> ApiResult<Json<Vec<FunContent>>> {
    Ok(Json(state.fun_zone.popular_week(query.limit, Utc::now()).await?))
}

async fn get_content(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<FunContent>> {
    Ok(Json(state.fun_zone.get(account.id, id).await?))
}

async fn update_content(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateFunContentRequest>,
) -> ApiResult<Json<FunContent>> {
    Ok(Json(state.fun_zone.update(account.id, id, request).await?))
}

async fn delete_content(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.fun_zone.delete(account.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_like(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<LikeStatus>> {
    Ok(Json(state.fun_zone.toggle_like(account.id, id).await?))
}
