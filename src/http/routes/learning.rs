use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use uuid::Uuid;

use super::with_slash;
use crate::http::{ApiResult, AppState, CurrentAccount, Json, Path, Query};
use crate::learning::{
    CreateMaterialRequest, LearningMaterial, MaterialQuery, ShareMaterialRequest,
    UpdateMaterialRequest,
};

pub(super) fn routes() -> Router<AppState> {
    let router = Router::new()
        .route(
            "/learning-materials/{id}",
            get(get_material).put(update_material).delete(delete_material),
        )
        .route("/learning-materials/{id}/share", post(share_material))
        .route("/learning-materials/{id}/archive", post(archive_material));
    with_slash(router, "/learning-materials", post(create_material).get(list_materials))
}

async fn create_material(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Json(request): Json<CreateMaterialRequest>,
) -> ApiResult<(StatusCode, Json<LearningMaterial>)> {
    let material = state.learning.create(account.id, request).await?;
    Ok((StatusCode::CREATED, Json(material)))
}

async fn list_materials(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Query(query): Query<MaterialQuery>,
) -> ApiResult<Json<Vec<LearningMaterial>>> {
    Ok(Json(state.learning.list(account.id, &query).await?))
}

async fn get_material(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<LearningMaterial>> {
    Ok(Json(state.learning.get(account.id, id).await?))
}

async fn update_material(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateMaterialRequest>,
) -> ApiResult<Json<LearningMaterial>> {
    Ok(Json(state.learning.update(account.id, id, request).await?))
}

async fn share_material(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
    Json(request): Json<ShareMaterialRequest>,
) -> ApiResult<Json<LearningMaterial>> {
    Ok(Json(state.learning.share(account.id, id, request).await?))
}

async fn archive_material(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<LearningMaterial>> {
    Ok(Json(state.learning.archive(account.id, id).await?))
}

async fn delete_material(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.learning.delete(account.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
