//! Projects and skills

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use uuid::Uuid;

use super::with_slash;
use crate::http::{ApiResult, AppState, CurrentAccount, Json, Path, Query};
use crate::projects::{
    CreateProjectRequest, CreateSkillRequest, Project, ProjectQuery, ProjectWithStats, Skill,
    SkillQuery, SkillWithStats, UpdateProjectRequest, UpdateSkillRequest,
};

pub(super) fn routes() -> Router<AppState> {
    let router = Router::new()
        .route(
            "/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/skills/categories", get(skill_categories))
        .route(
            "/skills/{id}",
            get(get_skill).put(update_skill).delete(delete_skill),
        );
    let router = with_slash(router, "/projects", post(create_project).get(list_projects));
    with_slash(router, "/skills", post(create_skill).get(list_skills))
}

// ==================== Projects ====================

async fn create_project(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Json(request): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let project = state.projects.create(account.id, request).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

async fn list_projects(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Query(query): Query<ProjectQuery>,
) -> ApiResult<Json<Vec<Project>>> {
    Ok(Json(state.projects.list(account.id, &query).await?))
}

async fn get_project(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProjectWithStats>> {
    Ok(Json(state.projects.get_with_stats(account.id, id).await?))
}

async fn update_project(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProjectRequest>,
) -> ApiResult<Json<Project>> {
    Ok(Json(state.projects.update(account.id, id, request).await?))
}

async fn delete_project(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.projects.delete(account.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ==================== Skills ====================

async fn create_skill(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Json(request): Json<CreateSkillRequest>,
) -> ApiResult<(StatusCode, Json<Skill>)> {
    let skill = state.skills.create(account.id, request).await?;
    Ok((StatusCode::CREATED, Json(skill)))
}

async fn list_skills(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Query(query): Query<SkillQuery>,
) -> ApiResult<Json<Vec<Skill>>> {
    Ok(Json(state.skills.list(account.id, &query).await?))
}

async fn skill_categories(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.skills.categories(account.id).await?))
}

async fn get_skill(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SkillWithStats>> {
    Ok(Json(state.skills.get_with_stats(account.id, id).await?))
}

async fn update_skill(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSkillRequest>,
) -> ApiResult<Json<Skill>> {
    Ok(Json(state.skills.update(account.id, id, request).await?))
}

async fn delete_skill(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.skills.delete(account.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
