//! Bug handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use common::AppResult;
use domain::{Bug, BugDraft, BugPatch, BugPriority};

use crate::extractors::ValidatedJson;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// New bug report
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBugRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    #[schema(example = "Crash when saving an empty file")]
    pub title: String,
    #[schema(example = "Open the editor, press Ctrl+S with no content")]
    pub description: String,
    /// Defaults to MEDIUM
    #[serde(default)]
    pub priority: BugPriority,
    /// Ignored; new bugs are always OPEN
    #[serde(default)]
    pub status: Option<String>,
    /// Optional initial assignee
    #[serde(default, alias = "assignedUserId")]
    pub assigned_user_id: Option<Uuid>,
}

impl From<CreateBugRequest> for BugDraft {
    fn from(req: CreateBugRequest) -> Self {
        BugDraft {
            title: req.title,
            description: req.description,
            priority: req.priority,
            status: req.status,
            assigned_user_id: req.assigned_user_id,
        }
    }
}

/// Replacement descriptive fields
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBugRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    pub description: String,
    pub priority: BugPriority,
}

impl From<UpdateBugRequest> for BugPatch {
    fn from(req: UpdateBugRequest) -> Self {
        BugPatch {
            title: req.title,
            description: req.description,
            priority: req.priority,
        }
    }
}

/// Assignment target
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignBugRequest {
    #[serde(alias = "userId")]
    pub user_id: Uuid,
}

/// Target status literal
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusRequest {
    #[validate(length(min = 1, message = "Status is required"))]
    #[schema(example = "IN_PROGRESS")]
    pub status: String,
}

/// Bug list filter
#[derive(Debug, Deserialize, IntoParams)]
pub struct BugListQuery {
    /// Only bugs in this status, newest first
    pub status: Option<String>,
}

/// Create bug routes
pub fn bug_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_bugs).post(create_bug))
        .route("/:id", get(get_bug).put(update_bug))
        .route("/:id/assign", patch(assign_bug))
        .route("/:id/status", patch(update_status))
}

/// Report a bug as the current user
#[utoipa::path(
    post,
    path = "/api/v1/bugs",
    tag = "Bugs",
    security(("bearer_auth" = [])),
    request_body = CreateBugRequest,
    responses(
        (status = 201, description = "Bug created", body = Bug),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Initial assignee not found")
    )
)]
pub async fn create_bug(
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateBugRequest>,
) -> AppResult<(StatusCode, Json<Bug>)> {
    let bug = state.services.bugs.create_bug(payload.into(), caller.id).await?;
    Ok((StatusCode::CREATED, Json(bug)))
}

/// List bugs (QA/ADMIN only)
#[utoipa::path(
    get,
    path = "/api/v1/bugs",
    tag = "Bugs",
    security(("bearer_auth" = [])),
    params(BugListQuery),
    responses(
        (status = 200, description = "Bugs in storage order, or newest first when filtered", body = Vec<Bug>),
        (status = 400, description = "Unknown status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - QA or ADMIN only")
    )
)]
pub async fn list_bugs(
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<BugListQuery>,
) -> AppResult<Json<Vec<Bug>>> {
    let bugs = match query.status {
        Some(status) => state.services.bugs.find_by_status(&caller, &status).await?,
        None => state.services.bugs.list_all_bugs(&caller).await?,
    };
    Ok(Json(bugs))
}

/// Get a bug by id
#[utoipa::path(
    get,
    path = "/api/v1/bugs/{id}",
    tag = "Bugs",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Bug ID")),
    responses(
        (status = 200, description = "Bug", body = Bug),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Bug not found")
    )
)]
pub async fn get_bug(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Bug>> {
    Ok(Json(state.services.bugs.get_bug(id).await?))
}

/// Overwrite title, description and priority
#[utoipa::path(
    put,
    path = "/api/v1/bugs/{id}",
    tag = "Bugs",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Bug ID")),
    request_body = UpdateBugRequest,
    responses(
        (status = 200, description = "Bug updated", body = Bug),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Bug not found")
    )
)]
pub async fn update_bug(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateBugRequest>,
) -> AppResult<Json<Bug>> {
    let bug = state.services.bugs.update_bug_details(id, payload.into()).await?;
    Ok(Json(bug))
}

/// Assign a bug (QA/ADMIN only)
#[utoipa::path(
    patch,
    path = "/api/v1/bugs/{id}/assign",
    tag = "Bugs",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Bug ID")),
    request_body = AssignBugRequest,
    responses(
        (status = 200, description = "Bug assigned", body = Bug),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - QA or ADMIN only"),
        (status = 404, description = "Bug or assignee not found")
    )
)]
pub async fn assign_bug(
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AssignBugRequest>,
) -> AppResult<Json<Bug>> {
    let bug = state
        .services
        .bugs
        .assign_bug(&caller, id, payload.user_id)
        .await?;
    Ok(Json(bug))
}

/// Change a bug's status (QA/ADMIN only)
#[utoipa::path(
    patch,
    path = "/api/v1/bugs/{id}/status",
    tag = "Bugs",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Bug ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = Bug),
        (status = 400, description = "Unknown status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - QA or ADMIN only"),
        (status = 404, description = "Bug not found"),
        (status = 409, description = "Transition not allowed by the workflow")
    )
)]
pub async fn update_status(
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateStatusRequest>,
) -> AppResult<Json<Bug>> {
    let bug = state
        .services
        .bugs
        .update_status(&caller, id, &payload.status)
        .await?;
    Ok(Json(bug))
}
