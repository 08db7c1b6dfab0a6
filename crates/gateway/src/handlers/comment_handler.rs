//! Comment handlers.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use common::AppResult;
use domain::Comment;

use crate::extractors::ValidatedJson;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// New comment body. Blank and oversized content are rejected by the
/// comment thread, blank first.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddCommentRequest {
    #[schema(example = "Reproduced on the latest build")]
    pub content: String,
}

/// Comment routes nested under a bug
pub fn bug_comment_routes() -> Router<AppState> {
    Router::new().route("/:id/comments", get(list_comments).post(add_comment))
}

/// Comment routes addressed by comment id
pub fn comment_routes() -> Router<AppState> {
    Router::new().route("/:id", delete(delete_comment))
}

/// Comments on a bug, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/bugs/{id}/comments",
    tag = "Comments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Bug ID")),
    responses(
        (status = 200, description = "Comments, empty for unknown bugs", body = Vec<Comment>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_comments(
    State(state): State<AppState>,
    Path(bug_id): Path<Uuid>,
) -> AppResult<Json<Vec<Comment>>> {
    Ok(Json(state.services.comments.list_comments(bug_id).await?))
}

/// Comment on a bug as the current user
#[utoipa::path(
    post,
    path = "/api/v1/bugs/{id}/comments",
    tag = "Comments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Bug ID")),
    request_body = AddCommentRequest,
    responses(
        (status = 201, description = "Comment added", body = Comment),
        (status = 400, description = "Empty or oversized content"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Bug or author not found")
    )
)]
pub async fn add_comment(
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(bug_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AddCommentRequest>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    let comment = state
        .services
        .comments
        .add_comment(bug_id, caller.id, payload.content)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// Delete a comment
#[utoipa::path(
    delete,
    path = "/api/v1/comments/{id}",
    tag = "Comments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Comment ID")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Comment not found")
    )
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.comments.delete_comment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
