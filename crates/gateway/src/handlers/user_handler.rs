//! User handlers.

use std::str::FromStr;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use common::AppResult;
use domain::{Bug, CreateUser, UserResponse, UserRole};

use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// Registration request with validation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "password123")]
    pub password: String,
    #[validate(length(min = 1, message = "Name is required"))]
    #[serde(alias = "fullName")]
    #[schema(example = "Jane Doe")]
    pub full_name: String,
    /// USER, QA or ADMIN; defaults to USER
    #[schema(example = "QA")]
    pub role: Option<String>,
}

/// Routes that need an authenticated caller
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/:id/bugs", get(reported_bugs))
        .route("/users/:id/assigned", get(assigned_bugs))
}

/// Public routes
pub fn registration_routes() -> Router<AppState> {
    Router::new().route("/users/register", post(register))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let role = payload.role.as_deref().map(UserRole::from_str).transpose()?;

    let user = state
        .services
        .registration
        .register(CreateUser {
            email: payload.email,
            password: payload.password,
            full_name: payload.full_name,
            role,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Bugs reported by a user
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/bugs",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Reported bugs, empty for unknown users", body = Vec<Bug>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn reported_bugs(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Bug>>> {
    Ok(Json(state.services.bugs.find_by_reporter(id).await?))
}

/// Bugs assigned to a user
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/assigned",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Assigned bugs, empty for unknown users", body = Vec<Bug>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn assigned_bugs(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Bug>>> {
    Ok(Json(state.services.bugs.find_by_assignee(id).await?))
}
