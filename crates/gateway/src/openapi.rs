//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::bug_handler::{
    AssignBugRequest, CreateBugRequest, UpdateBugRequest, UpdateStatusRequest,
};
use crate::handlers::comment_handler::AddCommentRequest;
use crate::handlers::health_handler::HealthResponse;
use crate::handlers::user_handler::RegisterRequest;
use domain::{Bug, BugPriority, BugStatus, Comment, UserResponse, UserRole};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::bug_handler::create_bug,
        crate::handlers::bug_handler::list_bugs,
        crate::handlers::bug_handler::get_bug,
        crate::handlers::bug_handler::update_bug,
        crate::handlers::bug_handler::assign_bug,
        crate::handlers::bug_handler::update_status,
        crate::handlers::comment_handler::list_comments,
        crate::handlers::comment_handler::add_comment,
        crate::handlers::comment_handler::delete_comment,
        crate::handlers::user_handler::register,
        crate::handlers::user_handler::reported_bugs,
        crate::handlers::user_handler::assigned_bugs,
        crate::handlers::health_handler::health_check,
    ),
    components(
        schemas(
            Bug,
            BugStatus,
            BugPriority,
            Comment,
            UserResponse,
            UserRole,
            CreateBugRequest,
            UpdateBugRequest,
            AssignBugRequest,
            UpdateStatusRequest,
            AddCommentRequest,
            RegisterRequest,
            HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Bugs", description = "Bug reporting and triage"),
        (name = "Comments", description = "Discussion on bugs"),
        (name = "Users", description = "Registration and per-user bug views"),
        (name = "Health", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
