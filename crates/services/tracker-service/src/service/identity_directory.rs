//! Identity directory - turns a user id into a role-bearing user record.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::User;

use crate::repository::UserRepository;

/// Read-only user lookups. No side effects.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Resolve a user id; `UserNotFound` when no record matches.
    ///
    /// Callers re-label the failure for their own context
    /// (reporter, assignee, author, or an unauthenticated caller).
    async fn resolve(&self, user_id: Uuid) -> AppResult<User>;
}

/// Repository-backed identity directory.
pub struct Directory {
    users: Arc<dyn UserRepository>,
}

impl Directory {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl IdentityDirectory for Directory {
    async fn resolve(&self, user_id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound(user_id))
    }
}

/// Resolve `user_id`, mapping a missing user to `missing(user_id)`.
///
/// Infrastructure errors pass through unchanged.
pub(crate) async fn resolve_as(
    directory: &dyn IdentityDirectory,
    user_id: Uuid,
    missing: fn(Uuid) -> AppError,
) -> AppResult<User> {
    match directory.resolve(user_id).await {
        Err(AppError::UserNotFound(id)) => Err(missing(id)),
        other => other,
    }
}
