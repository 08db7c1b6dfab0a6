//! Comment repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::entities::comment::{self, ActiveModel, Entity as CommentEntity};
use common::AppResult;
use domain::Comment;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Comment repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Comments on a bug, oldest first
    async fn find_by_bug(&self, bug_id: Uuid) -> AppResult<Vec<Comment>>;

    /// Persist a new comment
    async fn insert(&self, comment: Comment) -> AppResult<Comment>;

    /// Delete a comment; `false` when no row matched
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// SeaORM-backed comment repository
pub struct CommentStore {
    db: DatabaseConnection,
}

impl CommentStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentRepository for CommentStore {
    async fn find_by_bug(&self, bug_id: Uuid) -> AppResult<Vec<Comment>> {
        let models = CommentEntity::find()
            .filter(comment::Column::BugId.eq(bug_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Comment::from).collect())
    }

    async fn insert(&self, comment: Comment) -> AppResult<Comment> {
        let model = ActiveModel::from(&comment).insert(&self.db).await?;
        Ok(Comment::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = CommentEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
