//! Comment thread - notes attached to a bug.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::Comment;

use super::identity_directory::{resolve_as, IdentityDirectory};
use crate::clock::Clock;
use crate::repository::{BugRepository, CommentRepository};

/// Comment thread trait for dependency injection.
#[async_trait]
pub trait CommentThread: Send + Sync {
    /// Attach a comment to a bug. Any registered user may comment.
    async fn add_comment(&self, bug_id: Uuid, author_id: Uuid, content: String)
        -> AppResult<Comment>;

    /// Comments on a bug, oldest first. Unknown bugs have no comments.
    async fn list_comments(&self, bug_id: Uuid) -> AppResult<Vec<Comment>>;

    /// Remove a comment. No ownership check.
    async fn delete_comment(&self, comment_id: Uuid) -> AppResult<()>;
}

/// Repository-backed comment thread.
pub struct Discussion {
    comments: Arc<dyn CommentRepository>,
    bugs: Arc<dyn BugRepository>,
    directory: Arc<dyn IdentityDirectory>,
    clock: Arc<dyn Clock>,
}

impl Discussion {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        bugs: Arc<dyn BugRepository>,
        directory: Arc<dyn IdentityDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            comments,
            bugs,
            directory,
            clock,
        }
    }
}

#[async_trait]
impl CommentThread for Discussion {
    async fn add_comment(
        &self,
        bug_id: Uuid,
        author_id: Uuid,
        content: String,
    ) -> AppResult<Comment> {
        Comment::validate_content(&content)?;

        if self.bugs.find_by_id(bug_id).await?.is_none() {
            return Err(AppError::BugNotFound(bug_id));
        }
        resolve_as(self.directory.as_ref(), author_id, AppError::AuthorNotFound).await?;

        let comment = self
            .comments
            .insert(Comment::new(bug_id, author_id, content, self.clock.now()))
            .await?;

        tracing::info!(comment_id = %comment.id, bug_id = %bug_id, author_id = %author_id, "comment added");
        Ok(comment)
    }

    async fn list_comments(&self, bug_id: Uuid) -> AppResult<Vec<Comment>> {
        let comments = self.comments.find_by_bug(bug_id).await?;
        tracing::debug!(bug_id = %bug_id, count = comments.len(), "comments listed");
        Ok(comments)
    }

    async fn delete_comment(&self, comment_id: Uuid) -> AppResult<()> {
        if !self.comments.delete(comment_id).await? {
            return Err(AppError::CommentNotFound(comment_id));
        }
        tracing::info!(comment_id = %comment_id, "comment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mockall::predicate::eq;

    use crate::clock::SystemClock;
    use crate::repository::{MockBugRepository, MockCommentRepository, MockUserRepository};
    use crate::service::Directory;
    use domain::{Bug, BugDraft, BugPriority, User, UserRole};

    fn some_bug(id: Uuid) -> Bug {
        let draft = BugDraft {
            title: "t".to_string(),
            description: "d".to_string(),
            priority: BugPriority::Medium,
            status: None,
            assigned_user_id: None,
        };
        let mut bug = Bug::open(draft, Uuid::new_v4(), Utc::now());
        bug.id = id;
        bug
    }

    fn known_user(id: Uuid) -> User {
        User {
            id,
            email: "author@example.com".to_string(),
            password_hash: "hashed".to_string(),
            full_name: "Author".to_string(),
            role: UserRole::User,
            created_at: Utc::now(),
        }
    }

    fn discussion(
        comments: MockCommentRepository,
        bugs: MockBugRepository,
        users: MockUserRepository,
    ) -> Discussion {
        Discussion::new(
            Arc::new(comments),
            Arc::new(bugs),
            Arc::new(Directory::new(Arc::new(users))),
            Arc::new(SystemClock),
        )
    }

    #[tokio::test]
    async fn test_blank_content_checked_before_existence() {
        let mut bugs = MockBugRepository::new();
        bugs.expect_find_by_id().never();
        let mut comments = MockCommentRepository::new();
        comments.expect_insert().never();

        let service = discussion(comments, bugs, MockUserRepository::new());

        for blank in ["", "   "] {
            let result = service
                .add_comment(Uuid::new_v4(), Uuid::new_v4(), blank.to_string())
                .await;
            assert!(matches!(result, Err(AppError::EmptyContent)));
        }
    }

    #[tokio::test]
    async fn test_missing_bug() {
        let mut bugs = MockBugRepository::new();
        bugs.expect_find_by_id().returning(|_| Ok(None));
        let mut comments = MockCommentRepository::new();
        comments.expect_insert().never();

        let service = discussion(comments, bugs, MockUserRepository::new());
        let result = service
            .add_comment(Uuid::new_v4(), Uuid::new_v4(), "ok".to_string())
            .await;

        assert!(matches!(result, Err(AppError::BugNotFound(_))));
    }

    #[tokio::test]
    async fn test_missing_author() {
        let mut bugs = MockBugRepository::new();
        bugs.expect_find_by_id().returning(|id| Ok(Some(some_bug(id))));
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));
        let mut comments = MockCommentRepository::new();
        comments.expect_insert().never();

        let service = discussion(comments, bugs, users);
        let result = service
            .add_comment(Uuid::new_v4(), Uuid::new_v4(), "ok".to_string())
            .await;

        assert!(matches!(result, Err(AppError::AuthorNotFound(_))));
    }

    #[tokio::test]
    async fn test_add_comment_success() {
        let bug_id = Uuid::new_v4();
        let author_id = Uuid::new_v4();

        let mut bugs = MockBugRepository::new();
        bugs.expect_find_by_id()
            .with(eq(bug_id))
            .returning(|id| Ok(Some(some_bug(id))));
        let mut users = MockUserRepository::new();
        users.expect_find_by_id()
            .with(eq(author_id))
            .returning(|id| Ok(Some(known_user(id))));
        let mut comments = MockCommentRepository::new();
        comments.expect_insert().times(1).returning(|c| Ok(c));

        let service = discussion(comments, bugs, users);
        let comment = service
            .add_comment(bug_id, author_id, "ok".to_string())
            .await
            .unwrap();

        assert_eq!(comment.bug_id, bug_id);
        assert_eq!(comment.author_id, author_id);
        assert_eq!(comment.content, "ok");
    }

    #[tokio::test]
    async fn test_delete_missing_comment() {
        let mut comments = MockCommentRepository::new();
        comments.expect_delete().returning(|_| Ok(false));

        let service = discussion(comments, MockBugRepository::new(), MockUserRepository::new());
        let result = service.delete_comment(Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::CommentNotFound(_))));
    }
}
