//! In-memory storage backend.
//!
//! Implements every repository trait over plain collections guarded by one
//! async mutex, so each operation is atomic with respect to the others.
//! Suitable for tests and for running the server without PostgreSQL; all
//! data is lost when the process exits.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{Bug, BugChange, BugStatus, Comment, User};

use super::{BugRepository, CommentRepository, UserRepository};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    /// Insertion order doubles as storage order
    bugs: Vec<Bug>,
    comments: Vec<Comment>,
}

/// Thread-safe in-memory store. Clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.tables.lock().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: User) -> AppResult<User> {
        let mut tables = self.tables.lock().await;
        // Mirrors the unique constraint on users.email
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(AppError::conflict("User"));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl BugRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Bug>> {
        let tables = self.tables.lock().await;
        Ok(tables.bugs.iter().find(|b| b.id == id).cloned())
    }

    async fn insert(&self, bug: Bug) -> AppResult<Bug> {
        let mut tables = self.tables.lock().await;
        if !tables.users.contains_key(&bug.reporter_id) {
            return Err(AppError::internal(format!(
                "bugs.reporter_id references missing user {}",
                bug.reporter_id
            )));
        }
        tables.bugs.push(bug.clone());
        Ok(bug)
    }

    async fn list(&self) -> AppResult<Vec<Bug>> {
        Ok(self.tables.lock().await.bugs.clone())
    }

    async fn find_by_reporter(&self, reporter_id: Uuid) -> AppResult<Vec<Bug>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .bugs
            .iter()
            .filter(|b| b.reporter_id == reporter_id)
            .cloned()
            .collect())
    }

    async fn find_by_assignee(&self, assignee_id: Uuid) -> AppResult<Vec<Bug>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .bugs
            .iter()
            .filter(|b| b.assigned_user_id == Some(assignee_id))
            .cloned()
            .collect())
    }

    async fn find_by_status(&self, status: BugStatus) -> AppResult<Vec<Bug>> {
        let tables = self.tables.lock().await;
        let mut bugs: Vec<Bug> = tables
            .bugs
            .iter()
            .filter(|b| b.status == status)
            .cloned()
            .collect();
        bugs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bugs)
    }

    async fn modify(
        &self,
        id: Uuid,
        change: BugChange,
        at: DateTime<Utc>,
    ) -> AppResult<Option<Bug>> {
        let mut tables = self.tables.lock().await;
        let Some(stored) = tables.bugs.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };

        // Work on a copy so a rejected change leaves the stored bug intact
        let mut bug = stored.clone();
        bug.apply(change, at)?;
        *stored = bug.clone();

        Ok(Some(bug))
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn find_by_bug(&self, bug_id: Uuid) -> AppResult<Vec<Comment>> {
        let tables = self.tables.lock().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .iter()
            .filter(|c| c.bug_id == bug_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn insert(&self, comment: Comment) -> AppResult<Comment> {
        let mut tables = self.tables.lock().await;
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.comments.len();
        tables.comments.retain(|c| c.id != id);
        Ok(tables.comments.len() < before)
    }
}
