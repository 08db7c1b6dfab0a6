//! Bug repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use uuid::Uuid;

use super::entities::bug::{self, ActiveModel, Entity as BugEntity};
use common::AppResult;
use domain::{Bug, BugChange, BugStatus};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Bug repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BugRepository: Send + Sync {
    /// Find bug by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Bug>>;

    /// Persist a new bug
    async fn insert(&self, bug: Bug) -> AppResult<Bug>;

    /// All bugs, oldest first
    async fn list(&self) -> AppResult<Vec<Bug>>;

    /// Bugs reported by a user
    async fn find_by_reporter(&self, reporter_id: Uuid) -> AppResult<Vec<Bug>>;

    /// Bugs currently assigned to a user
    async fn find_by_assignee(&self, assignee_id: Uuid) -> AppResult<Vec<Bug>>;

    /// Bugs in a status, newest first
    async fn find_by_status(&self, status: BugStatus) -> AppResult<Vec<Bug>>;

    /// Read the bug, apply `change` stamped at `at`, and write it back as one
    /// unit of work. Returns `None` when the bug does not exist; a rejected
    /// change leaves the stored row untouched.
    async fn modify(&self, id: Uuid, change: BugChange, at: DateTime<Utc>)
        -> AppResult<Option<Bug>>;
}

/// SeaORM-backed bug repository
pub struct BugStore {
    db: DatabaseConnection,
}

impl BugStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_bugs(models: Vec<bug::Model>) -> AppResult<Vec<Bug>> {
    models.into_iter().map(Bug::try_from).collect()
}

#[async_trait]
impl BugRepository for BugStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Bug>> {
        BugEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Bug::try_from)
            .transpose()
    }

    async fn insert(&self, bug: Bug) -> AppResult<Bug> {
        let model = ActiveModel::from(&bug).insert(&self.db).await?;
        Bug::try_from(model)
    }

    async fn list(&self) -> AppResult<Vec<Bug>> {
        let models = BugEntity::find()
            .order_by_asc(bug::Column::CreatedAt)
            .order_by_asc(bug::Column::Id)
            .all(&self.db)
            .await?;
        to_bugs(models)
    }

    async fn find_by_reporter(&self, reporter_id: Uuid) -> AppResult<Vec<Bug>> {
        let models = BugEntity::find()
            .filter(bug::Column::ReporterId.eq(reporter_id))
            .all(&self.db)
            .await?;
        to_bugs(models)
    }

    async fn find_by_assignee(&self, assignee_id: Uuid) -> AppResult<Vec<Bug>> {
        let models = BugEntity::find()
            .filter(bug::Column::AssignedUserId.eq(assignee_id))
            .all(&self.db)
            .await?;
        to_bugs(models)
    }

    async fn find_by_status(&self, status: BugStatus) -> AppResult<Vec<Bug>> {
        let models = BugEntity::find()
            .filter(bug::Column::Status.eq(status.as_str()))
            .order_by_desc(bug::Column::CreatedAt)
            .all(&self.db)
            .await?;
        to_bugs(models)
    }

    async fn modify(
        &self,
        id: Uuid,
        change: BugChange,
        at: DateTime<Utc>,
    ) -> AppResult<Option<Bug>> {
        // Dropping the transaction without commit rolls it back
        let txn = self.db.begin().await?;

        let Some(model) = BugEntity::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let mut bug = Bug::try_from(model)?;
        bug.apply(change, at)?;

        let updated = ActiveModel::from(&bug).update(&txn).await?;
        txn.commit().await?;

        Ok(Some(Bug::try_from(updated)?))
    }
}
