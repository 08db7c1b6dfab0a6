//! Bug lifecycle - creation, edits, assignment and status changes.
//!
//! Privileged operations check the caller's role before looking at the
//! target bug, so an unprivileged caller learns nothing about which ids exist.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{Bug, BugChange, BugDraft, BugPatch, BugStatus, StatusWorkflow, User};

use super::identity_directory::{resolve_as, IdentityDirectory};
use crate::clock::Clock;
use crate::repository::BugRepository;

/// Bug lifecycle trait for dependency injection.
#[async_trait]
pub trait BugLifecycle: Send + Sync {
    /// Report a new bug. Any registered user may report; the stored bug is
    /// always OPEN whatever status the draft carries.
    async fn create_bug(&self, draft: BugDraft, reporter_id: Uuid) -> AppResult<Bug>;

    /// Every bug in storage order (QA/ADMIN only)
    async fn list_all_bugs(&self, caller: &User) -> AppResult<Vec<Bug>>;

    /// Single bug by id
    async fn get_bug(&self, bug_id: Uuid) -> AppResult<Bug>;

    /// Overwrite title, description and priority
    async fn update_bug_details(&self, bug_id: Uuid, patch: BugPatch) -> AppResult<Bug>;

    /// Point the bug at any registered user (QA/ADMIN only)
    async fn assign_bug(&self, caller: &User, bug_id: Uuid, assignee_id: Uuid) -> AppResult<Bug>;

    /// Move the bug to `status`, given as its literal (QA/ADMIN only)
    async fn update_status(&self, caller: &User, bug_id: Uuid, status: &str) -> AppResult<Bug>;

    /// Bugs reported by a user; empty for unknown users
    async fn find_by_reporter(&self, user_id: Uuid) -> AppResult<Vec<Bug>>;

    /// Bugs assigned to a user; empty for unknown users
    async fn find_by_assignee(&self, user_id: Uuid) -> AppResult<Vec<Bug>>;

    /// Bugs in one status, newest first (QA/ADMIN only)
    async fn find_by_status(&self, caller: &User, status: &str) -> AppResult<Vec<Bug>>;
}

/// Repository-backed bug lifecycle.
pub struct BugTracker {
    bugs: Arc<dyn BugRepository>,
    directory: Arc<dyn IdentityDirectory>,
    clock: Arc<dyn Clock>,
    workflow: StatusWorkflow,
}

impl BugTracker {
    pub fn new(
        bugs: Arc<dyn BugRepository>,
        directory: Arc<dyn IdentityDirectory>,
        clock: Arc<dyn Clock>,
        workflow: StatusWorkflow,
    ) -> Self {
        Self {
            bugs,
            directory,
            clock,
            workflow,
        }
    }

    fn require_triage(caller: &User, action: &'static str) -> AppResult<()> {
        caller.ensure_can_triage().map_err(|e| {
            tracing::warn!(user_id = %caller.id, role = %caller.role, action, "role check failed");
            AppError::from(e)
        })
    }

    async fn modify(&self, bug_id: Uuid, change: BugChange) -> AppResult<Bug> {
        self.bugs
            .modify(bug_id, change, self.clock.now())
            .await?
            .ok_or(AppError::BugNotFound(bug_id))
    }
}

#[async_trait]
impl BugLifecycle for BugTracker {
    async fn create_bug(&self, draft: BugDraft, reporter_id: Uuid) -> AppResult<Bug> {
        resolve_as(self.directory.as_ref(), reporter_id, AppError::ReporterNotFound).await?;

        if let Some(assignee_id) = draft.assigned_user_id {
            resolve_as(self.directory.as_ref(), assignee_id, AppError::AssigneeNotFound).await?;
        }

        if let Some(requested) = draft.status.as_deref() {
            tracing::debug!(requested, "ignoring status on new bug");
        }

        let bug = self
            .bugs
            .insert(Bug::open(draft, reporter_id, self.clock.now()))
            .await?;

        tracing::info!(bug_id = %bug.id, reporter_id = %reporter_id, "bug created");
        Ok(bug)
    }

    async fn list_all_bugs(&self, caller: &User) -> AppResult<Vec<Bug>> {
        Self::require_triage(caller, "list_all_bugs")?;
        self.bugs.list().await
    }

    async fn get_bug(&self, bug_id: Uuid) -> AppResult<Bug> {
        self.bugs
            .find_by_id(bug_id)
            .await?
            .ok_or(AppError::BugNotFound(bug_id))
    }

    async fn update_bug_details(&self, bug_id: Uuid, patch: BugPatch) -> AppResult<Bug> {
        let bug = self.modify(bug_id, BugChange::Details(patch)).await?;
        tracing::info!(bug_id = %bug_id, "bug details updated");
        Ok(bug)
    }

    async fn assign_bug(&self, caller: &User, bug_id: Uuid, assignee_id: Uuid) -> AppResult<Bug> {
        Self::require_triage(caller, "assign_bug")?;
        resolve_as(self.directory.as_ref(), assignee_id, AppError::AssigneeNotFound).await?;

        let bug = self.modify(bug_id, BugChange::Assign(assignee_id)).await?;
        tracing::info!(bug_id = %bug_id, assignee_id = %assignee_id, by = %caller.id, "bug assigned");
        Ok(bug)
    }

    async fn update_status(&self, caller: &User, bug_id: Uuid, status: &str) -> AppResult<Bug> {
        Self::require_triage(caller, "update_status")?;
        let status: BugStatus = status.parse()?;

        let change = BugChange::Status {
            status,
            workflow: self.workflow,
        };
        let bug = self.modify(bug_id, change).await?;
        tracing::info!(bug_id = %bug_id, status = %status, by = %caller.id, "bug status changed");
        Ok(bug)
    }

    async fn find_by_reporter(&self, user_id: Uuid) -> AppResult<Vec<Bug>> {
        match self.directory.resolve(user_id).await {
            Ok(user) => self.bugs.find_by_reporter(user.id).await,
            Err(AppError::UserNotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    async fn find_by_assignee(&self, user_id: Uuid) -> AppResult<Vec<Bug>> {
        match self.directory.resolve(user_id).await {
            Ok(user) => self.bugs.find_by_assignee(user.id).await,
            Err(AppError::UserNotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    async fn find_by_status(&self, caller: &User, status: &str) -> AppResult<Vec<Bug>> {
        Self::require_triage(caller, "find_by_status")?;
        let status: BugStatus = status.parse()?;
        self.bugs.find_by_status(status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use mockall::predicate::{always, eq};

    use crate::clock::SystemClock;
    use crate::repository::{MockBugRepository, MockUserRepository};
    use crate::service::Directory;
    use domain::{BugPriority, UserRole};

    fn user_with(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            email: format!("{}@example.com", role.as_str().to_lowercase()),
            password_hash: "hashed".to_string(),
            full_name: "Test User".to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    fn stored_bug(id: Uuid, reporter_id: Uuid) -> Bug {
        let now = Utc::now();
        Bug {
            id,
            title: "Login button unresponsive".to_string(),
            description: "Nothing happens on click".to_string(),
            status: BugStatus::Open,
            priority: BugPriority::High,
            reporter_id,
            assigned_user_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Directory that knows exactly the given users.
    fn directory_of(users: Vec<User>) -> Arc<dyn IdentityDirectory> {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |id| Ok(users.iter().find(|u| u.id == id).cloned()));
        Arc::new(Directory::new(Arc::new(repo)))
    }

    fn tracker(bugs: MockBugRepository, directory: Arc<dyn IdentityDirectory>) -> BugTracker {
        BugTracker::new(
            Arc::new(bugs),
            directory,
            Arc::new(SystemClock),
            StatusWorkflow::Unrestricted,
        )
    }

    #[tokio::test]
    async fn test_create_bug_forces_open_status() {
        let reporter = user_with(UserRole::User);
        let reporter_id = reporter.id;

        let mut bugs = MockBugRepository::new();
        bugs.expect_insert()
            .withf(|bug: &Bug| bug.status == BugStatus::Open && bug.assigned_user_id.is_none())
            .returning(|bug| Ok(bug));

        let service = tracker(bugs, directory_of(vec![reporter]));
        let draft = BugDraft {
            title: "t".to_string(),
            description: "d".to_string(),
            priority: BugPriority::Low,
            status: Some("CLOSED".to_string()),
            assigned_user_id: None,
        };

        let bug = service.create_bug(draft, reporter_id).await.unwrap();
        assert_eq!(bug.status, BugStatus::Open);
        assert_eq!(bug.reporter_id, reporter_id);
    }

    #[tokio::test]
    async fn test_create_bug_unknown_reporter() {
        let mut bugs = MockBugRepository::new();
        bugs.expect_insert().never();

        let service = tracker(bugs, directory_of(vec![]));
        let draft = BugDraft {
            title: "t".to_string(),
            description: "d".to_string(),
            priority: BugPriority::Low,
            status: None,
            assigned_user_id: None,
        };

        let result = service.create_bug(draft, Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::ReporterNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_bug_unknown_initial_assignee() {
        let reporter = user_with(UserRole::User);
        let reporter_id = reporter.id;

        let mut bugs = MockBugRepository::new();
        bugs.expect_insert().never();

        let service = tracker(bugs, directory_of(vec![reporter]));
        let draft = BugDraft {
            title: "t".to_string(),
            description: "d".to_string(),
            priority: BugPriority::Low,
            status: None,
            assigned_user_id: Some(Uuid::new_v4()),
        };

        let result = service.create_bug(draft, reporter_id).await;
        assert!(matches!(result, Err(AppError::AssigneeNotFound(_))));
    }

    #[tokio::test]
    async fn test_list_all_bugs_requires_triage_role() {
        let mut bugs = MockBugRepository::new();
        bugs.expect_list().never();

        let service = tracker(bugs, directory_of(vec![]));
        let result = service.list_all_bugs(&user_with(UserRole::User)).await;

        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_list_all_bugs_as_qa_and_admin() {
        let reporter_id = Uuid::new_v4();
        let mut bugs = MockBugRepository::new();
        bugs.expect_list().times(2).returning(move || {
            Ok(vec![
                stored_bug(Uuid::new_v4(), reporter_id),
                stored_bug(Uuid::new_v4(), reporter_id),
            ])
        });

        let service = tracker(bugs, directory_of(vec![]));
        for role in [UserRole::Qa, UserRole::Admin] {
            let listed = service.list_all_bugs(&user_with(role)).await.unwrap();
            assert_eq!(listed.len(), 2);
        }
    }

    #[tokio::test]
    async fn test_forbidden_wins_over_missing_bug() {
        let mut bugs = MockBugRepository::new();
        bugs.expect_modify().never();
        bugs.expect_find_by_id().never();

        let service = tracker(bugs, directory_of(vec![]));
        let caller = user_with(UserRole::User);

        let assign = service
            .assign_bug(&caller, Uuid::new_v4(), Uuid::new_v4())
            .await;
        let status = service
            .update_status(&caller, Uuid::new_v4(), "NOT_A_STATUS")
            .await;

        assert!(matches!(assign, Err(AppError::Forbidden)));
        assert!(matches!(status, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_assign_unknown_assignee_touches_nothing() {
        let qa = user_with(UserRole::Qa);

        let mut bugs = MockBugRepository::new();
        bugs.expect_modify().never();

        let service = tracker(bugs, directory_of(vec![qa.clone()]));
        let result = service.assign_bug(&qa, Uuid::new_v4(), Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::AssigneeNotFound(_))));
    }

    #[tokio::test]
    async fn test_assign_missing_bug() {
        let qa = user_with(UserRole::Qa);
        let assignee = user_with(UserRole::User);
        let assignee_id = assignee.id;
        let bug_id = Uuid::new_v4();

        let mut bugs = MockBugRepository::new();
        bugs.expect_modify()
            .with(eq(bug_id), eq(BugChange::Assign(assignee_id)), always())
            .returning(|_, _, _| Ok(None));

        let service = tracker(bugs, directory_of(vec![qa.clone(), assignee]));
        let result = service.assign_bug(&qa, bug_id, assignee_id).await;

        assert!(matches!(result, Err(AppError::BugNotFound(id)) if id == bug_id));
    }

    #[tokio::test]
    async fn test_update_status_rejects_unknown_literal() {
        let admin = user_with(UserRole::Admin);

        let mut bugs = MockBugRepository::new();
        bugs.expect_modify().never();

        let service = tracker(bugs, directory_of(vec![]));
        let result = service.update_status(&admin, Uuid::new_v4(), "DONE").await;

        assert!(matches!(result, Err(AppError::InvalidStatus(s)) if s == "DONE"));
    }

    #[tokio::test]
    async fn test_update_status_passes_configured_workflow() {
        let qa = user_with(UserRole::Qa);
        let bug_id = Uuid::new_v4();
        let reporter_id = Uuid::new_v4();

        let mut bugs = MockBugRepository::new();
        bugs.expect_modify()
            .withf(|_, change: &BugChange, _: &DateTime<Utc>| {
                *change
                    == BugChange::Status {
                        status: BugStatus::Closed,
                        workflow: StatusWorkflow::Strict,
                    }
            })
            .returning(move |id, change, at| {
                let mut bug = stored_bug(id, reporter_id);
                bug.apply(change, at)?;
                Ok(Some(bug))
            });

        let service = BugTracker::new(
            Arc::new(bugs),
            directory_of(vec![]),
            Arc::new(SystemClock),
            StatusWorkflow::Strict,
        );
        let bug = service.update_status(&qa, bug_id, "closed").await.unwrap();
        assert_eq!(bug.status, BugStatus::Closed);
    }

    #[tokio::test]
    async fn test_find_by_reporter_unknown_user_is_empty() {
        let mut bugs = MockBugRepository::new();
        bugs.expect_find_by_reporter().never();

        let service = tracker(bugs, directory_of(vec![]));
        let result = service.find_by_reporter(Uuid::new_v4()).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_find_by_reporter_known_user() {
        let reporter = user_with(UserRole::User);
        let reporter_id = reporter.id;

        let mut bugs = MockBugRepository::new();
        bugs.expect_find_by_reporter()
            .with(eq(reporter_id))
            .returning(|id| Ok(vec![stored_bug(Uuid::new_v4(), id)]));

        let service = tracker(bugs, directory_of(vec![reporter]));
        let result = service.find_by_reporter(reporter_id).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].reporter_id, reporter_id);
    }

    #[tokio::test]
    async fn test_update_details_missing_bug() {
        let mut bugs = MockBugRepository::new();
        bugs.expect_modify().returning(|_, _, _| Ok(None));

        let service = tracker(bugs, directory_of(vec![]));
        let patch = BugPatch {
            title: "renamed".to_string(),
            description: "d".to_string(),
            priority: BugPriority::Low,
        };
        let bug_id = Uuid::new_v4();
        let result = service.update_bug_details(bug_id, patch).await;

        assert!(matches!(result, Err(AppError::BugNotFound(id)) if id == bug_id));
    }

    #[tokio::test]
    async fn test_get_bug_missing() {
        let mut bugs = MockBugRepository::new();
        bugs.expect_find_by_id().returning(|_| Ok(None));

        let service = tracker(bugs, directory_of(vec![]));
        let result = service.get_bug(Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::BugNotFound(_))));
    }
}
