//! Bug domain entity, its enumerations and mutations.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

/// Lifecycle status of a bug
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BugStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

const STATUS_TABLE: &[(&str, BugStatus)] = &[
    ("OPEN", BugStatus::Open),
    ("IN_PROGRESS", BugStatus::InProgress),
    ("RESOLVED", BugStatus::Resolved),
    ("CLOSED", BugStatus::Closed),
];

impl BugStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BugStatus::Open => "OPEN",
            BugStatus::InProgress => "IN_PROGRESS",
            BugStatus::Resolved => "RESOLVED",
            BugStatus::Closed => "CLOSED",
        }
    }
}

impl FromStr for BugStatus {
    type Err = DomainError;

    /// Case-insensitive lookup in the closed status table.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let literal = s.trim();
        STATUS_TABLE
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(literal))
            .map(|(_, status)| *status)
            .ok_or_else(|| DomainError::InvalidStatus(s.to_string()))
    }
}

impl std::fmt::Display for BugStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bug priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BugPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

const PRIORITY_TABLE: &[(&str, BugPriority)] = &[
    ("LOW", BugPriority::Low),
    ("MEDIUM", BugPriority::Medium),
    ("HIGH", BugPriority::High),
    ("CRITICAL", BugPriority::Critical),
];

impl BugPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            BugPriority::Low => "LOW",
            BugPriority::Medium => "MEDIUM",
            BugPriority::High => "HIGH",
            BugPriority::Critical => "CRITICAL",
        }
    }
}

impl FromStr for BugPriority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let literal = s.trim();
        PRIORITY_TABLE
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(literal))
            .map(|(_, priority)| *priority)
            .ok_or_else(|| DomainError::validation(format!("Unknown priority: {}", s)))
    }
}

impl std::fmt::Display for BugPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which status changes are accepted.
///
/// `Unrestricted` accepts any status to any status, including backward moves
/// such as CLOSED to OPEN. `Strict` follows the adjacency set below; writing
/// the current status again is a no-op in both modes.
///
/// ```text
/// OPEN        -> IN_PROGRESS, CLOSED
/// IN_PROGRESS -> RESOLVED, OPEN
/// RESOLVED    -> CLOSED, IN_PROGRESS
/// CLOSED      -> (none)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusWorkflow {
    #[default]
    Unrestricted,
    Strict,
}

impl StatusWorkflow {
    /// Whether a bug currently in `from` may be moved to `to`.
    pub fn permits(&self, from: BugStatus, to: BugStatus) -> bool {
        use BugStatus::*;

        if from == to {
            return true;
        }
        match self {
            StatusWorkflow::Unrestricted => true,
            StatusWorkflow::Strict => matches!(
                (from, to),
                (Open, InProgress)
                    | (Open, Closed)
                    | (InProgress, Resolved)
                    | (InProgress, Open)
                    | (Resolved, Closed)
                    | (Resolved, InProgress)
            ),
        }
    }

    pub fn check(&self, from: BugStatus, to: BugStatus) -> DomainResult<()> {
        if self.permits(from, to) {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition { from, to })
        }
    }
}

/// Bug domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Bug {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: BugStatus,
    pub priority: BugPriority,
    /// User who reported the bug, never reassigned
    pub reporter_id: Uuid,
    /// User currently responsible for the bug
    pub assigned_user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bug {
    /// Build a freshly reported bug from a draft.
    ///
    /// The status is always OPEN; whatever status the draft carries is dropped.
    pub fn open(draft: BugDraft, reporter_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            status: BugStatus::Open,
            priority: draft.priority,
            reporter_id,
            assigned_user_id: draft.assigned_user_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a mutation and stamp `updated_at`.
    ///
    /// Leaves the bug untouched when the change is rejected.
    pub fn apply(&mut self, change: BugChange, at: DateTime<Utc>) -> DomainResult<()> {
        match change {
            BugChange::Details(patch) => {
                self.title = patch.title;
                self.description = patch.description;
                self.priority = patch.priority;
            }
            BugChange::Assign(user_id) => {
                self.assigned_user_id = Some(user_id);
            }
            BugChange::Status { status, workflow } => {
                workflow.check(self.status, status)?;
                self.status = status;
            }
        }
        self.touch(at);
        Ok(())
    }

    /// `updated_at` never goes backwards and always moves forward on a write,
    /// even when the clock reads the same instant twice.
    fn touch(&mut self, at: DateTime<Utc>) {
        let floor = self.updated_at + Duration::microseconds(1);
        self.updated_at = at.max(floor);
    }
}

/// Caller-supplied fields for a new bug report
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BugDraft {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub priority: BugPriority,
    /// Accepted for compatibility and ignored: new bugs are always OPEN.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub assigned_user_id: Option<Uuid>,
}

/// Editable descriptive fields of a bug
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BugPatch {
    pub title: String,
    pub description: String,
    pub priority: BugPriority,
}

/// A single mutation applied to a stored bug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BugChange {
    /// Overwrite title, description and priority
    Details(BugPatch),
    /// Point the bug at a new assignee
    Assign(Uuid),
    /// Move the bug to another status under the given workflow
    Status {
        status: BugStatus,
        workflow: StatusWorkflow,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> BugDraft {
        BugDraft {
            title: "Crash on save".to_string(),
            description: "Saving an empty file crashes".to_string(),
            priority: BugPriority::High,
            status: Some("CLOSED".to_string()),
            assigned_user_id: None,
        }
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("IN_PROGRESS".parse::<BugStatus>().unwrap(), BugStatus::InProgress);
        assert_eq!("closed".parse::<BugStatus>().unwrap(), BugStatus::Closed);
        assert_eq!(
            "DONE".parse::<BugStatus>(),
            Err(DomainError::InvalidStatus("DONE".to_string()))
        );
        assert!("".parse::<BugStatus>().is_err());
    }

    #[test]
    fn test_status_display_round_trips_through_table() {
        for (literal, status) in STATUS_TABLE {
            assert_eq!(status.as_str(), *literal);
            assert_eq!(status.to_string().parse::<BugStatus>().unwrap(), *status);
        }
    }

    #[test]
    fn test_priority_rejects_unknown_literal() {
        assert_eq!("critical".parse::<BugPriority>().unwrap(), BugPriority::Critical);
        assert!(matches!(
            "URGENT".parse::<BugPriority>(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_open_ignores_draft_status() {
        let reporter = Uuid::new_v4();
        let now = Utc::now();
        let bug = Bug::open(draft(), reporter, now);

        assert_eq!(bug.status, BugStatus::Open);
        assert_eq!(bug.reporter_id, reporter);
        assert_eq!(bug.assigned_user_id, None);
        assert_eq!(bug.created_at, now);
        assert_eq!(bug.updated_at, now);
    }

    #[test]
    fn test_unrestricted_workflow_allows_backward_moves() {
        let workflow = StatusWorkflow::Unrestricted;
        assert!(workflow.permits(BugStatus::Closed, BugStatus::Open));
        assert!(workflow.permits(BugStatus::Resolved, BugStatus::Open));
        assert!(workflow.permits(BugStatus::Open, BugStatus::Open));
    }

    #[test]
    fn test_strict_workflow_adjacency() {
        let workflow = StatusWorkflow::Strict;
        assert!(workflow.permits(BugStatus::Open, BugStatus::InProgress));
        assert!(workflow.permits(BugStatus::Resolved, BugStatus::Closed));
        assert!(workflow.permits(BugStatus::Closed, BugStatus::Closed));
        assert!(!workflow.permits(BugStatus::Open, BugStatus::Resolved));
        assert_eq!(
            workflow.check(BugStatus::Closed, BugStatus::Open),
            Err(DomainError::InvalidTransition {
                from: BugStatus::Closed,
                to: BugStatus::Open,
            })
        );
    }

    #[test]
    fn test_details_change_leaves_status_and_people_alone() {
        let now = Utc::now();
        let assignee = Uuid::new_v4();
        let mut bug = Bug::open(draft(), Uuid::new_v4(), now);
        bug.apply(BugChange::Assign(assignee), now).unwrap();
        let reporter = bug.reporter_id;

        let patch = BugPatch {
            title: "Crash on save as".to_string(),
            description: "Only with Save As".to_string(),
            priority: BugPriority::Low,
        };
        bug.apply(BugChange::Details(patch), now).unwrap();

        assert_eq!(bug.title, "Crash on save as");
        assert_eq!(bug.priority, BugPriority::Low);
        assert_eq!(bug.status, BugStatus::Open);
        assert_eq!(bug.reporter_id, reporter);
        assert_eq!(bug.assigned_user_id, Some(assignee));
    }

    #[test]
    fn test_updated_at_is_strictly_monotonic() {
        let now = Utc::now();
        let mut bug = Bug::open(draft(), Uuid::new_v4(), now);

        bug.apply(BugChange::Assign(Uuid::new_v4()), now).unwrap();
        let first = bug.updated_at;
        bug.apply(BugChange::Assign(Uuid::new_v4()), now).unwrap();

        assert!(first > now);
        assert!(bug.updated_at > first);
    }

    #[test]
    fn test_rejected_transition_leaves_bug_unchanged() {
        let now = Utc::now();
        let mut bug = Bug::open(draft(), Uuid::new_v4(), now);
        let before = bug.clone();

        let result = bug.apply(
            BugChange::Status {
                status: BugStatus::Resolved,
                workflow: StatusWorkflow::Strict,
            },
            now + Duration::seconds(5),
        );

        assert!(result.is_err());
        assert_eq!(bug, before);
    }

    #[test]
    fn test_draft_deserializes_with_defaults() {
        let draft: BugDraft =
            serde_json::from_str(r#"{"title":"t","description":"d"}"#).unwrap();
        assert_eq!(draft.priority, BugPriority::Medium);
        assert_eq!(draft.status, None);
        assert_eq!(draft.assigned_user_id, None);
    }
}
