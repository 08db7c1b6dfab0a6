//! Comment domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::MAX_COMMENT_LENGTH;
use crate::error::{DomainError, DomainResult};

/// A note attached to exactly one bug. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Comment {
    pub id: Uuid,
    pub bug_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(bug_id: Uuid, author_id: Uuid, content: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            bug_id,
            author_id,
            content,
            created_at,
        }
    }

    /// Blank content (after trimming) is `EmptyContent`; anything longer than
    /// [`MAX_COMMENT_LENGTH`] characters is a validation error.
    pub fn validate_content(content: &str) -> DomainResult<()> {
        if content.trim().is_empty() {
            return Err(DomainError::EmptyContent);
        }
        if content.chars().count() > MAX_COMMENT_LENGTH {
            return Err(DomainError::validation(format!(
                "Comment must be at most {} characters",
                MAX_COMMENT_LENGTH
            )));
        }
        Ok(())
    }
}
