//! User domain entity and related types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{ROLE_ADMIN, ROLE_QA, ROLE_USER};
use crate::error::{DomainError, DomainResult};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    #[default]
    User,
    Qa,
    Admin,
}

/// Literal-to-role mapping. Anything outside this table is rejected.
const ROLE_TABLE: &[(&str, UserRole)] = &[
    (ROLE_USER, UserRole::User),
    (ROLE_QA, UserRole::Qa),
    (ROLE_ADMIN, UserRole::Admin),
];

impl UserRole {
    /// QA and ADMIN may list every bug, assign bugs and change status.
    pub fn can_triage(&self) -> bool {
        matches!(self, UserRole::Qa | UserRole::Admin)
    }

    /// Canonical literal, as stored and serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => ROLE_USER,
            UserRole::Qa => ROLE_QA,
            UserRole::Admin => ROLE_ADMIN,
        }
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let literal = s.trim();
        ROLE_TABLE
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(literal))
            .map(|(_, role)| *role)
            .ok_or_else(|| DomainError::validation(format!("Unknown role: {}", s)))
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh id.
    pub fn new(
        email: String,
        password_hash: String,
        full_name: String,
        role: UserRole,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            full_name,
            role,
            created_at,
        }
    }

    /// Fail with `Forbidden` unless the user holds a triage role.
    pub fn ensure_can_triage(&self) -> DomainResult<()> {
        if self.role.can_triage() {
            Ok(())
        } else {
            Err(DomainError::Forbidden)
        }
    }
}

/// User registration data transfer object
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    /// User email address
    pub email: String,
    /// User password (minimum 8 characters)
    pub password: String,
    /// User display name
    pub full_name: String,
    /// Requested role, USER when absent
    pub role: Option<UserRole>,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserResponse {
    /// Unique user identifier
    pub id: Uuid,
    /// User email address
    pub email: String,
    /// User display name
    pub full_name: String,
    /// User role
    pub role: UserRole,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing_is_case_insensitive() {
        assert_eq!("QA".parse::<UserRole>().unwrap(), UserRole::Qa);
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!(" user ".parse::<UserRole>().unwrap(), UserRole::User);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let err = "REPORTER".parse::<UserRole>().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_triage_roles() {
        assert!(!UserRole::User.can_triage());
        assert!(UserRole::Qa.can_triage());
        assert!(UserRole::Admin.can_triage());
    }

    #[test]
    fn test_ensure_can_triage() {
        let mut user = User::new(
            "r@example.com".to_string(),
            "hash".to_string(),
            "Reporter".to_string(),
            UserRole::User,
            Utc::now(),
        );
        assert_eq!(user.ensure_can_triage(), Err(DomainError::Forbidden));

        user.role = UserRole::Qa;
        assert!(user.ensure_can_triage().is_ok());
    }

    #[test]
    fn test_serialization_hides_password_hash() {
        let user = User::new(
            "q@example.com".to_string(),
            "secret-hash".to_string(),
            "Quinn".to_string(),
            UserRole::Qa,
            Utc::now(),
        );
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("\"QA\""));
    }
}
