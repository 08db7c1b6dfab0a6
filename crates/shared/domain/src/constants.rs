//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// User Roles
// =============================================================================

/// Default role assigned to new users
pub const ROLE_USER: &str = "USER";

/// Quality assurance role, allowed to triage bugs
pub const ROLE_QA: &str = "QA";

/// Administrator role with elevated privileges
pub const ROLE_ADMIN: &str = "ADMIN";

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum bug title length (matches the column size)
pub const MAX_TITLE_LENGTH: usize = 255;

/// Maximum comment length, in characters
pub const MAX_COMMENT_LENGTH: usize = 1000;

// =============================================================================
// Authentication
// =============================================================================

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;
