//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! users and their roles, bugs and their lifecycle, comments.

pub mod bug;
pub mod comment;
pub mod constants;
pub mod error;
pub mod password;
pub mod user;

pub use bug::{Bug, BugChange, BugDraft, BugPatch, BugPriority, BugStatus, StatusWorkflow};
pub use comment::Comment;
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use password::Password;
pub use user::{CreateUser, User, UserResponse, UserRole};
