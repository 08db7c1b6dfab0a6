//! Repository layer for data access.
//!
//! One trait per entity, with a SeaORM implementation for PostgreSQL and a
//! shared in-memory implementation.

mod bug_repository;
mod comment_repository;
pub mod entities;
mod memory;
mod user_repository;

pub use bug_repository::{BugRepository, BugStore};
pub use comment_repository::{CommentRepository, CommentStore};
pub use memory::InMemoryStore;
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use bug_repository::MockBugRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use comment_repository::MockCommentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
