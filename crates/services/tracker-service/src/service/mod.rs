//! Tracker business logic.

mod bug_lifecycle;
mod comment_thread;
mod container;
mod identity_directory;
mod registration;

pub use bug_lifecycle::{BugLifecycle, BugTracker};
pub use comment_thread::{CommentThread, Discussion};
pub use container::TrackerServices;
pub use identity_directory::{Directory, IdentityDirectory};
pub use registration::{Registrar, RegistrationService};
