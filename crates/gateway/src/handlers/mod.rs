//! HTTP handlers.

pub mod bug_handler;
pub mod comment_handler;
pub mod health_handler;
pub mod user_handler;

pub use bug_handler::bug_routes;
pub use comment_handler::{bug_comment_routes, comment_routes};
pub use health_handler::health_routes;
pub use user_handler::{registration_routes, user_routes};
