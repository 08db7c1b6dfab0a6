//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod bug;
pub mod comment;
pub mod user;

pub use bug::{ActiveModel as BugActiveModel, Entity as BugEntity, Model as BugModel};
pub use comment::{ActiveModel as CommentActiveModel, Entity as CommentEntity, Model as CommentModel};
pub use user::{ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel};
