//! Comment database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::Comment;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub bug_id: Uuid,
    /// Author of the comment
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bug::Entity",
        from = "Column::BugId",
        to = "super::bug::Column::Id"
    )]
    Bug,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    Author,
}

impl Related<super::bug::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bug.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Comment {
    fn from(model: Model) -> Self {
        Comment {
            id: model.id,
            bug_id: model.bug_id,
            author_id: model.user_id,
            content: model.content,
            created_at: model.created_at,
        }
    }
}

impl From<&Comment> for ActiveModel {
    fn from(comment: &Comment) -> Self {
        ActiveModel {
            id: Set(comment.id),
            bug_id: Set(comment.bug_id),
            user_id: Set(comment.author_id),
            content: Set(comment.content.clone()),
            created_at: Set(comment.created_at),
        }
    }
}
