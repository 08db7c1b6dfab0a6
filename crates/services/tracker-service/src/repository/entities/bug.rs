//! Bug database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use common::AppError;
use domain::{Bug, BugPriority, BugStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bugs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub status: String,
    pub priority: String,
    pub reporter_id: Uuid,
    pub assigned_user_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReporterId",
        to = "super::user::Column::Id"
    )]
    Reporter,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AssignedUserId",
        to = "super::user::Column::Id"
    )]
    Assignee,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Bug {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let corrupt = |e: domain::DomainError| {
            AppError::internal(format!("Corrupt bug row {}: {}", model.id, e))
        };
        let status: BugStatus = model.status.parse().map_err(corrupt)?;
        let priority: BugPriority = model.priority.parse().map_err(corrupt)?;

        Ok(Bug {
            id: model.id,
            title: model.title,
            description: model.description,
            status,
            priority,
            reporter_id: model.reporter_id,
            assigned_user_id: model.assigned_user_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Bug> for ActiveModel {
    fn from(bug: &Bug) -> Self {
        ActiveModel {
            id: Set(bug.id),
            title: Set(bug.title.clone()),
            description: Set(bug.description.clone()),
            status: Set(bug.status.as_str().to_string()),
            priority: Set(bug.priority.as_str().to_string()),
            reporter_id: Set(bug.reporter_id),
            assigned_user_id: Set(bug.assigned_user_id),
            created_at: Set(bug.created_at),
            updated_at: Set(bug.updated_at),
        }
    }
}
