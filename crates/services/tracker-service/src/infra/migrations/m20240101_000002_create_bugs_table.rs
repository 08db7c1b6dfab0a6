//! Migration: Create bugs table.

use sea_orm_migration::prelude::*;

use domain::MAX_TITLE_LENGTH;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bugs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bugs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Bugs::Title).string_len(MAX_TITLE_LENGTH as u32).not_null())
                    .col(ColumnDef::new(Bugs::Description).text().not_null())
                    .col(ColumnDef::new(Bugs::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Bugs::Priority).string_len(16).not_null())
                    .col(ColumnDef::new(Bugs::ReporterId).uuid().not_null())
                    .col(ColumnDef::new(Bugs::AssignedUserId).uuid().null())
                    .col(
                        ColumnDef::new(Bugs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bugs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bugs_reporter_id")
                            .from(Bugs::Table, Bugs::ReporterId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bugs_assigned_user_id")
                            .from(Bugs::Table, Bugs::AssignedUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bugs_reporter_id")
                    .table(Bugs::Table)
                    .col(Bugs::ReporterId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bugs_assigned_user_id")
                    .table(Bugs::Table)
                    .col(Bugs::AssignedUserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bugs_status_created_at")
                    .table(Bugs::Table)
                    .col(Bugs::Status)
                    .col(Bugs::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bugs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Bugs {
    Table,
    Id,
    Title,
    Description,
    Status,
    Priority,
    ReporterId,
    AssignedUserId,
    CreatedAt,
    UpdatedAt,
}
