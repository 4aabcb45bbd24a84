use sea_orm_migration::prelude::*;

use super::m20250601_000000_init::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Deadlines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Deadlines::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Deadlines::UserId).string().not_null())
                    .col(ColumnDef::new(Deadlines::Title).string().not_null())
                    .col(ColumnDef::new(Deadlines::AmountMinor).big_integer().not_null())
                    .col(ColumnDef::new(Deadlines::Category).string().not_null())
                    .col(ColumnDef::new(Deadlines::Notes).string())
                    .col(ColumnDef::new(Deadlines::StartDate).date().not_null())
                    .col(ColumnDef::new(Deadlines::EndDate).date().not_null())
                    .col(ColumnDef::new(Deadlines::RemindTime).time().not_null())
                    .col(
                        ColumnDef::new(Deadlines::RemindAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Deadlines::NotifiedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Deadlines::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-deadlines-user_id")
                            .from(Deadlines::Table, Deadlines::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-deadlines-notified_at-remind_at")
                    .table(Deadlines::Table)
                    .col(Deadlines::NotifiedAt)
                    .col(Deadlines::RemindAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Deadlines::Table).to_owned())
            .await
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(Iden)]
pub enum Deadlines {
    Table,
    Id,
    UserId,
    Title,
    AmountMinor,
    Category,
    Notes,
    StartDate,
    EndDate,
    RemindTime,
    RemindAt,
    NotifiedAt,
    CreatedAt,
}
