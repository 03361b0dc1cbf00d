//! Migration to create membres table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Membres::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Membres::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Membres::UserId).integer().null())
                    .col(ColumnDef::new(Membres::Nom).string_len(100).not_null())
                    .col(ColumnDef::new(Membres::Prenom).string_len(100).not_null())
                    .col(ColumnDef::new(Membres::Numero).string_len(20).not_null())
                    .col(ColumnDef::new(Membres::Quartier).string_len(255).not_null())
                    .col(ColumnDef::new(Membres::Service).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Membres::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_membres_user")
                            .from(Membres::Table, Membres::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_membres_user_id")
                    .table(Membres::Table)
                    .col(Membres::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_membres_service")
                    .table(Membres::Table)
                    .col(Membres::Service)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Membres::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Membres {
    Table,
    Id,
    UserId,
    Nom,
    Prenom,
    Numero,
    Quartier,
    Service,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
