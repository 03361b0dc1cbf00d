//! Migration to create presences table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Presences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Presences::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Presences::MembreId).integer().not_null())
                    .col(ColumnDef::new(Presences::BergerId).integer().not_null())
                    .col(ColumnDef::new(Presences::Date).date().not_null())
                    .col(
                        ColumnDef::new(Presences::Present)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Presences::Commentaire).text().null())
                    .col(
                        ColumnDef::new(Presences::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_presences_membre")
                            .from(Presences::Table, Presences::MembreId)
                            .to(Membres::Table, Membres::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_presences_membre_date")
                    .table(Presences::Table)
                    .col(Presences::MembreId)
                    .col(Presences::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_presences_date")
                    .table(Presences::Table)
                    .col(Presences::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Presences::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Presences {
    Table,
    Id,
    MembreId,
    BergerId,
    Date,
    Present,
    Commentaire,
    CreatedAt,
}

#[derive(Iden)]
enum Membres {
    Table,
    Id,
}
