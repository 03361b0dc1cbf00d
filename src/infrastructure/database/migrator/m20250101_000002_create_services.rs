//! Migration to create the department catalogue (`services` table)

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Services::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Services::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Services::Nom)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Services::NomCourt)
                            .string_len(50)
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Services::Description).text().null())
                    .col(ColumnDef::new(Services::ResponsableId).integer().null())
                    .col(
                        ColumnDef::new(Services::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_services_responsable")
                            .from(Services::Table, Services::ResponsableId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Services::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Services {
    Table,
    Id,
    Nom,
    NomCourt,
    Description,
    ResponsableId,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
