//! Create `organization` table.
//!
//! Root entity for multi-tenancy; members reference it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Organization::Table)
                    .if_not_exists()
                    .col(pk_auto(Organization::OrgId))
                    .col(string_len(Organization::OrgName, 128).not_null())
                    .col(string_len(Organization::OrgEmail, 255).not_null())
                    .col(timestamp_with_time_zone(Organization::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Organization::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Organization { Table, OrgId, OrgName, OrgEmail, CreatedAt }
