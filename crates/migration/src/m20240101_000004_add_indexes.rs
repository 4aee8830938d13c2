use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Members: lookups by organization
        manager
            .create_index(
                Index::create()
                    .name("idx_member_org")
                    .table(Member::Table)
                    .col(Member::OrgId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Members: role membership queries
        manager
            .create_index(
                Index::create()
                    .name("idx_member_role")
                    .table(Member::Table)
                    .col(Member::RoleId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_member_role").table(Member::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_member_org").table(Member::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Member { Table, OrgId, RoleId }
