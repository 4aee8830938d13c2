//! Create `member` table with FKs to `organization` and `role`.
//!
//! Email is unique across all organizations; the constraint is what actually
//! serializes concurrent registrations of the same address.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Member::Table)
                    .if_not_exists()
                    .col(pk_auto(Member::MemberId))
                    .col(integer(Member::OrgId).not_null())
                    .col(integer(Member::RoleId).not_null())
                    .col(string_len(Member::Name, 128).not_null())
                    .col(string_len(Member::Email, 255).unique_key().not_null())
                    .col(string_len(Member::PasswordHash, 255).not_null())
                    .col(string_len(Member::PasswordAlgorithm, 64).not_null())
                    .col(timestamp_with_time_zone(Member::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Member::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_member_organization")
                            .from(Member::Table, Member::OrgId)
                            .to(Organization::Table, Organization::OrgId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_member_role")
                            .from(Member::Table, Member::RoleId)
                            .to(Role::Table, Role::RoleId)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Member::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Member {
    Table,
    MemberId,
    OrgId,
    RoleId,
    Name,
    Email,
    PasswordHash,
    PasswordAlgorithm,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Organization { Table, OrgId }

#[derive(DeriveIden)]
enum Role { Table, RoleId }
