use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use tracing::debug;

use models::errors::ModelError;
use models::{member, organization, role};

use crate::auth::domain::MemberAccount;
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;
use crate::errors::ServiceError;
use crate::member_service::{MemberDto, MemberRepository, NewMemberRecord, EMAIL_TAKEN};
use crate::organization_service::{OrganizationDto, OrganizationRepository};
use crate::registration::repository::{RegisteredOrganization, RegistrationRepository};
use crate::role_service::{Role, RoleRepository};

/// SeaORM-backed implementation of every repository seam.
#[derive(Clone)]
pub struct SeaOrmStore {
    pub db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn db_err(e: sea_orm::DbErr) -> ServiceError { ServiceError::Db(e.to_string()) }

/// Unique violations on `member` can only come from the email column.
fn member_err(e: ModelError) -> ServiceError {
    match e {
        ModelError::Conflict(_) => ServiceError::Conflict(EMAIL_TAKEN.to_string()),
        other => other.into(),
    }
}

fn org_dto(m: organization::Model) -> OrganizationDto {
    OrganizationDto { org_id: Some(m.org_id), org_name: m.org_name, org_email: m.org_email }
}

fn member_dto(m: member::Model) -> MemberDto {
    MemberDto {
        member_id: Some(m.member_id),
        name: m.name,
        email: m.email,
        password: None,
        org_id: m.org_id,
        role_id: m.role_id,
    }
}

fn role_dto(m: role::Model) -> Role {
    Role { role_id: m.role_id, role_name: m.role_name }
}

async fn insert_member<C: ConnectionTrait>(db: &C, m: &NewMemberRecord) -> Result<MemberDto, ServiceError> {
    let created = member::create(db, member::NewMember {
        org_id: m.org_id,
        role_id: m.role_id,
        name: &m.name,
        email: &m.email,
        password_hash: &m.password_hash,
        password_algorithm: &m.password_algorithm,
    })
    .await
    .map_err(member_err)?;
    Ok(member_dto(created))
}

/// The registration steps, run against an open transaction.
async fn register_in<C: ConnectionTrait>(
    txn: &C,
    organization: &OrganizationDto,
    mut admin: NewMemberRecord,
    role_name: &str,
) -> Result<RegisteredOrganization, ServiceError> {
    let org = organization::create(txn, &organization.org_name, &organization.org_email).await?;
    debug!(org_id = org.org_id, "organization inserted");
    let role = role::find_by_name(txn, role_name)
        .await?
        .ok_or_else(|| ServiceError::role_missing(role_name))?;
    admin.org_id = org.org_id;
    admin.role_id = role.role_id;
    let member = insert_member(txn, &admin).await?;
    Ok(RegisteredOrganization { organization: org_dto(org), admin: member })
}

#[async_trait]
impl AuthRepository for SeaOrmStore {
    async fn find_account_by_email(&self, email: &str) -> Result<Option<MemberAccount>, AuthError> {
        let found = member::find_by_email_with_role(&self.db, email)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(found.map(|(m, r)| MemberAccount {
            member_id: m.member_id,
            org_id: m.org_id,
            name: m.name,
            email: m.email,
            role: r.map(|r| r.role_name).unwrap_or_default(),
            password_hash: m.password_hash,
        }))
    }
}

#[async_trait]
impl MemberRepository for SeaOrmStore {
    async fn exists_by_email(&self, email: &str) -> Result<bool, ServiceError> {
        Ok(member::exists_by_email(&self.db, email).await?)
    }

    async fn count(&self) -> Result<u64, ServiceError> {
        Ok(member::count(&self.db).await?)
    }

    async fn create(&self, m: NewMemberRecord) -> Result<MemberDto, ServiceError> {
        insert_member(&self.db, &m).await
    }
}

#[async_trait]
impl OrganizationRepository for SeaOrmStore {
    async fn count(&self) -> Result<u64, ServiceError> {
        Ok(organization::count(&self.db).await?)
    }

    async fn create(&self, org_name: &str, org_email: &str) -> Result<OrganizationDto, ServiceError> {
        Ok(org_dto(organization::create(&self.db, org_name, org_email).await?))
    }
}

#[async_trait]
impl RoleRepository for SeaOrmStore {
    async fn find_by_name(&self, role_name: &str) -> Result<Option<Role>, ServiceError> {
        Ok(role::find_by_name(&self.db, role_name).await?.map(role_dto))
    }

    async fn count(&self) -> Result<u64, ServiceError> {
        Ok(role::count(&self.db).await?)
    }

    async fn ensure(&self, role_name: &str) -> Result<Role, ServiceError> {
        Ok(role_dto(role::ensure(&self.db, role_name).await?))
    }
}

#[async_trait]
impl RegistrationRepository for SeaOrmStore {
    async fn create_organization_with_admin(
        &self,
        organization: &OrganizationDto,
        admin: NewMemberRecord,
        role_name: &str,
    ) -> Result<RegisteredOrganization, ServiceError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        match register_in(&txn, organization, admin, role_name).await {
            Ok(done) => {
                txn.commit().await.map_err(db_err)?;
                Ok(done)
            }
            Err(e) => {
                txn.rollback().await.map_err(db_err)?;
                Err(e)
            }
        }
    }
}
