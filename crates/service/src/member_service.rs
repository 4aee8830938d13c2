use std::sync::Arc;

use async_trait::async_trait;
use models::validation;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::auth::password::{hash_password, PASSWORD_ALGORITHM};
use crate::errors::ServiceError;

/// Reported when a member email is already taken.
pub const EMAIL_TAKEN: &str = "Email already registered. Please use a different email.";

/// Shortest accepted plain-text password, in UTF-16 code units.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Member as exchanged with callers. The password is write-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDto {
    pub member_id: Option<i32>,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    pub org_id: i32,
    pub role_id: i32,
}

impl MemberDto {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>, org_id: i32, role_id: i32) -> Self {
        Self {
            member_id: None,
            name: name.into(),
            email: email.into(),
            password: Some(password.into()),
            org_id,
            role_id,
        }
    }
}

/// Insert payload handed to the store; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewMemberRecord {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub password_algorithm: String,
    pub org_id: i32,
    pub role_id: i32,
}

impl NewMemberRecord {
    /// Validate identity fields and hash the password. Ids are copied as-is.
    pub fn from_dto(dto: &MemberDto) -> Result<Self, ServiceError> {
        validation::validate_name(&dto.name)?;
        validation::validate_email(&dto.email)?;
        let password = dto.password.as_deref().unwrap_or_default();
        if validation::utf16_len(password) < MIN_PASSWORD_LEN {
            return Err(ServiceError::Validation(format!("password must be at least {MIN_PASSWORD_LEN} characters")));
        }
        let password_hash = hash_password(password).map_err(|e| ServiceError::Hash(e.to_string()))?;
        Ok(Self {
            name: dto.name.clone(),
            email: dto.email.clone(),
            password_hash,
            password_algorithm: PASSWORD_ALGORITHM.to_string(),
            org_id: dto.org_id,
            role_id: dto.role_id,
        })
    }
}

#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn exists_by_email(&self, email: &str) -> Result<bool, ServiceError>;
    async fn count(&self) -> Result<u64, ServiceError>;
    /// Fails with [`ServiceError::Conflict`] when the email is taken.
    async fn create(&self, member: NewMemberRecord) -> Result<MemberDto, ServiceError>;
}

pub struct MemberService<R: MemberRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: MemberRepository + ?Sized> MemberService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Create a member with a hashed password under an existing organization and role.
    #[instrument(skip(self, dto), fields(email = %dto.email, org_id = dto.org_id, role_id = dto.role_id))]
    pub async fn create_member(&self, dto: MemberDto) -> Result<MemberDto, ServiceError> {
        let record = NewMemberRecord::from_dto(&dto)?;
        let created = self.repo.create(record).await?;
        info!(member_id = ?created.member_id, "member_created");
        Ok(created)
    }

    pub async fn exists_by_email(&self, email: &str) -> Result<bool, ServiceError> {
        self.repo.exists_by_email(email).await
    }

    pub async fn count(&self) -> Result<u64, ServiceError> { self.repo.count().await }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_store;

    #[tokio::test]
    async fn creates_member_without_echoing_password() {
        let store = memory_store();
        let org_id = store.insert_organization("Acme", "ops@acme.io");
        let role_id = store.role_id("Admin").unwrap();
        let svc = MemberService::new(store.clone());

        let created = svc.create_member(MemberDto::new("Ada", "ada@acme.io", "secret1", org_id, role_id)).await.unwrap();
        assert!(created.member_id.is_some());
        assert_eq!(created.password, None);
        assert_eq!(created.role_id, role_id);
        assert!(svc.exists_by_email("ada@acme.io").await.unwrap());
        assert_eq!(svc.count().await.unwrap(), 1);

        let json = serde_json::to_value(&created).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["orgId"], org_id);
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let store = memory_store();
        let org_id = store.insert_organization("Acme", "ops@acme.io");
        let role_id = store.role_id("Admin").unwrap();
        let svc = MemberService::new(store.clone());
        svc.create_member(MemberDto::new("Ada", "ada@acme.io", "secret1", org_id, role_id)).await.unwrap();

        let err = svc.create_member(MemberDto::new("Ada 2", "ada@acme.io", "secret2", org_id, role_id)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(ref m) if m == EMAIL_TAKEN));
        assert_eq!(svc.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn password_length_counts_utf16_units() {
        let store = memory_store();
        let org_id = store.insert_organization("Acme", "ops@acme.io");
        let role_id = store.role_id("Admin").unwrap();
        let svc = MemberService::new(store.clone());

        let short = svc.create_member(MemberDto::new("Ada", "ada@acme.io", "12345", org_id, role_id)).await;
        assert!(matches!(short, Err(ServiceError::Validation(_))));
        // six characters, more than six bytes
        let ok = svc.create_member(MemberDto::new("Ada", "ada@acme.io", "pässwö", org_id, role_id)).await;
        assert!(ok.is_ok());
        // three characters, six UTF-16 units
        let astral = svc.create_member(MemberDto::new("Bo", "bo@acme.io", "😀😀😀", org_id, role_id)).await;
        assert!(astral.is_ok());
    }

    #[tokio::test]
    async fn unknown_org_or_role_is_rejected_by_store() {
        let store = memory_store();
        let role_id = store.role_id("Admin").unwrap();
        let svc = MemberService::new(store.clone());
        let err = svc.create_member(MemberDto::new("Ada", "ada@acme.io", "secret1", 999, role_id)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
