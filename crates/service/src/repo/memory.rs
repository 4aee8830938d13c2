//! In-memory store implementing every repository seam.
//!
//! Used by unit tests, the router integration tests and benchmarks. Ids are
//! assigned sequentially per table, and a registration runs against a copy of
//! the state that is swapped in only on success.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::auth::domain::MemberAccount;
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;
use crate::errors::ServiceError;
use crate::member_service::{MemberDto, MemberRepository, NewMemberRecord, EMAIL_TAKEN};
use crate::organization_service::{OrganizationDto, OrganizationRepository};
use crate::registration::repository::{RegisteredOrganization, RegistrationRepository};
use crate::role_service::{Role, RoleRepository};

/// Committed writes, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    OrganizationCreated(i32),
    RoleCreated(i32),
    MemberCreated(i32),
}

#[derive(Debug, Clone)]
struct MemberRow {
    member_id: i32,
    org_id: i32,
    role_id: i32,
    name: String,
    email: String,
    password_hash: String,
}

#[derive(Debug, Clone, Default)]
struct State {
    organizations: Vec<OrganizationDto>,
    roles: Vec<Role>,
    members: Vec<MemberRow>,
    journal: Vec<StoreEvent>,
}

impl State {
    fn next_id(len: usize) -> i32 { len as i32 + 1 }

    fn insert_organization(&mut self, org_name: &str, org_email: &str) -> OrganizationDto {
        let org = OrganizationDto {
            org_id: Some(Self::next_id(self.organizations.len())),
            org_name: org_name.to_string(),
            org_email: org_email.to_string(),
        };
        self.organizations.push(org.clone());
        self.journal.push(StoreEvent::OrganizationCreated(org.org_id.unwrap_or_default()));
        org
    }

    fn ensure_role(&mut self, role_name: &str) -> Role {
        if let Some(r) = self.roles.iter().find(|r| r.role_name == role_name) {
            return r.clone();
        }
        let role = Role { role_id: Self::next_id(self.roles.len()), role_name: role_name.to_string() };
        self.roles.push(role.clone());
        self.journal.push(StoreEvent::RoleCreated(role.role_id));
        role
    }

    fn insert_member(&mut self, m: NewMemberRecord) -> Result<MemberDto, ServiceError> {
        if self.members.iter().any(|row| row.email == m.email) {
            return Err(ServiceError::Conflict(EMAIL_TAKEN.to_string()));
        }
        if !self.organizations.iter().any(|o| o.org_id == Some(m.org_id)) {
            return Err(ServiceError::not_found("organization"));
        }
        if !self.roles.iter().any(|r| r.role_id == m.role_id) {
            return Err(ServiceError::not_found("role"));
        }
        let row = MemberRow {
            member_id: Self::next_id(self.members.len()),
            org_id: m.org_id,
            role_id: m.role_id,
            name: m.name,
            email: m.email,
            password_hash: m.password_hash,
        };
        self.journal.push(StoreEvent::MemberCreated(row.member_id));
        let dto = MemberDto {
            member_id: Some(row.member_id),
            name: row.name.clone(),
            email: row.email.clone(),
            password: None,
            org_id: row.org_id,
            role_id: row.role_id,
        };
        self.members.push(row);
        Ok(dto)
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    auth_lookups: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self { Self::default() }

    /// Store with the given roles already present. Seeding is not journaled.
    pub fn with_roles(roles: &[&str]) -> Self {
        let store = Self::default();
        {
            let mut state = store.lock();
            for r in roles {
                state.ensure_role(r);
            }
            state.journal.clear();
        }
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A panicking test thread must not wedge the others.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_available(&self) -> Result<(), ServiceError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ServiceError::Db("store unavailable".into()));
        }
        Ok(())
    }

    /// Make every subsequent call fail with a database error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// How many times the credential lookup ran.
    pub fn auth_lookups(&self) -> usize { self.auth_lookups.load(Ordering::SeqCst) }

    pub fn journal(&self) -> Vec<StoreEvent> { self.lock().journal.clone() }

    pub fn organization_count(&self) -> usize { self.lock().organizations.len() }

    pub fn member_count(&self) -> usize { self.lock().members.len() }

    pub fn role_id(&self, role_name: &str) -> Option<i32> {
        self.lock().roles.iter().find(|r| r.role_name == role_name).map(|r| r.role_id)
    }

    /// Direct insert for test setup; returns the new org id.
    pub fn insert_organization(&self, org_name: &str, org_email: &str) -> i32 {
        self.lock().insert_organization(org_name, org_email).org_id.unwrap_or_default()
    }
}

#[async_trait]
impl AuthRepository for InMemoryStore {
    async fn find_account_by_email(&self, email: &str) -> Result<Option<MemberAccount>, AuthError> {
        self.auth_lookups.fetch_add(1, Ordering::SeqCst);
        self.check_available().map_err(|e| AuthError::Repository(e.to_string()))?;
        let state = self.lock();
        let Some(row) = state.members.iter().find(|m| m.email == email) else {
            return Ok(None);
        };
        let role = state
            .roles
            .iter()
            .find(|r| r.role_id == row.role_id)
            .map(|r| r.role_name.clone())
            .unwrap_or_default();
        Ok(Some(MemberAccount {
            member_id: row.member_id,
            org_id: row.org_id,
            name: row.name.clone(),
            email: row.email.clone(),
            role,
            password_hash: row.password_hash.clone(),
        }))
    }
}

#[async_trait]
impl MemberRepository for InMemoryStore {
    async fn exists_by_email(&self, email: &str) -> Result<bool, ServiceError> {
        self.check_available()?;
        Ok(self.lock().members.iter().any(|m| m.email == email))
    }

    async fn count(&self) -> Result<u64, ServiceError> {
        self.check_available()?;
        Ok(self.lock().members.len() as u64)
    }

    async fn create(&self, member: NewMemberRecord) -> Result<MemberDto, ServiceError> {
        self.check_available()?;
        self.lock().insert_member(member)
    }
}

#[async_trait]
impl OrganizationRepository for InMemoryStore {
    async fn count(&self) -> Result<u64, ServiceError> {
        self.check_available()?;
        Ok(self.lock().organizations.len() as u64)
    }

    async fn create(&self, org_name: &str, org_email: &str) -> Result<OrganizationDto, ServiceError> {
        self.check_available()?;
        Ok(self.lock().insert_organization(org_name, org_email))
    }
}

#[async_trait]
impl RoleRepository for InMemoryStore {
    async fn find_by_name(&self, role_name: &str) -> Result<Option<Role>, ServiceError> {
        self.check_available()?;
        Ok(self.lock().roles.iter().find(|r| r.role_name == role_name).cloned())
    }

    async fn count(&self) -> Result<u64, ServiceError> {
        self.check_available()?;
        Ok(self.lock().roles.len() as u64)
    }

    async fn ensure(&self, role_name: &str) -> Result<Role, ServiceError> {
        self.check_available()?;
        Ok(self.lock().ensure_role(role_name))
    }
}

#[async_trait]
impl RegistrationRepository for InMemoryStore {
    async fn create_organization_with_admin(
        &self,
        organization: &OrganizationDto,
        mut admin: NewMemberRecord,
        role_name: &str,
    ) -> Result<RegisteredOrganization, ServiceError> {
        self.check_available()?;
        let mut state = self.lock();
        let mut txn = state.clone();

        let org = txn.insert_organization(&organization.org_name, &organization.org_email);
        let role = txn
            .roles
            .iter()
            .find(|r| r.role_name == role_name)
            .cloned()
            .ok_or_else(|| ServiceError::role_missing(role_name))?;
        admin.org_id = org.org_id.unwrap_or_default();
        admin.role_id = role.role_id;
        let member = txn.insert_member(admin)?;

        *state = txn;
        Ok(RegisteredOrganization { organization: org, admin: member })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(email: &str) -> NewMemberRecord {
        NewMemberRecord {
            name: "Ada".into(),
            email: email.into(),
            password_hash: "h".into(),
            password_algorithm: "argon2".into(),
            org_id: 0,
            role_id: 0,
        }
    }

    #[tokio::test]
    async fn counts_track_writes() {
        let store = InMemoryStore::with_roles(&["Admin", "Member"]);
        assert_eq!(RoleRepository::count(&store).await.unwrap(), 2);
        assert_eq!(OrganizationRepository::count(&store).await.unwrap(), 0);

        let org = OrganizationDto::new("Acme", "ops@acme.io");
        store.create_organization_with_admin(&org, record("a@acme.io"), "Admin").await.unwrap();
        assert_eq!(OrganizationRepository::count(&store).await.unwrap(), 1);
        assert_eq!(MemberRepository::count(&store).await.unwrap(), 1);
        assert!(store.exists_by_email("a@acme.io").await.unwrap());
    }

    #[tokio::test]
    async fn ensure_role_is_idempotent() {
        let store = InMemoryStore::new();
        let a = store.ensure("Admin").await.unwrap();
        let b = store.ensure("Admin").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(store.journal(), vec![StoreEvent::RoleCreated(a.role_id)]);
    }

    #[tokio::test]
    async fn account_lookup_resolves_role_name() {
        let store = InMemoryStore::with_roles(&["Admin"]);
        let org = OrganizationDto::new("Acme", "ops@acme.io");
        store.create_organization_with_admin(&org, record("a@acme.io"), "Admin").await.unwrap();

        let acct = store.find_account_by_email("a@acme.io").await.unwrap().unwrap();
        assert_eq!(acct.role, "Admin");
        assert!(store.find_account_by_email("A@acme.io").await.unwrap().is_none());
        assert_eq!(store.auth_lookups(), 2);
    }

    #[tokio::test]
    async fn unavailable_fails_every_call() {
        let store = InMemoryStore::with_roles(&["Admin"]);
        store.set_unavailable(true);
        assert!(matches!(store.exists_by_email("x@y.z").await, Err(ServiceError::Db(_))));
        assert!(matches!(RoleRepository::count(&store).await, Err(ServiceError::Db(_))));
        assert!(matches!(store.find_account_by_email("x@y.z").await, Err(AuthError::Repository(_))));
        store.set_unavailable(false);
        assert!(store.find_by_name("Admin").await.unwrap().is_some());
    }
}
