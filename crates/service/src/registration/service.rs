use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::errors::ServiceError;
use crate::member_service::{MemberDto, NewMemberRecord};
use crate::organization_service::OrganizationDto;

use super::repository::{RegisteredOrganization, RegistrationRepository};

pub struct RegistrationService<R: RegistrationRepository + ?Sized> {
    repo: Arc<R>,
    admin_role: String,
}

impl<R: RegistrationRepository + ?Sized> RegistrationService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo, admin_role: configs::ADMIN_ROLE.to_string() }
    }

    /// Create `organization` and `admin` atomically; the admin gets the
    /// `Admin` role and the new organization's id.
    ///
    /// # Examples
    /// ```
    /// use service::registration::RegistrationService;
    /// use service::organization_service::OrganizationDto;
    /// use service::member_service::MemberDto;
    /// use service::repo::memory::InMemoryStore;
    /// use std::sync::Arc;
    /// let store = Arc::new(InMemoryStore::with_roles(&["Admin"]));
    /// let svc = RegistrationService::new(store.clone());
    /// let admin = MemberDto::new("Ada", "ada@acme.io", "secret1", 0, 0);
    /// let out = tokio_test::block_on(svc.register(OrganizationDto::new("Acme", "ops@acme.io"), admin)).unwrap();
    /// assert_eq!(out.admin.org_id, out.organization.org_id.unwrap());
    /// assert_eq!(Some(out.admin.role_id), store.role_id("Admin"));
    /// ```
    #[instrument(skip(self, organization, admin), fields(org_name = %organization.org_name, admin_email = %admin.email))]
    pub async fn register(&self, organization: OrganizationDto, admin: MemberDto) -> Result<RegisteredOrganization, ServiceError> {
        organization.validate()?;
        let record = NewMemberRecord::from_dto(&admin)?;
        match self.repo.create_organization_with_admin(&organization, record, &self.admin_role).await {
            Ok(done) => {
                info!(org_id = ?done.organization.org_id, member_id = ?done.admin.member_id, "organization_registered");
                Ok(done)
            }
            Err(e) => {
                warn!(error = %e, "registration rolled back");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member_service::EMAIL_TAKEN;
    use crate::repo::memory::{InMemoryStore, StoreEvent};
    use crate::test_support::memory_store;

    fn admin(email: &str) -> MemberDto {
        MemberDto::new("Ada", email, "secret1", 0, 0)
    }

    #[tokio::test]
    async fn organization_is_created_before_admin() {
        let store = memory_store();
        let svc = RegistrationService::new(store.clone());
        let out = svc.register(OrganizationDto::new("Acme", "ops@acme.io"), admin("ada@acme.io")).await.unwrap();

        let org_id = out.organization.org_id.unwrap();
        let member_id = out.admin.member_id.unwrap();
        assert_eq!(
            store.journal(),
            vec![StoreEvent::OrganizationCreated(org_id), StoreEvent::MemberCreated(member_id)]
        );
        assert_eq!(out.admin.role_id, store.role_id("Admin").unwrap());
        assert_eq!(out.admin.org_id, org_id);
    }

    #[tokio::test]
    async fn missing_admin_role_leaves_no_orphan() {
        let store = Arc::new(InMemoryStore::with_roles(&["Member"]));
        let svc = RegistrationService::new(store.clone());
        let err = svc.register(OrganizationDto::new("Acme", "ops@acme.io"), admin("ada@acme.io")).await.unwrap_err();

        assert!(err.to_string().contains("Admin role not found"), "{err}");
        assert_eq!(store.organization_count(), 0);
        assert_eq!(store.member_count(), 0);
        assert!(store.journal().is_empty());
    }

    #[tokio::test]
    async fn email_taken_inside_transaction_rolls_back_organization() {
        let store = memory_store();
        let svc = RegistrationService::new(store.clone());
        svc.register(OrganizationDto::new("Acme", "ops@acme.io"), admin("ada@acme.io")).await.unwrap();

        let err = svc.register(OrganizationDto::new("Globex", "hq@globex.io"), admin("ada@acme.io")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(ref m) if m == EMAIL_TAKEN));
        assert_eq!(store.organization_count(), 1);
        assert_eq!(store.member_count(), 1);
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_store() {
        let store = memory_store();
        let svc = RegistrationService::new(store.clone());
        let short = MemberDto::new("Ada", "ada@acme.io", "12345", 0, 0);
        assert!(matches!(
            svc.register(OrganizationDto::new("Acme", "ops@acme.io"), short).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            svc.register(OrganizationDto::new("", "ops@acme.io"), admin("ada@acme.io")).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(store.journal().is_empty());
    }
}
