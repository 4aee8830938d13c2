use std::sync::Arc;

use crate::auth::repository::AuthRepository;
use crate::auth::service::{AuthConfig, AuthService};
use crate::member_service::{MemberRepository, MemberService};
use crate::organization_service::{OrganizationRepository, OrganizationService};
use crate::registration::repository::RegistrationRepository;
use crate::registration::RegistrationService;
use crate::role_service::RoleRepository;

/// Every collaborator the HTTP layer talks to, backed by one store.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<AuthService<dyn AuthRepository>>,
    pub members: Arc<MemberService<dyn MemberRepository>>,
    pub organizations: Arc<OrganizationService<dyn OrganizationRepository>>,
    pub roles: Arc<dyn RoleRepository>,
    pub registration: Arc<RegistrationService<dyn RegistrationRepository>>,
}

impl Services {
    pub fn from_store<S>(store: Arc<S>, auth: AuthConfig) -> Self
    where
        S: AuthRepository + MemberRepository + OrganizationRepository + RoleRepository + RegistrationRepository + 'static,
    {
        let auth_repo: Arc<dyn AuthRepository> = store.clone();
        let member_repo: Arc<dyn MemberRepository> = store.clone();
        let org_repo: Arc<dyn OrganizationRepository> = store.clone();
        let registration_repo: Arc<dyn RegistrationRepository> = store.clone();
        let roles: Arc<dyn RoleRepository> = store;
        Self {
            auth: Arc::new(AuthService::new(auth_repo, auth)),
            members: Arc::new(MemberService::new(member_repo)),
            organizations: Arc::new(OrganizationService::new(org_repo)),
            roles,
            registration: Arc::new(RegistrationService::new(registration_repo)),
        }
    }
}
