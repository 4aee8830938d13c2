use async_trait::async_trait;
use serde::Serialize;

use crate::errors::ServiceError;
use crate::member_service::{MemberDto, NewMemberRecord};
use crate::organization_service::OrganizationDto;

/// Result of a committed registration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredOrganization {
    pub organization: OrganizationDto,
    pub admin: MemberDto,
}

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// In one transaction: insert the organization, resolve `role_name`, then
    /// insert the admin with the new org id and that role id. Nothing is
    /// persisted unless every step succeeds.
    ///
    /// `admin.org_id` and `admin.role_id` are ignored.
    async fn create_organization_with_admin(
        &self,
        organization: &OrganizationDto,
        admin: NewMemberRecord,
        role_name: &str,
    ) -> Result<RegisteredOrganization, ServiceError>;
}
