use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::errors::ServiceError;

/// Organization as exchanged with callers; `org_id` is assigned on creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationDto {
    pub org_id: Option<i32>,
    pub org_name: String,
    pub org_email: String,
}

impl OrganizationDto {
    pub fn new(org_name: impl Into<String>, org_email: impl Into<String>) -> Self {
        Self { org_id: None, org_name: org_name.into(), org_email: org_email.into() }
    }

    pub(crate) fn validate(&self) -> Result<(), ServiceError> {
        if self.org_name.trim().is_empty() {
            return Err(ServiceError::Validation("organization name required".into()));
        }
        if self.org_email.trim().is_empty() {
            return Err(ServiceError::Validation("organization email required".into()));
        }
        Ok(())
    }
}

#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    async fn count(&self) -> Result<u64, ServiceError>;
    async fn create(&self, org_name: &str, org_email: &str) -> Result<OrganizationDto, ServiceError>;
}

pub struct OrganizationService<R: OrganizationRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: OrganizationRepository + ?Sized> OrganizationService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Create an organization; the returned DTO carries the assigned id.
    #[instrument(skip(self, dto), fields(org_name = %dto.org_name))]
    pub async fn create_organization(&self, dto: OrganizationDto) -> Result<OrganizationDto, ServiceError> {
        dto.validate()?;
        let created = self.repo.create(&dto.org_name, &dto.org_email).await?;
        info!(org_id = ?created.org_id, "organization_created");
        Ok(created)
    }

    pub async fn count(&self) -> Result<u64, ServiceError> { self.repo.count().await }
}
