use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub role_id: i32,
    pub role_name: String,
}

#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Exact, case-sensitive name match.
    async fn find_by_name(&self, role_name: &str) -> Result<Option<Role>, ServiceError>;
    async fn count(&self) -> Result<u64, ServiceError>;
    /// Idempotent create.
    async fn ensure(&self, role_name: &str) -> Result<Role, ServiceError>;
}
