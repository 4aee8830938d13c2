use async_trait::async_trait;

use super::domain::MemberAccount;
use super::errors::AuthError;

/// Repository abstraction for credential lookups.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Exact email match; the role name is resolved alongside the member.
    async fn find_account_by_email(&self, email: &str) -> Result<Option<MemberAccount>, AuthError>;
}
