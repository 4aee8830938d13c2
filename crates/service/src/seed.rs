//! Startup seeding: required roles and the optional demo account.

use tracing::{info, instrument};

use configs::{SeedConfig, ADMIN_ROLE};

use crate::errors::ServiceError;
use crate::member_service::MemberDto;
use crate::organization_service::OrganizationDto;
use crate::role_service::Role;
use crate::services::Services;

pub const DEMO_ORGANIZATION: &str = "Demo Organization";

/// Ensure every configured role exists. Returns them in config order.
#[instrument(skip(services, roles), fields(count = roles.len()))]
pub async fn ensure_roles(services: &Services, roles: &[String]) -> Result<Vec<Role>, ServiceError> {
    let mut out = Vec::with_capacity(roles.len());
    for name in roles {
        out.push(services.roles.ensure(name).await?);
    }
    info!(roles = ?out.iter().map(|r| r.role_name.as_str()).collect::<Vec<_>>(), "roles_ready");
    Ok(out)
}

/// Create `check_email` as admin of a demo organization unless it already exists.
///
/// Returns `true` when the account was created by this call.
#[instrument(skip(services, password))]
pub async fn ensure_demo_account(services: &Services, check_email: &str, password: &str) -> Result<bool, ServiceError> {
    if services.members.exists_by_email(check_email).await? {
        return Ok(false);
    }
    let admin_role = services
        .roles
        .find_by_name(ADMIN_ROLE)
        .await?
        .ok_or_else(|| ServiceError::role_missing(ADMIN_ROLE))?;
    let org = services
        .organizations
        .create_organization(OrganizationDto::new(DEMO_ORGANIZATION, check_email))
        .await?;
    let org_id = org.org_id.ok_or_else(|| ServiceError::Db("organization id not assigned".into()))?;
    services
        .members
        .create_member(MemberDto::new("Demo Admin", check_email, password, org_id, admin_role.role_id))
        .await?;
    info!(%check_email, org_id, "demo_account_created");
    Ok(true)
}

/// Everything configured under `[seed]`.
pub async fn run(services: &Services, seed: &SeedConfig, check_email: &str) -> Result<(), ServiceError> {
    ensure_roles(services, &seed.roles).await?;
    if seed.demo_account {
        ensure_demo_account(services, check_email, &seed.demo_password).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::domain::LoginInput;
    use crate::auth::service::AuthConfig;
    use crate::repo::memory::InMemoryStore;
    use std::sync::Arc;

    fn services() -> (Arc<InMemoryStore>, Services) {
        let store = Arc::new(InMemoryStore::new());
        let services = Services::from_store(store.clone(), AuthConfig::new("k", 1));
        (store, services)
    }

    #[tokio::test]
    async fn roles_are_seeded_once() {
        let (store, services) = services();
        let roles = vec!["Admin".to_string(), "Member".to_string()];
        let first = ensure_roles(&services, &roles).await.unwrap();
        let second = ensure_roles(&services, &roles).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(store.role_id("Admin"), Some(first[0].role_id));
    }

    #[tokio::test]
    async fn demo_account_can_log_in_and_is_not_recreated() {
        let (_store, services) = services();
        let seed = SeedConfig { demo_account: true, ..Default::default() };
        run(&services, &seed, "admin@test.com").await.unwrap();
        assert!(!ensure_demo_account(&services, "admin@test.com", "admin123").await.unwrap());
        assert_eq!(services.organizations.count().await.unwrap(), 1);

        let res = services
            .auth
            .authenticate(LoginInput { email: "admin@test.com".into(), password: seed.demo_password.clone() })
            .await
            .unwrap();
        assert_eq!(res.role, "Admin");
    }

    #[tokio::test]
    async fn demo_account_needs_admin_role() {
        let (_store, services) = services();
        let err = ensure_demo_account(&services, "admin@test.com", "admin123").await.unwrap_err();
        assert!(err.to_string().contains("Admin role not found"));
        assert_eq!(services.organizations.count().await.unwrap(), 0);
    }
}
