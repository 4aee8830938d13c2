#![cfg(test)]
use std::sync::Arc;

use crate::member_service::{MemberDto, MemberService};
use crate::repo::memory::InMemoryStore;
use crate::repo::seaorm::SeaOrmStore;
use crate::role_service::RoleRepository;

/// In-memory store seeded with the default roles.
pub fn memory_store() -> Arc<InMemoryStore> {
    Arc::new(InMemoryStore::with_roles(&["Admin", "Manager", "Member"]))
}

/// Organization plus one member with `role`; returns `(org_id, member_id)`.
pub async fn seed_member(store: &Arc<InMemoryStore>, email: &str, password: &str, role: &str) -> (i32, i32) {
    let org_id = store.insert_organization("Acme", "ops@acme.io");
    let role_id = store.role_id(role).expect("role seeded");
    let created = MemberService::new(store.clone())
        .create_member(MemberDto::new("Ada", email, password, org_id, role_id))
        .await
        .expect("seed member");
    (org_id, created.member_id.expect("member id"))
}

/// Fresh migrated SQLite database with `roles` inserted.
pub async fn sqlite_store(roles: &[&str]) -> anyhow::Result<SeaOrmStore> {
    let db = models::db::connect_in_memory().await?;
    let store = SeaOrmStore::new(db);
    for r in roles {
        store.ensure(r).await?;
    }
    Ok(store)
}
