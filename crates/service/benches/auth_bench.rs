use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use service::auth::domain::LoginInput;
use service::auth::service::{AuthConfig, AuthService};
use service::member_service::{MemberDto, MemberService};
use service::repo::memory::InMemoryStore;

fn bench_login(c: &mut Criterion) {
    let store = Arc::new(InMemoryStore::with_roles(&["Admin"]));
    let org_id = store.insert_organization("Bench", "bench@example.com");
    let role_id = store.role_id("Admin").expect("seeded");
    let svc = AuthService::new(store.clone(), AuthConfig::new("secret", 12));

    // pre-create member outside of the benchmark using a tokio runtime
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(MemberService::new(store).create_member(MemberDto::new("Bench", "bench@example.com", "Benchmark1", org_id, role_id)))
        .unwrap();

    c.bench_function("auth_login_verify", |b| {
        b.iter(|| {
            let _ = rt
                .block_on(svc.authenticate(LoginInput { email: "bench@example.com".into(), password: "Benchmark1".into() }))
                .unwrap();
        });
    });
}

criterion_group!(benches, bench_login);
criterion_main!(benches);
