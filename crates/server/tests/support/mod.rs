#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::Service;
use tower_http::cors::CorsLayer;

use server::routes;
use server::state::{ApiSettings, AppState};
use service::auth::service::AuthConfig;
use service::member_service::MemberDto;
use service::organization_service::OrganizationDto;
use service::repo::memory::InMemoryStore;
use service::services::Services;

pub const JWT_SECRET: &str = "test-secret";

pub struct TestApp {
    pub store: Arc<InMemoryStore>,
    pub services: Services,
    pub router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: String,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

pub fn app() -> TestApp {
    app_with(InMemoryStore::with_roles(&["Admin", "Manager", "Member"]), ApiSettings::default())
}

pub fn app_with(store: InMemoryStore, api: ApiSettings) -> TestApp {
    let store = Arc::new(store);
    let services = Services::from_store(store.clone(), AuthConfig::new(JWT_SECRET, 1));
    let router = routes::build_router(AppState::new(services.clone(), api), CorsLayer::very_permissive(), None);
    TestApp { store, services, router }
}

pub fn distinct() -> ApiSettings {
    ApiSettings { status_policy: server::errors::StatusPolicy::Distinct, ..ApiSettings::default() }
}

impl TestApp {
    /// Organization plus one member with the given role; returns (org_id, member_id).
    pub async fn seed_member(&self, email: &str, password: &str, role: &str) -> anyhow::Result<(i32, i32)> {
        let org = self
            .services
            .organizations
            .create_organization(OrganizationDto::new("Acme", "ops@acme.io"))
            .await?;
        let org_id = org.org_id.unwrap_or_default();
        let role_id = self.store.role_id(role).unwrap_or_default();
        let member = self
            .services
            .members
            .create_member(MemberDto::new("Ada", email, password, org_id, role_id))
            .await?;
        Ok((org_id, member.member_id.unwrap_or_default()))
    }

    pub async fn get(&self, uri: &str) -> anyhow::Result<TestResponse> {
        self.send(Request::builder().method("GET").uri(uri).body(Body::empty())?).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> anyhow::Result<TestResponse> {
        self.post_raw(uri, serde_json::to_vec(body)?).await
    }

    pub async fn post_raw(&self, uri: &str, body: Vec<u8>) -> anyhow::Result<TestResponse> {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))?;
        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> anyhow::Result<TestResponse> {
        let resp = self.router.clone().call(req).await?;
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
        Ok(TestResponse { status, content_type, body: String::from_utf8(bytes.to_vec())? })
    }
}
