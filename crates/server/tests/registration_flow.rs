mod support;

use axum::http::StatusCode;
use serde_json::{json, Value};

use support::{app, app_with, distinct};
use server::state::ApiSettings;
use service::member_service::EMAIL_TAKEN;
use service::repo::memory::{InMemoryStore, StoreEvent};

const REGISTER: &str = "/api/auth/register";

fn request() -> Value {
    json!({
        "orgName": "Acme",
        "orgEmail": "ops@acme.io",
        "adminName": "Ada",
        "adminEmail": "ada@acme.io",
        "adminPassword": "secret1"
    })
}

fn without(field: &str) -> Value {
    let mut body = request();
    body[field] = Value::Null;
    body
}

#[tokio::test]
async fn registers_organization_then_admin() -> anyhow::Result<()> {
    let app = app();
    let resp = app.post_json(REGISTER, &request()).await?;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.body);

    let body = resp.json();
    assert_eq!(body["message"], "Organization and admin user created successfully");
    assert_eq!(body["adminEmail"], "ada@acme.io");
    let org_id = body["orgId"].as_i64().expect("orgId") as i32;

    let journal = app.store.journal();
    assert_eq!(journal.len(), 2);
    assert_eq!(journal[0], StoreEvent::OrganizationCreated(org_id));
    assert!(matches!(journal[1], StoreEvent::MemberCreated(_)));
    Ok(())
}

#[tokio::test]
async fn registered_admin_holds_admin_role_and_can_log_in() -> anyhow::Result<()> {
    let app = app();
    let reg = app.post_json(REGISTER, &request()).await?.json();

    let login = app
        .post_json("/api/auth/login", &json!({"email": "ada@acme.io", "password": "secret1"}))
        .await?;
    assert_eq!(login.status, StatusCode::OK);
    let body = login.json();
    assert_eq!(body["role"], "Admin");
    assert_eq!(body["orgId"], reg["orgId"]);
    Ok(())
}

#[tokio::test]
async fn field_checks_run_in_order() -> anyhow::Result<()> {
    let app = app();
    let cases = [
        ("orgName", "Organization name is required"),
        ("orgEmail", "Organization email is required"),
        ("adminName", "Admin name is required"),
        ("adminEmail", "Admin email is required"),
        ("adminPassword", "Password must be at least 6 characters"),
    ];
    for (field, message) in cases {
        let resp = app.post_json(REGISTER, &without(field)).await?;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{field}");
        assert_eq!(resp.json(), json!({"error": message}), "{field}");
    }

    let resp = app.post_json(REGISTER, &json!({})).await?;
    assert_eq!(resp.json(), json!({"error": "Organization name is required"}));

    let mut blank = request();
    blank["adminName"] = json!("  ");
    let resp = app.post_json(REGISTER, &blank).await?;
    assert_eq!(resp.json(), json!({"error": "Admin name is required"}));

    assert_eq!(app.store.organization_count(), 0);
    Ok(())
}

#[tokio::test]
async fn password_of_exactly_six_characters_is_accepted() -> anyhow::Result<()> {
    let app = app();
    let mut short = request();
    short["adminPassword"] = json!("12345");
    let resp = app.post_json(REGISTER, &short).await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json()["error"], "Password must be at least 6 characters");

    let mut six = request();
    six["adminPassword"] = json!("123456");
    let resp = app.post_json(REGISTER, &six).await?;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.body);
    Ok(())
}

#[tokio::test]
async fn password_length_counts_utf16_units() -> anyhow::Result<()> {
    let app = app();
    let mut astral = request();
    astral["adminPassword"] = json!("😀😀😀");
    let resp = app.post_json(REGISTER, &astral).await?;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.body);
    assert_eq!(app.store.organization_count(), 1);

    let login = app
        .post_json("/api/auth/login", &json!({"email": "ada@acme.io", "password": "😀😀😀"}))
        .await?;
    assert_eq!(login.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn duplicate_admin_email_creates_nothing() -> anyhow::Result<()> {
    let app = app();
    app.post_json(REGISTER, &request()).await?;
    let before = app.store.journal().len();

    let mut again = request();
    again["orgName"] = json!("Globex");
    let resp = app.post_json(REGISTER, &again).await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json(), json!({"error": EMAIL_TAKEN}));

    assert_eq!(app.store.journal().len(), before);
    assert_eq!(app.store.organization_count(), 1);
    assert_eq!(app.store.member_count(), 1);
    Ok(())
}

#[tokio::test]
async fn missing_admin_role_leaves_no_orphaned_organization() -> anyhow::Result<()> {
    let app = app_with(InMemoryStore::with_roles(&["Member"]), ApiSettings::default());
    let resp = app.post_json(REGISTER, &request()).await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let error = resp.json()["error"].as_str().unwrap_or_default().to_string();
    assert!(error.starts_with("Registration failed: "), "{error}");
    assert!(error.contains("Admin role not found"), "{error}");
    assert_eq!(app.store.organization_count(), 0);
    assert_eq!(app.store.member_count(), 0);
    assert!(app.store.journal().is_empty());
    Ok(())
}

#[tokio::test]
async fn store_failure_is_wrapped() -> anyhow::Result<()> {
    let app = app();
    app.store.set_unavailable(true);
    let resp = app.post_json(REGISTER, &request()).await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json(), json!({"error": "Registration failed: database error: store unavailable"}));
    Ok(())
}

#[tokio::test]
async fn distinct_policy_separates_registration_failures() -> anyhow::Result<()> {
    let app = app_with(InMemoryStore::with_roles(&["Admin"]), distinct());
    assert_eq!(app.post_json(REGISTER, &without("orgName")).await?.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.post_json(REGISTER, &request()).await?.status, StatusCode::OK);
    assert_eq!(app.post_json(REGISTER, &request()).await?.status, StatusCode::CONFLICT);

    let no_role = app_with(InMemoryStore::new(), distinct());
    assert_eq!(no_role.post_json(REGISTER, &request()).await?.status, StatusCode::INTERNAL_SERVER_ERROR);
    Ok(())
}
