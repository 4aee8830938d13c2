//! Login, debug and organization registration handlers mounted under `/api/auth`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use models::validation::{is_blank, is_valid_email, trim_control, utf16_len};
use service::auth::domain::{JwtResponse, LoginInput};
use service::errors::ServiceError;
use service::member_service::{MemberDto, EMAIL_TAKEN, MIN_PASSWORD_LEN};
use service::organization_service::OrganizationDto;

use crate::errors::{ApiError, ErrorKind, StatusPolicy};
use crate::state::AppState;

pub const REGISTRATION_OK: &str = "Organization and admin user created successfully";

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationRegistrationRequest {
    #[serde(default)]
    pub org_name: Option<String>,
    #[serde(default)]
    pub org_email: Option<String>,
    #[serde(default)]
    pub admin_name: Option<String>,
    #[serde(default)]
    pub admin_email: Option<String>,
    #[serde(default)]
    pub admin_password: Option<String>,
}

impl OrganizationRegistrationRequest {
    /// First failing field check, in declaration order.
    fn first_violation(&self) -> Option<&'static str> {
        if is_blank(self.org_name.as_deref()) {
            return Some("Organization name is required");
        }
        if is_blank(self.org_email.as_deref()) {
            return Some("Organization email is required");
        }
        if is_blank(self.admin_name.as_deref()) {
            return Some("Admin name is required");
        }
        if is_blank(self.admin_email.as_deref()) {
            return Some("Admin email is required");
        }
        match self.admin_password.as_deref() {
            Some(p) if utf16_len(p) >= MIN_PASSWORD_LEN => None,
            _ => Some("Password must be at least 6 characters"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub message: String,
    pub admin_email: String,
    pub org_id: i32,
}

fn log_login_attempt(req: &LoginRequest) {
    let email = req.email.as_deref();
    info!(
        email = email.unwrap_or_default(),
        password_len = req.password.as_deref().map(utf16_len).unwrap_or(0),
        email_blank = is_blank(email),
        password_blank = req.password.as_deref().map_or(true, str::is_empty),
        email_trimmed = email.map(trim_control).unwrap_or_default(),
        email_contains_at = email.is_some_and(|e| e.contains('@')),
        "login_attempt"
    );
}

fn bad_body(rejection: &JsonRejection) -> String {
    warn!(error = %rejection.body_text(), "unreadable request body");
    format!("Invalid request body: {}", rejection.body_text())
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = crate::openapi::JwtResponseDoc),
        (status = 400, description = "Missing or invalid fields, or rejected credentials (plain text)")
    )
)]
#[instrument(name = "login", skip_all)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<JwtResponse>, ApiError> {
    let policy = state.api.status_policy;
    let Json(req) = payload.map_err(|r| ApiError::text(policy, ErrorKind::Validation, bad_body(&r)))?;
    log_login_attempt(&req);

    let raw_email = match req.email.as_deref() {
        Some(e) if !trim_control(e).is_empty() => e,
        _ => {
            warn!("login rejected: email is null or empty");
            return Err(ApiError::text(policy, ErrorKind::Validation, "Email is required"));
        }
    };
    let password = match req.password.as_deref() {
        Some(p) if !p.is_empty() => p,
        _ => {
            warn!(email = raw_email, "login rejected: password is null or empty");
            return Err(ApiError::text(policy, ErrorKind::Validation, "Password is required"));
        }
    };
    let email = trim_control(raw_email);
    if !is_valid_email(email) {
        warn!(email, "login rejected: invalid email format");
        return Err(ApiError::text(policy, ErrorKind::Validation, "Email must be valid"));
    }
    info!(email, "request validation passed");

    // The collaborator sees the email exactly as submitted.
    let input = LoginInput { email: raw_email.to_string(), password: password.to_string() };
    match state.services.auth.authenticate(input).await {
        Ok(res) => {
            info!(
                email = raw_email,
                token_len = res.token.len(),
                member_id = res.member_id,
                name = %res.name,
                org_id = res.org_id,
                role = %res.role,
                "login_succeeded"
            );
            Ok(Json(res))
        }
        Err(e) => {
            error!(email = raw_email, code = e.code(), error = %e, "login_failed");
            Err(ApiError::text(policy, ErrorKind::from(&e), format!("Authentication failed: {e}")))
        }
    }
}

async fn collect_debug_info(state: &AppState) -> Result<String, ServiceError> {
    let services = &state.services;
    let check_exists = services.members.exists_by_email(&state.api.debug_check_email).await?;
    let members = services.members.count().await?;
    let organizations = services.organizations.count().await?;
    let roles = services.roles.count().await?;
    Ok(format!(
        "Database Debug Info:\nTotal Users: {members}\nTotal Organizations: {organizations}\nTotal Roles: {roles}\nTest User Exists: {check_exists}"
    ))
}

#[utoipa::path(
    get,
    path = "/api/auth/debug",
    tag = "auth",
    responses(
        (status = 200, description = "Record counts as plain text", body = String, content_type = "text/plain"),
        (status = 400, description = "Store failure (plain text)")
    )
)]
#[instrument(name = "debug_database", skip_all)]
pub async fn debug_database(State(state): State<AppState>) -> Result<String, ApiError> {
    match collect_debug_info(&state).await {
        Ok(info) => {
            info!(debug_info = %info, "debug_info");
            Ok(info)
        }
        Err(e) => {
            error!(error = %e, "debug_failed");
            Err(ApiError::text(state.api.status_policy, ErrorKind::Internal, format!("Debug error: {e}")))
        }
    }
}

fn registration_failed(policy: StatusPolicy, e: ServiceError) -> ApiError {
    error!(error = %e, "registration_failed");
    ApiError::json(policy, ErrorKind::from(&e), format!("Registration failed: {e}"))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = OrganizationRegistrationRequest,
    responses(
        (status = 200, description = "Organization and admin created", body = RegistrationResponse),
        (status = 400, description = "Validation failure, duplicate email or store failure", body = crate::errors::ErrorBody)
    )
)]
#[instrument(name = "register_organization", skip_all)]
pub async fn register_organization(
    State(state): State<AppState>,
    payload: Result<Json<OrganizationRegistrationRequest>, JsonRejection>,
) -> Result<Json<RegistrationResponse>, ApiError> {
    let policy = state.api.status_policy;
    let Json(req) = payload.map_err(|r| ApiError::json(policy, ErrorKind::Validation, bad_body(&r)))?;

    if let Some(msg) = req.first_violation() {
        warn!(reason = msg, "registration rejected");
        return Err(ApiError::json(policy, ErrorKind::Validation, msg));
    }
    let admin_email = req.admin_email.unwrap_or_default();

    match state.services.members.exists_by_email(&admin_email).await {
        Ok(false) => {}
        Ok(true) => {
            warn!(admin_email = %admin_email, "registration rejected: email taken");
            return Err(ApiError::json(policy, ErrorKind::Conflict, EMAIL_TAKEN));
        }
        Err(e) => return Err(registration_failed(policy, e)),
    }

    let organization = OrganizationDto::new(req.org_name.unwrap_or_default(), req.org_email.unwrap_or_default());
    // ids are assigned inside the registration transaction
    let admin = MemberDto::new(
        req.admin_name.unwrap_or_default(),
        admin_email,
        req.admin_password.unwrap_or_default(),
        0,
        0,
    );
    let done = state
        .services
        .registration
        .register(organization, admin)
        .await
        .map_err(|e| registration_failed(policy, e))?;

    info!(org_id = done.admin.org_id, admin_email = %done.admin.email, "organization and admin created");
    Ok(Json(RegistrationResponse {
        message: REGISTRATION_OK.to_string(),
        admin_email: done.admin.email,
        org_id: done.admin.org_id,
    }))
}
