use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Mirrors `service::auth::domain::JwtResponse`, which carries no schema derive.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JwtResponseDoc {
    pub token: String,
    pub member_id: i32,
    pub name: String,
    pub org_id: i32,
    pub role: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::auth::debug_database,
        crate::routes::auth::register_organization,
    ),
    components(
        schemas(
            HealthResponse,
            JwtResponseDoc,
            crate::routes::auth::LoginRequest,
            crate::routes::auth::OrganizationRegistrationRequest,
            crate::routes::auth::RegistrationResponse,
            crate::errors::ErrorBody,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth")
    )
)]
pub struct ApiDoc;
