use serde::{Deserialize, Serialize};

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Member as seen by the credential check: identity, role name and stored hash.
#[derive(Debug, Clone)]
pub struct MemberAccount {
    pub member_id: i32,
    pub org_id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub password_hash: String,
}

/// Successful login: bearer token plus the member identity claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtResponse {
    pub token: String,
    pub member_id: i32,
    pub name: String,
    pub org_id: i32,
    pub role: String,
}

/// JWT claims issued on login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub mid: i32,
    pub oid: i32,
    pub role: String,
    pub iat: usize,
    pub exp: usize,
}
