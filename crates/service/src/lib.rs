//! Service layer for the CRM auth flow, on top of `models`.
//! - Repository traits at every seam the HTTP layer depends on.
//! - A SeaORM store for production and an in-memory store for tests.
//! - Clear error types and documented interfaces.

pub mod errors;
pub mod auth;
pub mod member_service;
pub mod organization_service;
pub mod role_service;
pub mod registration;
pub mod repo;
pub mod seed;
pub mod services;
#[cfg(test)]
pub mod test_support;
