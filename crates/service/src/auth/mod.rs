//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Credential checks and token issuance live here, independent of the web framework.

pub mod domain;
pub mod errors;
pub mod password;
pub mod repository;
pub mod service;

pub use service::AuthService;
