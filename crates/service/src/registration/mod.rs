//! Organization sign-up: a new organization plus its first admin member,
//! created as one unit.

pub mod repository;
pub mod service;

pub use service::RegistrationService;
