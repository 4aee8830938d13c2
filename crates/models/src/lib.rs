pub mod errors;
pub mod db;
pub mod validation;
pub mod organization;
pub mod role;
pub mod member;
