//! 요청 DTO

pub mod auth_request;
pub mod profile_request;

pub use auth_request::{LoginRequest, RegisterRequest};
pub use profile_request::{ListQuery, UpdateProfileRequest};
