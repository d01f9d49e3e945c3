//! 인증 주체와 접근 정책

pub mod access_policy;
pub mod authenticated_user;

pub use access_policy::AccessPolicy;
pub use authenticated_user::AuthenticatedUser;
