//! 영속 엔티티

pub mod users;

pub use users::{Role, User};
