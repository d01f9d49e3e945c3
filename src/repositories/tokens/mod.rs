//! 토큰 무효화 저장소

pub mod revocation_store;

pub use revocation_store::RevocationStore;
