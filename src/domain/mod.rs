//! # Domain Layer
//!
//! - `entities` - 저장소에 기록되는 사용자 엔티티와 역할
//! - `dto` - HTTP 요청/응답 형태
//! - `models` - 인증 주체, 접근 정책, 토큰 클레임 등 값 객체

pub mod dto;
pub mod entities;
pub mod models;

pub use entities::{Role, User};
pub use models::{AccessPolicy, AuthenticatedUser, IssuedToken, TokenClaims, UnverifiedClaims};
