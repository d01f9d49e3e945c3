//! 인증 및 보안 서비스 모듈
//!
//! 비밀번호 해싱, 토큰 발급/검증, 요청 단위 접근 판정을 담당하는 서비스들을 제공합니다.
//!
//! # Features
//!
//! - bcrypt 비밀번호 해싱 및 타이밍 균등화
//! - HS256 고정 JWT 발급 및 검증
//! - 무효화 목록과 결합한 접근 판정 파이프라인
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::auth::{AccessDecision, Authenticator};
//! use crate::domain::models::auth::AccessPolicy;
//!
//! match guard.authenticate(Some("Bearer eyJ..."), AccessPolicy::Authenticated).await {
//!     AccessDecision::Authorized(user) => log::info!("{}", user.subject),
//!     AccessDecision::Rejected(reason) => return Err(reason.into_error()),
//! }
//! ```

pub mod access_guard;
pub mod password_service;
pub mod token_service;

pub use access_guard::*;
pub use password_service::*;
pub use token_service::*;
