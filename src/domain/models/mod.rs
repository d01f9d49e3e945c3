//! # Domain Models Module
//!
//! 영속되지 않는 도메인 값 객체를 정의합니다.
//!
//! ```text
//! models/
//! ├── auth/    ← 요청에 부착되는 인증 주체, 접근 정책
//! └── token/   ← 토큰 클레임, 발급 결과, 미검증 클레임
//! ```
//!
//! 엔티티(`../entities/`)와 달리 이 모듈의 타입은 저장소에 기록되지 않으며 모두 불변입니다.

pub mod auth;
pub mod token;

pub use auth::*;
pub use token::*;
