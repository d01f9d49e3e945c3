//! # Data Transfer Objects (DTO) Module
//!
//! HTTP 요청 본문과 응답 본문의 형태를 정의합니다.
//! 요청 DTO는 `validator`로 형식 검증을 수행하고, 응답 DTO는 민감 필드를 제외한 형태만 노출합니다.

pub mod users;

pub use users::*;
