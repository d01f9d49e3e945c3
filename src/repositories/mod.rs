//! # Repository Layer
//!
//! 외부 저장소 협력자에 대한 좁은 인터페이스입니다.
//!
//! - [`users`] - 관계형 저장소 협력자 (`UserStore`), MongoDB 및 인메모리 구현
//! - [`tokens`] - 공유 캐시 위의 토큰 무효화 목록 (`RevocationStore`)

pub mod tokens;
pub mod users;
