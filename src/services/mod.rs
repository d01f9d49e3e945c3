//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 모든 서비스는 시작 시 [`AppState`](crate::core::AppState)에서 한 번 조립되며,
//! 설정과 협력 객체(캐시, 저장소, 시계)를 생성자로 주입받습니다.
//!
//! # Features
//!
//! - [`auth`] - 비밀번호, 토큰, 접근 가드
//! - [`rate_limit`] - 라우트 클래스별 요청 한도
//! - [`users`] - 가입, 로그인, 로그아웃, 프로필, 관리자 할당량

pub mod auth;
pub mod rate_limit;
pub mod users;
