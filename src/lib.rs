//! 신원 서비스
//!
//! 상태 없는 토큰 발급, 분산 토큰 무효화, 분산 요청 한도를 제공하는 인증 서비스입니다.
//! 여러 인스턴스가 동시에 실행되어도 중앙 잠금 관리자 없이 공유 캐시(Redis)만으로 조정됩니다.
//!
//! # Features
//!
//! - **토큰 인증**: HS256 서명, 24시간 만료, subject는 사용자 uuid
//! - **로그아웃 무효화**: 토큰의 남은 수명만큼 유지되는 무효화 엔트리
//! - **요청 한도**: 라우트 클래스별 고정 윈도우 (`default` 60/분, `login` 5/분)
//! - **관리자 할당량**: 클러스터 단위 권고 잠금 안에서 개수 확인 후 생성
//! - **MongoDB**: 사용자 데이터 영구 저장
//! - **Redis**: 무효화 목록, 요청 한도 카운터, 할당량 잠금
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │     HTTP Routes      │ ← REST API 엔드포인트
//! └──────────────────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │     Middlewares      │ ← 요청 한도 → 접근 가드
//! └──────────────────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │       Handlers       │ ← 요청/응답 처리
//! └──────────────────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │       Services       │ ← 비즈니스 로직
//! └──────────────────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │ Repositories / Cache │ ← UserStore, CacheStore
//! └──────────────────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │   MongoDB + Redis    │ ← 저장소
//! └──────────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use identity_service::config::AppConfig;
//! use identity_service::core::{AppState, SystemClock};
//!
//! let config = AppConfig::from_env()?;
//! let state = AppState::build(config, cache, store, Arc::new(SystemClock))?;
//! let login = state.users.login(request).await?;
//! ```

pub mod caching;
pub mod config;
pub mod core;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod middlewares;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod utils;
