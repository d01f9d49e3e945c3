//! # Core Module
//!
//! 서비스 전역에서 공유되는 기반 요소를 제공합니다.
//!
//! ## 모듈 구성
//!
//! ### [`errors`] - 통합 에러 처리
//! - **AppError**: 인증, 할당량, 인프라 에러를 포함한 전역 에러 타입
//! - **HTTP 통합**: Actix-Web `ResponseError` 구현
//! - **재시도 분류**: `is_retryable()`로 인프라 에러만 재시도 대상으로 구분
//!
//! ### [`clock`] - 시간 공급자
//! - **SystemClock**: 운영 환경 시계
//! - **ManualClock**: 테스트용 조작 가능 시계
//!
//! ### [`state`] - 애플리케이션 컨텍스트
//! - **AppState**: 시작 시 한 번 구성되는 불변 컨텍스트
//! - 설정, 캐시, 저장소, 시계를 생성자로 주입받아 서비스 그래프를 조립합니다.
//!
//! ## 의존성 흐름
//!
//! ```text
//! main ──► AppConfig::from_env()
//!      ──► RedisClient / MongoUserStore
//!      ──► AppState::build(config, cache, store, clock)
//!      ──► App::new().app_data(web::Data::new(state))
//! ```
//!
//! 요청 사이에 공유되는 가변 상태는 프로세스 내에 두지 않습니다.
//! 인스턴스 간 조정은 모두 공유 캐시를 거칩니다.

pub mod clock;
pub mod errors;
pub mod state;

pub use clock::*;
pub use errors::*;
pub use state::AppState;
