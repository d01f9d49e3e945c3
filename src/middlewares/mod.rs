//! 미들웨어 모듈
//!
//! ActixWeb 요청 처리 파이프라인에서 사용되는 미들웨어들을 제공합니다.
//! 두 미들웨어 모두 `web::Data<AppState>`에서 서비스를 꺼내 쓰며, 전역 상태에 의존하지 않습니다.
//!
//! # 제공 미들웨어
//!
//! ### 1. 요청 한도 미들웨어 (RateLimitMiddleware)
//! - 클라이언트 IP와 라우트 클래스별 고정 윈도우 집계
//! - 초과 시 429 + `Retry-After`
//!
//! ### 2. 인증 미들웨어 (AuthMiddleware)
//! - `Authenticator`에 판정 위임 (무효화 확인 → 서명/만료 검증 → 역할 검사)
//! - 승인 시 `AuthenticatedUser`를 request extension에 저장
//!
//! # 사용 방법
//!
//! ```rust,ignore
//! use actix_web::web;
//!
//! web::scope("/api/admin")
//!     .wrap(RateLimitMiddleware::for_class(DEFAULT_ROUTE_CLASS))
//!     .service(
//!         web::resource("/list")
//!             .wrap(AuthMiddleware::with_role(Role::Admin))
//!             .route(web::get().to(list_admins)),
//!     )
//! ```

mod auth_inner;
pub mod auth_middleware;
pub mod rate_limit;

pub use auth_middleware::AuthMiddleware;
pub use rate_limit::RateLimitMiddleware;
