//! # HTTP Request Handlers Module
//!
//! HTTP 요청을 받아 입력을 검증하고 서비스 계층에 위임한 뒤 응답을 구성합니다.
//!
//! ## 아키텍처 위치
//!
//! ```text
//! Request ─► RateLimitMiddleware ─► AuthMiddleware ─► Handler ─► UserService ─► UserStore / CacheStore
//! ```
//!
//! - 서비스는 `web::Data<AppState>`로 주입받습니다.
//! - 인증된 주체는 `AuthenticatedUser` 추출자로 받습니다.
//! - 에러는 `AppError`를 그대로 반환하면 `ResponseError` 구현이 HTTP 응답으로 변환합니다.

pub mod auth;
pub mod users;
