//! 요청 한도 제한 서비스
//!
//! 클라이언트 키와 라우트 클래스별 고정 윈도우 카운터를 공유 캐시에 유지합니다.

pub mod rate_limiter;

pub use rate_limiter::{RateLimitDecision, RateLimiter};
