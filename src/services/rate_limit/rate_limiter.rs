//! # 요청 한도 제한기
//!
//! 공유 캐시의 원자적 증가 연산으로 인스턴스 간에 공유되는 고정 윈도우 카운터를 유지합니다.
//!
//! ## 키 구조
//!
//! ```text
//! rate_limit:{route_class}:{client_key} = <count>   (TTL = window, 첫 증가 시 설정)
//! ```
//!
//! 거부 응답의 `Retry-After`는 윈도우 전체 길이가 아니라 카운터가 만료될 때까지 남은 시간입니다.
//!
//! ## 고정 윈도우의 경계 효과
//!
//! 카운터는 첫 요청 시점부터 `window` 동안 유지되고 만료와 함께 초기화됩니다.
//! 따라서 한 윈도우의 끝과 다음 윈도우의 시작에 요청이 몰리면 짧은 구간에서
//! 최대 `2 × limit`개의 요청이 통과할 수 있습니다. 이는 허용된 근사치입니다.
//!
//! ## 백엔드 장애
//!
//! 캐시에 닿을 수 없으면 허용으로 처리하지 않고 `AppError::CacheUnavailable`(재시도 가능)을 반환합니다.

use crate::caching::CacheStore;
use crate::config::{RateLimitPolicy, RateLimitTable};
use crate::core::errors::{AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;

const KEY_PREFIX: &str = "rate_limit";

/// 한 번의 카운터 증가 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// 증가 후 카운트
    pub count: u64,
    pub limit: u64,
    pub window: Duration,
    /// 현재 윈도우가 초기화될 때까지 남은 시간
    pub reset_after: Duration,
}

impl RateLimitDecision {
    /// 거부 시 `Retry-After`로 내려줄 초 단위 값
    ///
    /// 윈도우의 남은 시간을 초 단위로 올림하며 최소 1초입니다.
    pub fn retry_after_secs(&self) -> u64 {
        let secs = self.reset_after.as_secs() + u64::from(self.reset_after.subsec_nanos() > 0);
        secs.max(1)
    }
}

#[derive(Clone)]
pub struct RateLimiter {
    cache: Arc<dyn CacheStore>,
    table: RateLimitTable,
}

impl RateLimiter {
    pub fn new(cache: Arc<dyn CacheStore>, table: RateLimitTable) -> Self {
        Self { cache, table }
    }

    fn key(client_key: &str, route_class: &str) -> String {
        format!("{}:{}:{}", KEY_PREFIX, route_class, client_key)
    }

    /// 라우트 클래스에 설정된 정책으로 요청을 집계합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::CacheUnavailable` - 카운터를 증가시킬 수 없는 경우
    pub async fn check(&self, client_key: &str, route_class: &str) -> AppResult<RateLimitDecision> {
        let policy = self.table.policy_for(route_class);
        self.check_with(client_key, route_class, policy).await
    }

    /// 호출 지점이 지정한 정책으로 요청을 집계합니다.
    ///
    /// # Arguments
    ///
    /// * `client_key` - 클라이언트 식별자 (예: `ip:1.2.3.4`)
    /// * `route_class` - 라우트 클래스 (예: `login`, `default`)
    /// * `policy` - 윈도우당 허용 횟수와 윈도우 길이
    ///
    /// # Errors
    ///
    /// * `AppError::CacheUnavailable` - 카운터를 증가시킬 수 없는 경우
    pub async fn check_with(
        &self,
        client_key: &str,
        route_class: &str,
        policy: RateLimitPolicy,
    ) -> AppResult<RateLimitDecision> {
        let key = Self::key(client_key, route_class);

        let counted = self
            .cache
            .incr_with_expiry(&key, policy.window)
            .await
            .map_err(|e| {
                log::warn!("요청 한도 카운터 갱신 실패 ({}): {}", key, e);
                AppError::from(e)
            })?;

        let count = counted.count;
        let decision = RateLimitDecision {
            allowed: count <= policy.limit,
            count,
            limit: policy.limit,
            window: policy.window,
            reset_after: counted.remaining,
        };

        if !decision.allowed {
            log::warn!(
                "요청 한도 초과: {} [{}] {}/{} (윈도우 {}s, {}s 후 초기화)",
                client_key,
                route_class,
                count,
                policy.limit,
                policy.window.as_secs(),
                decision.retry_after_secs()
            );
        }

        Ok(decision)
    }

    /// 증가 후 카운트가 한도 이하이면 `true`
    ///
    /// # Errors
    ///
    /// * `AppError::CacheUnavailable` - 카운터를 증가시킬 수 없는 경우
    pub async fn allow(&self, client_key: &str, route_class: &str) -> AppResult<bool> {
        Ok(self.check(client_key, route_class).await?.allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caching::memory::InMemoryCache;
    use crate::config::{DEFAULT_ROUTE_CLASS, LOGIN_ROUTE_CLASS};
    use crate::core::clock::ManualClock;

    fn limiter() -> (RateLimiter, Arc<InMemoryCache>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let cache = Arc::new(InMemoryCache::new(clock.clone()));
        let limiter = RateLimiter::new(cache.clone(), RateLimitTable::default());
        (limiter, cache, clock)
    }

    #[actix_web::test]
    async fn test_login_class_allows_five_per_minute() {
        let (limiter, _, clock) = limiter();

        for _ in 0..5 {
            assert!(limiter.allow("ip:1.2.3.4", LOGIN_ROUTE_CLASS).await.unwrap());
        }
        assert!(!limiter.allow("ip:1.2.3.4", LOGIN_ROUTE_CLASS).await.unwrap());

        clock.advance(chrono::Duration::seconds(61));
        assert!(limiter.allow("ip:1.2.3.4", LOGIN_ROUTE_CLASS).await.unwrap());
    }

    #[actix_web::test]
    async fn test_counters_are_isolated_per_key_and_class() {
        let (limiter, _, _) = limiter();

        for _ in 0..5 {
            limiter.allow("ip:1.2.3.4", LOGIN_ROUTE_CLASS).await.unwrap();
        }
        assert!(!limiter.allow("ip:1.2.3.4", LOGIN_ROUTE_CLASS).await.unwrap());

        assert!(limiter.allow("ip:5.6.7.8", LOGIN_ROUTE_CLASS).await.unwrap());
        assert!(limiter.allow("ip:1.2.3.4", DEFAULT_ROUTE_CLASS).await.unwrap());
    }

    #[actix_web::test]
    async fn test_call_site_policy() {
        let (limiter, _, _) = limiter();
        let policy = RateLimitPolicy::new(2, Duration::from_secs(10));

        let first = limiter.check_with("ip:9.9.9.9", "custom", policy).await.unwrap();
        assert_eq!(first.count, 1);
        assert!(limiter.check_with("ip:9.9.9.9", "custom", policy).await.unwrap().allowed);

        let third = limiter.check_with("ip:9.9.9.9", "custom", policy).await.unwrap();
        assert!(!third.allowed);
        assert_eq!(third.retry_after_secs(), 10);
    }

    #[actix_web::test]
    async fn test_retry_after_counts_down_with_the_window() {
        let (limiter, _, clock) = limiter();

        limiter.allow("ip:1.2.3.4", LOGIN_ROUTE_CLASS).await.unwrap();
        clock.advance(chrono::Duration::seconds(25));
        for _ in 0..4 {
            limiter.allow("ip:1.2.3.4", LOGIN_ROUTE_CLASS).await.unwrap();
        }

        let rejected = limiter.check("ip:1.2.3.4", LOGIN_ROUTE_CLASS).await.unwrap();
        assert!(!rejected.allowed);
        assert_eq!(rejected.reset_after, Duration::from_secs(35));
        assert_eq!(rejected.retry_after_secs(), 35);

        clock.advance(chrono::Duration::milliseconds(34_500));
        let rejected = limiter.check("ip:1.2.3.4", LOGIN_ROUTE_CLASS).await.unwrap();
        assert_eq!(rejected.retry_after_secs(), 1);
    }

    #[actix_web::test]
    async fn test_backend_failure_is_not_allowed() {
        let (limiter, cache, _) = limiter();
        cache.set_available(false);

        let err = limiter.allow("ip:1.2.3.4", LOGIN_ROUTE_CLASS).await.unwrap_err();
        assert!(matches!(err, AppError::CacheUnavailable(_)));
        assert!(err.is_retryable());
    }
}
