//! 캐싱 계층 모듈
//!
//! 여러 서비스 인스턴스가 공유하는 저지연 키/값 캐시를 추상화합니다.
//! 인스턴스 간 조정(토큰 무효화 목록, 요청 카운터, 할당량 잠금)은 모두 이 계층을 거칩니다.
//!
//! # 주요 기능
//!
//! - [`CacheStore`] trait: 코어가 사용하는 좁은 캐시 인터페이스
//! - [`redis::RedisClient`]: Redis 구현 (모든 호출에 타임아웃 적용)
//! - [`memory::InMemoryCache`]: 테스트용 구현 (시계 기반 만료, 장애 시뮬레이션)
//!
//! # 원자성
//!
//! `incr_with_expiry`는 증가와 만료 설정을 하나의 연산으로 수행합니다.
//! 카운터를 읽고 쓰는 두 단계로 나누면 동시 요청에서 한도를 넘어서는 경쟁이 생깁니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use crate::caching::CacheStore;
//!
//! let window = cache.incr_with_expiry("rate_limit:login:ip:1.2.3.4", Duration::from_secs(60)).await?;
//! cache.set_with_ttl("blacklist:ab12...", "revoked", Duration::from_secs(3600)).await?;
//! let revoked = cache.exists("blacklist:ab12...").await?;
//! ```
//!
//! # 환경 설정
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379  # 기본값
//! CACHE_TIMEOUT_MS=500              # 호출당 상한
//! ```

pub mod memory;
pub mod redis;

use crate::core::errors::AppError;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 캐시 계층 에러
///
/// "키 없음"은 에러가 아니라 `Ok(None)`/`Ok(false)`로 표현됩니다.
/// 이 타입은 백엔드에 도달할 수 없다는 사실만 나타냅니다.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CacheError {
    #[error("cache backend unreachable: {0}")]
    Unavailable(String),

    #[error("cache operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("unexpected cache response: {0}")]
    Protocol(String),
}

impl From<CacheError> for AppError {
    fn from(e: CacheError) -> Self {
        AppError::CacheUnavailable(e.to_string())
    }
}

/// 공유 캐시 협력자 인터페이스
///
/// 모든 TTL은 밀리초 단위로 올림 처리됩니다. 엔트리는 보호하는 시점보다 먼저 만료되지 않습니다.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// 키의 값을 조회합니다.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// TTL과 함께 값을 저장합니다. 기존 값은 덮어씁니다.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// 키가 없을 때만 저장합니다 (`SET NX PX`).
    ///
    /// # Returns
    ///
    /// 저장했으면 `true`, 이미 키가 있으면 `false`
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, CacheError>;

    /// 키를 삭제합니다. 삭제된 키가 있었으면 `true`
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    /// 현재 값이 `expected`와 같을 때만 삭제합니다.
    ///
    /// 잠금 해제 시 다른 소유자의 잠금을 지우지 않도록 사용합니다.
    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, CacheError>;

    /// 키 존재 여부 (단일 왕복)
    async fn exists(&self, key: &str) -> Result<bool, CacheError>;

    /// 카운터를 원자적으로 1 증가시키고, 첫 증가일 때 만료를 `window`로 설정합니다.
    ///
    /// # Returns
    ///
    /// 증가 후의 카운트와 현재 윈도우의 남은 시간
    async fn incr_with_expiry(&self, key: &str, window: Duration) -> Result<WindowCount, CacheError>;
}

/// 고정 윈도우 카운터의 증가 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCount {
    /// 증가 후의 카운트
    pub count: u64,
    /// 카운터가 만료되어 윈도우가 초기화될 때까지 남은 시간
    pub remaining: Duration,
}

/// TTL을 밀리초로 변환합니다. 1ms 미만의 나머지는 올림하며 최소값은 1ms입니다.
pub fn ttl_millis(ttl: Duration) -> u64 {
    let whole = ttl.as_millis();
    let rounded = if ttl.subsec_nanos() % 1_000_000 == 0 {
        whole
    } else {
        whole + 1
    };
    u64::try_from(rounded).unwrap_or(u64::MAX).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_rounds_up_to_whole_millis() {
        assert_eq!(ttl_millis(Duration::from_secs(60)), 60_000);
        assert_eq!(ttl_millis(Duration::from_micros(1_500)), 2);
        assert_eq!(ttl_millis(Duration::from_nanos(1)), 1);
        assert_eq!(ttl_millis(Duration::ZERO), 1);
    }

    #[test]
    fn test_cache_error_maps_to_cache_unavailable() {
        let app_error: AppError = CacheError::Timeout(Duration::from_millis(500)).into();
        assert!(matches!(app_error, AppError::CacheUnavailable(_)));
        assert!(app_error.is_retryable());
    }
}
