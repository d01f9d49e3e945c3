//! # 토큰 무효화 저장소
//!
//! 로그아웃된 토큰을 공유 캐시에 기록합니다.
//!
//! ## 키 구조
//!
//! ```text
//! blacklist:{sha256(token)} = "revoked"   (TTL = 무효화 시점의 남은 유효 시간)
//! ```
//!
//! 엔트리는 토큰보다 오래 살지도, 먼저 사라지지도 않습니다. TTL은 밀리초 단위로 올림되므로
//! 엔트리는 토큰의 만료 시각과 같거나 최대 1ms 뒤에 사라집니다.
//! 만료 이후의 토큰은 서명 검증 단계에서 거부되므로 별도 삭제가 필요 없습니다.
//!
//! 엔트리가 없다는 것은 "무효화되지 않았다"는 뜻일 뿐 "유효하다"는 뜻이 아닙니다.
//! 유효성은 여전히 서명과 만료 시각이 결정합니다.

use crate::caching::{CacheError, CacheStore};
use crate::utils::token_utils::{token_fingerprint, token_hash};
use chrono::Duration;
use std::sync::Arc;

const KEY_PREFIX: &str = "blacklist";
const REVOKED_MARKER: &str = "revoked";

/// 공유 캐시 기반 토큰 무효화 목록
#[derive(Clone)]
pub struct RevocationStore {
    cache: Arc<dyn CacheStore>,
}

impl RevocationStore {
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self { cache }
    }

    fn key(token: &str) -> String {
        format!("{}:{}", KEY_PREFIX, token_hash(token))
    }

    /// 토큰을 남은 유효 시간 동안 무효화합니다.
    ///
    /// `remaining`이 0 이하이면 이미 만료된 토큰이므로 아무것도 기록하지 않습니다.
    ///
    /// # Errors
    ///
    /// * `CacheError` - 캐시에 기록할 수 없는 경우
    pub async fn revoke(&self, token: &str, remaining: Duration) -> Result<(), CacheError> {
        if remaining <= Duration::zero() {
            log::debug!("이미 만료된 토큰, 무효화 생략: {}", token_fingerprint(token));
            return Ok(());
        }

        let ttl = remaining
            .to_std()
            .map_err(|e| CacheError::Protocol(format!("invalid revocation ttl: {}", e)))?;

        self.cache
            .set_with_ttl(&Self::key(token), REVOKED_MARKER, ttl)
            .await?;

        log::info!(
            "토큰 무효화: {} (TTL {}s)",
            token_fingerprint(token),
            remaining.num_seconds()
        );
        Ok(())
    }

    /// 토큰이 무효화 목록에 있는지 확인합니다 (캐시 왕복 1회).
    pub async fn is_revoked(&self, token: &str) -> Result<bool, CacheError> {
        self.cache.exists(&Self::key(token)).await
    }
}
