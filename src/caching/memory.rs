//! 인메모리 캐시 구현
//!
//! Redis 없이 [`CacheStore`]의 의미를 그대로 재현합니다. 만료는 주입된 [`Clock`]으로 판단하므로
//! `ManualClock`과 함께 쓰면 TTL과 윈도우 경계를 실제 대기 없이 검증할 수 있습니다.
//! `set_available(false)`로 백엔드 장애를 흉내 낼 수 있습니다.

use super::{CacheError, CacheStore, WindowCount, ttl_millis};
use crate::core::clock::Clock;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl Entry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

/// 테스트 및 단일 인스턴스 개발용 캐시
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
    available: AtomicBool,
}

impl InMemoryCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
            available: AtomicBool::new(true),
        }
    }

    /// 백엔드 가용성을 전환합니다. `false`이면 모든 연산이 `CacheError::Unavailable`
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// 살아있는 키의 남은 TTL (테스트 검증용)
    pub fn ttl_of(&self, key: &str) -> Option<chrono::Duration> {
        let now = self.clock.now();
        let entries = self.lock();
        entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .and_then(|entry| entry.expires_at)
            .map(|at| at - now)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// 가용성을 확인하고 만료된 키를 정리한 맵을 반환합니다.
    fn live_entries(&self) -> Result<(MutexGuard<'_, HashMap<String, Entry>>, DateTime<Utc>), CacheError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(CacheError::Unavailable("in-memory cache marked unavailable".to_string()));
        }
        let now = self.clock.now();
        let mut entries = self.lock();
        entries.retain(|_, entry| entry.is_live(now));
        Ok((entries, now))
    }

    fn expiry_after(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
        let millis = i64::try_from(ttl_millis(ttl)).unwrap_or(i64::MAX);
        now + chrono::Duration::milliseconds(millis)
    }
}

#[async_trait]
impl CacheStore for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let (entries, _) = self.live_entries()?;
        Ok(entries.get(key).map(|entry| entry.value.clone()))
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let (mut entries, now) = self.live_entries()?;
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(Self::expiry_after(now, ttl)),
            },
        );
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, CacheError> {
        let (mut entries, now) = self.live_entries()?;
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(Self::expiry_after(now, ttl)),
            },
        );
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let (mut entries, _) = self.live_entries()?;
        Ok(entries.remove(key).is_some())
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, CacheError> {
        let (mut entries, _) = self.live_entries()?;
        if entries.get(key).is_some_and(|entry| entry.value == expected) {
            entries.remove(key);
            return Ok(true);
        }
        Ok(false)
    }

    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        let (entries, _) = self.live_entries()?;
        Ok(entries.contains_key(key))
    }

    async fn incr_with_expiry(&self, key: &str, window: Duration) -> Result<WindowCount, CacheError> {
        let (mut entries, now) = self.live_entries()?;
        let entry = entries.entry(key.to_string()).or_insert_with(|| Entry {
            value: "0".to_string(),
            expires_at: None,
        });

        let count = entry
            .value
            .parse::<u64>()
            .map_err(|_| CacheError::Protocol(format!("value at {} is not an integer", key)))?
            + 1;
        entry.value = count.to_string();
        if count == 1 || entry.expires_at.is_none() {
            entry.expires_at = Some(Self::expiry_after(now, window));
        }

        let remaining = entry
            .expires_at
            .and_then(|at| (at - now).to_std().ok())
            .unwrap_or(window);
        Ok(WindowCount { count, remaining })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;

    fn cache_with_clock() -> (InMemoryCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        (InMemoryCache::new(clock.clone()), clock)
    }

    #[actix_web::test]
    async fn test_entry_expires_after_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.set_with_ttl("k", "v", Duration::from_secs(10)).await.unwrap();

        clock.advance(chrono::Duration::seconds(9));
        assert!(cache.exists("k").await.unwrap());

        clock.advance(chrono::Duration::seconds(1));
        assert!(!cache.exists("k").await.unwrap());
    }

    #[actix_web::test]
    async fn test_incr_sets_expiry_only_on_first_increment() {
        let (cache, clock) = cache_with_clock();
        let window = Duration::from_secs(60);

        let first = cache.incr_with_expiry("c", window).await.unwrap();
        assert_eq!(first.count, 1);
        assert_eq!(first.remaining, window);

        clock.advance(chrono::Duration::seconds(30));
        let second = cache.incr_with_expiry("c", window).await.unwrap();
        assert_eq!(second.count, 2);
        assert_eq!(second.remaining, Duration::from_secs(30));

        // 두 번째 증가가 만료를 연장하지 않으므로 첫 증가 기준 60초에 초기화된다
        clock.advance(chrono::Duration::seconds(30));
        assert_eq!(cache.incr_with_expiry("c", window).await.unwrap().count, 1);
    }

    #[actix_web::test]
    async fn test_set_if_absent_and_compare_delete() {
        let (cache, _) = cache_with_clock();
        let ttl = Duration::from_secs(5);

        assert!(cache.set_if_absent("lock", "owner-a", ttl).await.unwrap());
        assert!(!cache.set_if_absent("lock", "owner-b", ttl).await.unwrap());

        assert!(!cache.delete_if_equals("lock", "owner-b").await.unwrap());
        assert!(cache.delete_if_equals("lock", "owner-a").await.unwrap());
        assert!(!cache.exists("lock").await.unwrap());
    }

    #[actix_web::test]
    async fn test_unavailable_cache_errors() {
        let (cache, _) = cache_with_clock();
        cache.set_available(false);

        assert!(matches!(cache.exists("k").await, Err(CacheError::Unavailable(_))));
        assert!(matches!(
            cache.incr_with_expiry("k", Duration::from_secs(1)).await,
            Err(CacheError::Unavailable(_))
        ));
    }
}
