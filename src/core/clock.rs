//! 시간 공급자
//!
//! 토큰 발급/검증과 인메모리 캐시의 만료 판단은 모두 [`Clock`]을 통해 현재 시각을 읽습니다.
//! 운영 환경에서는 [`SystemClock`], 테스트에서는 [`ManualClock`]을 주입합니다.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use std::sync::RwLock;

/// 현재 시각을 제공하는 trait
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 시스템 시계
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 수동으로 조작 가능한 시계
///
/// 만료, TTL, 윈도우 경계를 실제 대기 없이 검증할 때 사용합니다.
///
/// ```rust,ignore
/// let clock = ManualClock::new(Utc::now());
/// clock.advance(Duration::seconds(61));
/// ```
#[derive(Debug)]
pub struct ManualClock {
    current: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: RwLock::new(start),
        }
    }

    /// 시계를 지정된 시각으로 설정합니다.
    pub fn set(&self, instant: DateTime<Utc>) {
        match self.current.write() {
            Ok(mut guard) => *guard = instant,
            Err(poisoned) => *poisoned.into_inner() = instant,
        }
    }

    /// 시계를 지정된 만큼 앞으로 이동합니다.
    pub fn advance(&self, by: Duration) {
        match self.current.write() {
            Ok(mut guard) => *guard += by,
            Err(poisoned) => *poisoned.into_inner() += by,
        }
    }
}

/// 현재 시각의 초 단위 절삭값에서 시작합니다. 토큰 시각이 초 단위이므로 경계 계산이 정확히 맞습니다.
impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now().trunc_subsecs(0))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        match self.current.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advance_and_set() {
        let start = Utc::now();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::seconds(61));
        assert_eq!(clock.now(), start + Duration::seconds(61));

        clock.set(start);
        assert_eq!(clock.now(), start);
    }
}
