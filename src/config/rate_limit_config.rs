//! 요청 한도(rate limit) 정책 테이블
//!
//! 라우트 클래스 이름을 `{limit, window}` 정책에 매핑합니다.
//! 환경 변수 값은 `limit/window_secs` 형식입니다.
//!
//! ```bash
//! RATE_LIMIT_DEFAULT="60/60"   # 일반 라우트: 60초당 60회
//! RATE_LIMIT_LOGIN="5/60"      # 로그인: 60초당 5회
//! ```

use super::{ConfigError, EnvLookup};
use std::collections::HashMap;
use std::time::Duration;

/// 일반 라우트 클래스
pub const DEFAULT_ROUTE_CLASS: &str = "default";
/// 로그인 라우트 클래스
pub const LOGIN_ROUTE_CLASS: &str = "login";

/// 한 라우트 클래스의 고정 윈도우 정책
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// 윈도우당 허용 요청 수
    pub limit: u64,
    /// 윈도우 길이
    pub window: Duration,
}

impl RateLimitPolicy {
    pub fn new(limit: u64, window: Duration) -> Self {
        Self { limit, window }
    }

    /// `"limit/window_secs"` 문자열을 파싱합니다.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let policy = RateLimitPolicy::parse("5/60").unwrap();
    /// assert_eq!(policy.limit, 5);
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let (limit, window) = raw.trim().split_once('/')?;
        let limit = limit.trim().parse::<u64>().ok().filter(|l| *l > 0)?;
        let window_secs = window.trim().parse::<u64>().ok().filter(|w| *w > 0)?;
        Some(Self::new(limit, Duration::from_secs(window_secs)))
    }
}

/// 라우트 클래스별 정책 테이블
#[derive(Debug, Clone)]
pub struct RateLimitTable {
    policies: HashMap<String, RateLimitPolicy>,
}

impl Default for RateLimitTable {
    fn default() -> Self {
        let mut policies = HashMap::new();
        policies.insert(
            DEFAULT_ROUTE_CLASS.to_string(),
            RateLimitPolicy::new(60, Duration::from_secs(60)),
        );
        policies.insert(
            LOGIN_ROUTE_CLASS.to_string(),
            RateLimitPolicy::new(5, Duration::from_secs(60)),
        );
        Self { policies }
    }
}

impl RateLimitTable {
    pub(crate) fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, ConfigError> {
        let mut table = Self::default();

        for (class, key) in [
            (DEFAULT_ROUTE_CLASS, "RATE_LIMIT_DEFAULT"),
            (LOGIN_ROUTE_CLASS, "RATE_LIMIT_LOGIN"),
        ] {
            if let Some(raw) = lookup(key) {
                let policy =
                    RateLimitPolicy::parse(&raw).ok_or_else(|| ConfigError::invalid(key, &raw))?;
                table = table.with_policy(class, policy);
            }
        }

        Ok(table)
    }

    /// 정책을 추가하거나 교체한 테이블을 반환합니다.
    pub fn with_policy(mut self, route_class: &str, policy: RateLimitPolicy) -> Self {
        self.policies.insert(route_class.to_string(), policy);
        self
    }

    /// 라우트 클래스의 정책을 조회합니다.
    ///
    /// 등록되지 않은 클래스는 `default` 정책을 따릅니다.
    pub fn policy_for(&self, route_class: &str) -> RateLimitPolicy {
        self.policies
            .get(route_class)
            .or_else(|| self.policies.get(DEFAULT_ROUTE_CLASS))
            .copied()
            .unwrap_or_else(|| RateLimitPolicy::new(60, Duration::from_secs(60)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_policy() {
        let policy = RateLimitPolicy::parse("5/60").unwrap();
        assert_eq!(policy.limit, 5);
        assert_eq!(policy.window, Duration::from_secs(60));

        assert!(RateLimitPolicy::parse("5").is_none());
        assert!(RateLimitPolicy::parse("0/60").is_none());
        assert!(RateLimitPolicy::parse("5/0").is_none());
        assert!(RateLimitPolicy::parse("five/60").is_none());
    }

    #[test]
    fn test_default_table() {
        let table = RateLimitTable::default();
        assert_eq!(table.policy_for(LOGIN_ROUTE_CLASS).limit, 5);
        assert_eq!(table.policy_for(DEFAULT_ROUTE_CLASS).limit, 60);
        assert_eq!(table.policy_for("unknown").limit, 60);
    }

    #[test]
    fn test_env_override() {
        let lookup = |key: &str| (key == "RATE_LIMIT_LOGIN").then(|| "3/30".to_string());
        let table = RateLimitTable::from_lookup(&lookup).unwrap();
        assert_eq!(
            table.policy_for(LOGIN_ROUTE_CLASS),
            RateLimitPolicy::new(3, Duration::from_secs(30))
        );

        let lookup = |key: &str| (key == "RATE_LIMIT_DEFAULT").then(|| "bogus".to_string());
        assert!(RateLimitTable::from_lookup(&lookup).is_err());
    }
}
