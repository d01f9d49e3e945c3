//! # Configuration Module
//!
//! 애플리케이션 설정을 환경 변수에서 읽어 불변 [`AppConfig`]로 구성합니다.
//! 설정은 프로세스 시작 시 한 번만 읽히며, 이후에는 생성자를 통해 각 서비스로 전달됩니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 실행 환경, 서버, 데이터베이스, 캐시, 패스워드 해싱
//! - [`auth_config`] - JWT, 무효화 실패 정책, 관리자 할당량
//! - [`rate_limit_config`] - 라우트 클래스별 요청 한도 정책
//!
//! ## 환경 변수
//!
//! ### 필수 환경 변수 (프로덕션)
//!
//! ```bash
//! export JWT_SECRET="your-super-secret-key"
//! export MONGODB_URI="mongodb://db:27017"
//! export REDIS_URL="redis://cache:6379"
//! ```
//!
//! ### 선택적 환경 변수
//!
//! ```bash
//! export ENVIRONMENT="production"       # development, test, staging, production
//! export HOST="0.0.0.0"
//! export PORT="8080"
//! export JWT_EXPIRATION_HOURS="24"
//! export BCRYPT_COST="12"               # 4-31 범위
//! export CACHE_TIMEOUT_MS="500"
//! export RATE_LIMIT_DEFAULT="60/60"
//! export RATE_LIMIT_LOGIN="5/60"
//! export ADMIN_CEILING="3"
//! export REVOCATION_FAIL_OPEN="false"
//! export TRUSTED_PROXIES="10.0.0.2,10.0.0.3"   # 이 peer가 보낸 X-Forwarded-For만 신뢰
//! ```

pub mod auth_config;
pub mod data_config;
pub mod rate_limit_config;

pub use auth_config::*;
pub use data_config::*;
pub use rate_limit_config::*;

use std::env;
use thiserror::Error;

/// 환경 변수 조회 함수
///
/// 테스트에서는 프로세스 환경 대신 고정된 맵을 주입합니다.
pub(crate) type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// 설정 로딩 에러
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: String, value: String },

    #[error("JWT_SECRET must be set to a non-default value in production")]
    InsecureSecret,
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, value: &str) -> Self {
        ConfigError::Invalid {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// 애플리케이션 전체 설정
///
/// 시작 이후에는 변경되지 않습니다.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub password: PasswordConfig,
    pub jwt: JwtConfig,
    pub rate_limits: RateLimitTable,
    pub admin_quota: AdminQuotaConfig,
    pub revocation_failure_mode: RevocationFailureMode,
}

impl AppConfig {
    /// 프로세스 환경 변수에서 설정을 구성합니다.
    ///
    /// # Errors
    ///
    /// 값 형식이 잘못되었거나 프로덕션에서 개발용 비밀키를 사용하는 경우 `ConfigError`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key: &str| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, ConfigError> {
        let environment = Environment::from_lookup(lookup);

        Ok(Self {
            environment,
            server: ServerConfig::from_lookup(lookup)?,
            database: DatabaseConfig::from_lookup(lookup),
            cache: CacheConfig::from_lookup(lookup)?,
            password: PasswordConfig::from_lookup(lookup, environment),
            jwt: JwtConfig::from_lookup(lookup, environment)?,
            rate_limits: RateLimitTable::from_lookup(lookup)?,
            admin_quota: AdminQuotaConfig::from_lookup(lookup)?,
            revocation_failure_mode: RevocationFailureMode::from_lookup(lookup),
        })
    }

    /// 테스트 환경 기본값으로 구성된 설정
    ///
    /// 외부 환경 변수에 영향받지 않는 결정적인 설정이 필요할 때 사용합니다.
    pub fn for_tests() -> Self {
        let environment = Environment::Test;
        Self {
            environment,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                workers: None,
                trusted_proxies: Vec::new(),
            },
            database: DatabaseConfig {
                mongodb_uri: "mongodb://localhost:27017".to_string(),
                database_name: "identity_service_test".to_string(),
            },
            cache: CacheConfig {
                redis_url: "redis://localhost:6379".to_string(),
                op_timeout: std::time::Duration::from_millis(500),
            },
            password: PasswordConfig {
                bcrypt_cost: PasswordConfig::bcrypt_cost_for_env(&environment),
            },
            jwt: JwtConfig {
                secret: "test-secret-key-with-enough-entropy-0123456789".to_string(),
                expiration_hours: 24,
            },
            rate_limits: RateLimitTable::default(),
            admin_quota: AdminQuotaConfig::default(),
            revocation_failure_mode: RevocationFailureMode::FailClosed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_tests_configuration() {
        let config = AppConfig::for_tests();
        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.password.bcrypt_cost, 4);
        assert_eq!(config.admin_quota.ceiling, 3);
        assert_eq!(config.revocation_failure_mode, RevocationFailureMode::FailClosed);
        assert_eq!(config.rate_limits.policy_for(LOGIN_ROUTE_CLASS).limit, 5);
    }

    #[test]
    fn test_production_without_secret_fails() {
        let lookup = |key: &str| (key == "ENVIRONMENT").then(|| "production".to_string());
        assert_eq!(
            AppConfig::from_lookup(&lookup).unwrap_err(),
            ConfigError::InsecureSecret
        );
    }
}
