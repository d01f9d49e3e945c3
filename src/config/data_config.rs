//! 데이터 및 서버 설정 관리 모듈
//!
//! 데이터베이스, 캐시, 서버, 환경 및 패스워드 해싱 관련 설정을 관리합니다.

use super::{ConfigError, EnvLookup};
use std::net::IpAddr;
use std::time::Duration;

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// 개발 환경 - 빠른 개발을 위한 설정
    Development,
    /// 테스트 환경 - 자동화된 테스트용 설정
    Test,
    /// 스테이징 환경 - 프로덕션 유사 환경
    Staging,
    /// 프로덕션 환경 - 최고 수준의 보안 및 성능
    Production,
}

impl Environment {
    /// `ENVIRONMENT` 또는 `NODE_ENV` 값으로 실행 환경을 결정합니다.
    ///
    /// 둘 다 설정되지 않은 경우 `Production`을 기본값으로 사용합니다.
    pub(crate) fn from_lookup(lookup: EnvLookup<'_>) -> Self {
        let raw = lookup("ENVIRONMENT")
            .or_else(|| lookup("NODE_ENV"))
            .unwrap_or_else(|| "production".to_string());
        Self::from_str(&raw)
    }

    /// 문자열에서 Environment를 생성합니다.
    ///
    /// # Arguments
    ///
    /// * `s` - 환경 이름 문자열 (대소문자 무관)
    ///
    /// # Returns
    ///
    /// 해당하는 Environment 값. 알 수 없는 값인 경우 `Production`을 반환합니다.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// 패스워드 해싱 설정
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    /// bcrypt cost (4-31)
    pub bcrypt_cost: u32,
}

impl PasswordConfig {
    /// `BCRYPT_COST`가 유효 범위(4-31)이면 그 값을, 아니면 환경 기본값을 사용합니다.
    pub(crate) fn from_lookup(lookup: EnvLookup<'_>, env: Environment) -> Self {
        let bcrypt_cost = lookup("BCRYPT_COST")
            .and_then(|raw| raw.parse::<u32>().ok())
            .filter(|cost| (4..=31).contains(cost))
            .unwrap_or_else(|| Self::bcrypt_cost_for_env(&env));

        Self { bcrypt_cost }
    }

    /// 특정 환경에 대한 bcrypt cost를 반환합니다.
    ///
    /// # Environment Defaults
    ///
    /// - Development/Test: 4 (빠른 처리)
    /// - Staging: 10 (중간 보안)
    /// - Production: 12 (고보안)
    pub fn bcrypt_cost_for_env(env: &Environment) -> u32 {
        match env {
            Environment::Development => 4,
            Environment::Test => 4,
            Environment::Staging => 10,
            Environment::Production => 12,
        }
    }
}

/// 서버 바인딩 설정
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 바인딩 주소. 기본값: "0.0.0.0"
    pub host: String,
    /// 포트. 기본값: 8080
    pub port: u16,
    /// 워커 수. 미설정 시 actix 기본값(CPU 코어 수)
    pub workers: Option<usize>,
    /// 프록시 헤더(`X-Forwarded-For` 등)를 믿어도 되는 peer 주소 목록 (`TRUSTED_PROXIES`)
    ///
    /// 비어 있으면 프록시 헤더를 무시하고 소켓 peer 주소만 클라이언트 식별에 사용합니다.
    pub trusted_proxies: Vec<IpAddr>,
}

impl ServerConfig {
    pub(crate) fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::invalid("PORT", &raw))?,
            None => 8080,
        };
        let workers = match lookup("WORKERS") {
            Some(raw) => Some(
                raw.parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| ConfigError::invalid("WORKERS", &raw))?,
            ),
            None => None,
        };

        let trusted_proxies = match lookup("TRUSTED_PROXIES") {
            Some(raw) => Self::parse_trusted_proxies(&raw)?,
            None => Vec::new(),
        };

        Ok(Self {
            host,
            port,
            workers,
            trusted_proxies,
        })
    }

    /// 쉼표로 구분된 IP 목록을 파싱합니다. 빈 항목은 건너뜁니다.
    fn parse_trusted_proxies(raw: &str) -> Result<Vec<IpAddr>, ConfigError> {
        raw.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| {
                item.parse::<IpAddr>()
                    .map_err(|_| ConfigError::invalid("TRUSTED_PROXIES", raw))
            })
            .collect()
    }
}

/// MongoDB 연결 설정
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `MONGODB_URI`. 기본값: "mongodb://localhost:27017"
    pub mongodb_uri: String,
    /// `DATABASE_NAME`. 기본값: "identity_service"
    pub database_name: String,
}

impl DatabaseConfig {
    pub(crate) fn from_lookup(lookup: EnvLookup<'_>) -> Self {
        Self {
            mongodb_uri: lookup("MONGODB_URI")
                .unwrap_or_else(|| "mongodb://localhost:27017".to_string()),
            database_name: lookup("DATABASE_NAME")
                .unwrap_or_else(|| "identity_service".to_string()),
        }
    }
}

/// 공유 캐시(Redis) 설정
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// `REDIS_URL`. 기본값: "redis://localhost:6379"
    pub redis_url: String,
    /// 캐시 호출 1회의 상한 시간 (`CACHE_TIMEOUT_MS`, 기본 500ms)
    ///
    /// 느리거나 분리된 캐시가 요청 파이프라인을 무기한 멈추지 못하게 합니다.
    pub op_timeout: Duration,
}

impl CacheConfig {
    pub(crate) fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, ConfigError> {
        let redis_url = lookup("REDIS_URL").unwrap_or_else(|| "redis://localhost:6379".to_string());
        let op_timeout = match lookup("CACHE_TIMEOUT_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .ok_or_else(|| ConfigError::invalid("CACHE_TIMEOUT_MS", &raw))?,
            None => Duration::from_millis(500),
        };

        Ok(Self { redis_url, op_timeout })
    }
}
