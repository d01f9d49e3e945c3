//! 인증 및 접근 제어 설정 모듈
//!
//! JWT 서명, 토큰 무효화 실패 정책, 관리자 계정 할당량 설정을 관리합니다.

use super::{ConfigError, EnvLookup, Environment};
use std::time::Duration;

/// 개발용 기본 서명 키
///
/// 프로덕션에서는 이 값으로 시작할 수 없습니다.
pub const DEVELOPMENT_JWT_SECRET: &str = "development-only-secret-change-me";

/// JWT 토큰 관련 설정을 관리하는 구조체
///
/// ## 보안 요구사항
///
/// - 최소 256비트 (32바이트) 길이의 비밀키
/// - 환경별로 다른 키 사용
/// - 비밀키는 어떤 응답에도 포함되지 않음
///
/// ```bash
/// # 안전한 JWT 키 생성
/// openssl rand -base64 32
/// export JWT_SECRET="..."
/// export JWT_EXPIRATION_HOURS="24"
/// ```
#[derive(Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 서명 키
    pub secret: String,
    /// 토큰 유효 시간 (시간 단위, 기본 24)
    pub expiration_hours: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"***")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

impl JwtConfig {
    /// `JWT_SECRET`, `JWT_EXPIRATION_HOURS`에서 설정을 읽습니다.
    ///
    /// # Errors
    ///
    /// * `ConfigError::InsecureSecret` - 프로덕션에서 비밀키가 없거나 개발용 기본값인 경우
    /// * `ConfigError::Invalid` - 만료 시간이 양의 정수가 아닌 경우
    pub(crate) fn from_lookup(lookup: EnvLookup<'_>, env: Environment) -> Result<Self, ConfigError> {
        let secret = match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => {
                log::warn!("JWT_SECRET not set, using development default (not secure for production!)");
                DEVELOPMENT_JWT_SECRET.to_string()
            }
        };

        if env.is_production() && secret == DEVELOPMENT_JWT_SECRET {
            return Err(ConfigError::InsecureSecret);
        }

        let expiration_hours = match lookup("JWT_EXPIRATION_HOURS") {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|h| *h > 0)
                .ok_or_else(|| ConfigError::invalid("JWT_EXPIRATION_HOURS", &raw))?,
            None => 24,
        };

        Ok(Self { secret, expiration_hours })
    }
}

/// 무효화 목록 조회가 실패했을 때의 정책
///
/// 기본값은 `FailClosed`입니다. 캐시에 도달할 수 없으면 토큰이 무효화되지 않았음을
/// 확인할 수 없으므로 요청을 거부합니다. 운영자가 `REVOCATION_FAIL_OPEN=true`로
/// 명시한 경우에만 `FailOpen`으로 동작하며, 이때 서명과 만료 검증은 그대로 수행됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevocationFailureMode {
    #[default]
    FailClosed,
    FailOpen,
}

impl RevocationFailureMode {
    pub(crate) fn from_lookup(lookup: EnvLookup<'_>) -> Self {
        match lookup("REVOCATION_FAIL_OPEN").as_deref().map(str::to_lowercase).as_deref() {
            Some("true") | Some("1") | Some("yes") => {
                log::warn!("REVOCATION_FAIL_OPEN 활성화: 캐시 장애 시 무효화 확인 없이 토큰을 허용합니다");
                RevocationFailureMode::FailOpen
            }
            _ => RevocationFailureMode::FailClosed,
        }
    }
}

/// 관리자 계정 할당량 설정
#[derive(Debug, Clone)]
pub struct AdminQuotaConfig {
    /// 관리자 계정 최대 수 (`ADMIN_CEILING`, 기본 3)
    pub ceiling: u64,
    /// 할당량 잠금 TTL (`ADMIN_LOCK_TTL_MS`, 기본 5000ms)
    pub lock_ttl: Duration,
    /// 잠금 획득 재시도 횟수 (`ADMIN_LOCK_RETRIES`, 기본 5)
    pub lock_retries: u32,
    /// 재시도 간격의 기본 단위. n번째 재시도는 `n * lock_backoff`만큼 대기
    pub lock_backoff: Duration,
}

impl Default for AdminQuotaConfig {
    fn default() -> Self {
        Self {
            ceiling: 3,
            lock_ttl: Duration::from_millis(5_000),
            lock_retries: 5,
            lock_backoff: Duration::from_millis(50),
        }
    }
}

impl AdminQuotaConfig {
    pub(crate) fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let ceiling = match lookup("ADMIN_CEILING") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::invalid("ADMIN_CEILING", &raw))?,
            None => defaults.ceiling,
        };
        let lock_ttl = match lookup("ADMIN_LOCK_TTL_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .ok_or_else(|| ConfigError::invalid("ADMIN_LOCK_TTL_MS", &raw))?,
            None => defaults.lock_ttl,
        };
        let lock_retries = match lookup("ADMIN_LOCK_RETRIES") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::invalid("ADMIN_LOCK_RETRIES", &raw))?,
            None => defaults.lock_retries,
        };

        Ok(Self {
            ceiling,
            lock_ttl,
            lock_retries,
            lock_backoff: defaults.lock_backoff,
        })
    }
}
