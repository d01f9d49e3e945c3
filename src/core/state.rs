//! # 애플리케이션 컨텍스트
//!
//! 시작 시 한 번 조립되어 `web::Data`로 모든 워커에 공유되는 불변 컨텍스트입니다.
//! 요청 간 조정이 필요한 상태는 여기 두지 않고 공유 캐시를 거칩니다.

use crate::caching::CacheStore;
use crate::config::AppConfig;
use crate::core::clock::Clock;
use crate::core::errors::AppResult;
use crate::repositories::tokens::RevocationStore;
use crate::repositories::users::UserStore;
use crate::services::auth::{AccessGuard, Authenticator, PasswordCodec, TokenService};
use crate::services::rate_limit::RateLimiter;
use crate::services::users::{AdminQuotaGuard, UserService};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// 접근 가드. 미들웨어는 구체 타입이 아닌 [`Authenticator`]에 의존합니다.
    pub authenticator: Arc<dyn Authenticator>,
    pub rate_limiter: RateLimiter,
    pub users: UserService,
}

impl AppState {
    /// 설정과 외부 협력 객체로 서비스 그래프를 조립합니다.
    ///
    /// # Arguments
    ///
    /// * `config` - 시작 시 읽은 불변 설정
    /// * `cache` - 공유 캐시 (운영: Redis, 테스트: 인메모리)
    /// * `store` - 사용자 저장소 (운영: MongoDB, 테스트: 인메모리)
    /// * `clock` - 토큰 시각과 만료 계산에 쓰는 시계
    ///
    /// # Errors
    ///
    /// * `AppError::EncodingError` - 비밀번호 코덱 초기화 실패
    pub fn build(
        config: AppConfig,
        cache: Arc<dyn CacheStore>,
        store: Arc<dyn UserStore>,
        clock: Arc<dyn Clock>,
    ) -> AppResult<Self> {
        let tokens = TokenService::new(&config.jwt, clock.clone());
        let revocations = RevocationStore::new(cache.clone());
        let passwords = PasswordCodec::new(&config.password)?;

        let authenticator: Arc<dyn Authenticator> = Arc::new(AccessGuard::new(
            tokens.clone(),
            revocations.clone(),
            config.revocation_failure_mode,
        ));
        let rate_limiter = RateLimiter::new(cache.clone(), config.rate_limits.clone());
        let admin_quota = AdminQuotaGuard::new(cache, store.clone(), config.admin_quota.clone());
        let users = UserService::new(store, passwords, tokens, revocations, admin_quota, clock);

        log::info!(
            "애플리케이션 컨텍스트 구성 완료 (환경: {:?}, 무효화 실패 정책: {:?})",
            config.environment,
            config.revocation_failure_mode
        );

        Ok(Self {
            config: Arc::new(config),
            authenticator,
            rate_limiter,
            users,
        })
    }
}
