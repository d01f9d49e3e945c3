//! # 관리자 할당량
//!
//! 관리자 계정 수가 상한(기본 3)을 넘지 않도록 "개수 확인 후 생성"을 임계 구역으로 실행합니다.
//!
//! ## 클러스터 단위 권고 잠금
//!
//! ```text
//! lock:admin_quota = <lease uuid>   (SET NX PX lock_ttl)
//!
//! acquire ──► count_by_role(Admin) ──► (count < ceiling) ──► create ──► release (compare-and-delete)
//!                     │
//!                     └─(count >= ceiling)──► QuotaExceeded, create 없음
//! ```
//!
//! 잠금이 유지되고 만료되지 않은 동안에는 모든 인스턴스를 통틀어 하나의 등록만 할당량을 평가하고 생성합니다.
//! 경합 시 선형 백오프로 `lock_retries`번 재시도한 뒤 `ConflictError`로 실패합니다.
//!
//! 해제는 자신이 얻은 lease 값과 일치할 때만 삭제합니다. 만료 후 다른 요청이 얻은 잠금을 지우지 않습니다.
//!
//! ## 남은 경합 구간
//!
//! 생성이 `lock_ttl`보다 오래 걸리면 잠금이 먼저 만료되어 다른 등록이 같은 개수를 읽을 수 있습니다.
//! 이 경우 상한을 넘을 수 있으며, 이 구간은 알려진 제약으로 받아들입니다.

use crate::caching::CacheStore;
use crate::config::AdminQuotaConfig;
use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::users::{Role, User};
use crate::repositories::users::UserStore;
use std::sync::Arc;

const LOCK_KEY: &str = "lock:admin_quota";

#[derive(Clone)]
pub struct AdminQuotaGuard {
    cache: Arc<dyn CacheStore>,
    store: Arc<dyn UserStore>,
    config: AdminQuotaConfig,
}

impl AdminQuotaGuard {
    pub fn new(cache: Arc<dyn CacheStore>, store: Arc<dyn UserStore>, config: AdminQuotaConfig) -> Self {
        Self { cache, store, config }
    }

    /// 관리자 상한
    pub fn ceiling(&self) -> u64 {
        self.config.ceiling
    }

    /// 잠금 안에서 관리자 수를 확인하고 상한 미만일 때만 사용자를 생성합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::QuotaExceeded` - 이미 상한만큼 관리자가 있는 경우 (생성하지 않음)
    /// * `AppError::ConflictError` - 잠금 경합이 재시도 후에도 풀리지 않은 경우, 또는 이메일 중복
    /// * `AppError::CacheUnavailable` - 잠금을 얻을 수 없는 캐시 장애
    /// * `AppError::PersistenceError` - 저장소 오류
    pub async fn create_within_quota(&self, user: User) -> AppResult<User> {
        let lease = self.acquire().await?;
        let result = self.check_and_create(user).await;
        self.release(&lease).await;
        result
    }

    async fn check_and_create(&self, user: User) -> AppResult<User> {
        let admins = self.store.count_by_role(Role::Admin).await?;

        if admins >= self.config.ceiling {
            log::warn!(
                "관리자 할당량 초과: 현재 {}명, 상한 {}명 ({})",
                admins,
                self.config.ceiling,
                user.email
            );
            return Err(AppError::QuotaExceeded(format!(
                "관리자 계정은 최대 {}개까지 만들 수 있습니다",
                self.config.ceiling
            )));
        }

        let created = self.store.create(user).await?;
        log::info!(
            "관리자 계정 생성: {} ({}/{})",
            created.uuid,
            admins + 1,
            self.config.ceiling
        );
        Ok(created)
    }

    async fn acquire(&self) -> AppResult<String> {
        let lease = uuid::Uuid::new_v4().to_string();

        for attempt in 0..=self.config.lock_retries {
            if self
                .cache
                .set_if_absent(LOCK_KEY, &lease, self.config.lock_ttl)
                .await?
            {
                return Ok(lease);
            }

            if attempt < self.config.lock_retries {
                let backoff = self.config.lock_backoff * (attempt + 1);
                log::debug!("관리자 할당량 잠금 대기 ({}회차, {:?})", attempt + 1, backoff);
                tokio::time::sleep(backoff).await;
            }
        }

        log::warn!(
            "관리자 할당량 잠금 획득 실패: {}회 재시도 초과",
            self.config.lock_retries
        );
        Err(AppError::ConflictError(
            "다른 관리자 등록이 진행 중입니다. 잠시 후 다시 시도해주세요".to_string(),
        ))
    }

    async fn release(&self, lease: &str) {
        match self.cache.delete_if_equals(LOCK_KEY, lease).await {
            Ok(true) => {}
            Ok(false) => log::warn!("관리자 할당량 잠금이 해제 전에 만료되었습니다"),
            Err(e) => log::warn!("관리자 할당량 잠금 해제 실패, TTL 만료에 맡깁니다: {}", e),
        }
    }
}
