//! 인메모리 사용자 저장소
//!
//! 테스트와 로컬 실행용 [`UserStore`] 구현입니다. 생성 횟수를 기록하여
//! "할당량 초과 시 생성이 일어나지 않는다"는 성질을 검증할 수 있습니다.

use super::UserStore;
use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::users::{Role, User};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
    create_calls: AtomicUsize,
    available: AtomicBool,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            create_calls: AtomicUsize::new(0),
            available: AtomicBool::new(true),
        }
    }

    /// `create`가 호출된 횟수 (실패 포함)
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// 저장소 장애를 흉내 냅니다. `false`이면 모든 연산이 `PersistenceError`
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn users(&self) -> AppResult<MutexGuard<'_, Vec<User>>> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(AppError::PersistenceError("in-memory store marked unavailable".to_string()));
        }
        Ok(match self.users.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        })
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn count_by_role(&self, role: Role) -> AppResult<u64> {
        let users = self.users()?;
        Ok(users.iter().filter(|u| u.role == role).count() as u64)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users()?;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_uuid(&self, uuid: &str) -> AppResult<Option<User>> {
        let users = self.users()?;
        Ok(users.iter().find(|u| u.uuid == uuid).cloned())
    }

    async fn find_by_role(&self, role: Role, page: u64, limit: u64) -> AppResult<(Vec<User>, u64)> {
        let users = self.users()?;
        let matching: Vec<&User> = users.iter().filter(|u| u.role == role).collect();
        let total = matching.len() as u64;
        let skip = usize::try_from(page.saturating_sub(1).saturating_mul(limit)).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);

        let page_items = matching.into_iter().skip(skip).take(take).cloned().collect();
        Ok((page_items, total))
    }

    async fn create(&self, mut user: User) -> AppResult<User> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let mut users = self.users()?;

        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::ConflictError("이미 사용 중인 이메일입니다".to_string()));
        }

        user.id = Some(ObjectId::new());
        users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        let mut users = self.users()?;
        match users.iter_mut().find(|u| u.uuid == user.uuid) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(AppError::NotFound("사용자를 찾을 수 없습니다".to_string())),
        }
    }
}
