//! 사용자 저장소
//!
//! 코어는 사용자 저장소를 호출 단위로 원자적인 외부 협력자로 취급합니다.
//! 저장소가 보고한 오류는 `AppError::PersistenceError`로, 이메일 중복은
//! `AppError::ConflictError`로 전달됩니다.

pub mod memory;
pub mod user_repo;

pub use memory::InMemoryUserStore;
pub use user_repo::MongoUserStore;

use crate::core::errors::AppResult;
use crate::domain::entities::users::{Role, User};
use async_trait::async_trait;

/// 관계형 저장소 협력자 인터페이스
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 역할별 사용자 수
    async fn count_by_role(&self, role: Role) -> AppResult<u64>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// 토큰 subject(uuid)로 조회합니다.
    async fn find_by_uuid(&self, uuid: &str) -> AppResult<Option<User>>;

    /// 역할별 목록을 생성 순서대로 페이지 단위로 조회합니다.
    ///
    /// # Returns
    ///
    /// `(해당 페이지의 사용자, 전체 수)`
    async fn find_by_role(&self, role: Role, page: u64, limit: u64) -> AppResult<(Vec<User>, u64)>;

    /// 사용자를 저장하고 저장소가 부여한 id가 채워진 값을 반환합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConflictError` - 이메일 중복
    async fn create(&self, user: User) -> AppResult<User>;

    /// uuid가 같은 사용자를 통째로 갱신합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - 대상 사용자가 없는 경우
    async fn update(&self, user: &User) -> AppResult<()>;
}
