//! # 사용자 리포지토리 구현
//!
//! MongoDB `users` 컬렉션 위의 [`UserStore`] 구현입니다.
//!
//! ## 인덱스
//!
//! | 이름 | 키 | 옵션 |
//! |------|----|------|
//! | `email_unique` | `email` | unique |
//! | `uuid_unique` | `uuid` | unique |
//! | `role_created_at` | `role`, `created_at` | - |
//!
//! 이메일 중복은 유니크 인덱스 위반(코드 11000)으로 감지하여 `ConflictError`로 변환합니다.
//! 먼저 조회한 뒤 삽입하는 방식은 동시 가입에서 경쟁이 생기므로 사용하지 않습니다.

use super::UserStore;
use crate::core::errors::{AppError, AppResult, ErrorContext};
use crate::db::Database;
use crate::domain::entities::users::{Role, User};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Collection, IndexModel, bson::doc};

const COLLECTION: &str = "users";
const DUPLICATE_KEY: i32 = 11000;

/// MongoDB 사용자 저장소
#[derive(Clone)]
pub struct MongoUserStore {
    collection: Collection<User>,
}

impl MongoUserStore {
    /// 컬렉션 핸들을 만들고 인덱스를 보장합니다.
    pub async fn new(database: &Database) -> AppResult<Self> {
        let store = Self {
            collection: database.get_database().collection::<User>(COLLECTION),
        };
        store.create_indexes().await?;
        Ok(store)
    }

    async fn create_indexes(&self) -> AppResult<()> {
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("email_unique".to_string())
                .build())
            .build();

        let uuid_index = IndexModel::builder()
            .keys(doc! { "uuid": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("uuid_unique".to_string())
                .build())
            .build();

        let role_index = IndexModel::builder()
            .keys(doc! { "role": 1, "created_at": 1 })
            .options(IndexOptions::builder()
                .name("role_created_at".to_string())
                .build())
            .build();

        self.collection
            .create_indexes([email_index, uuid_index, role_index])
            .await
            .map_err(persistence)?;

        log::info!("users 컬렉션 인덱스 확인 완료");
        Ok(())
    }
}

fn persistence(e: mongodb::error::Error) -> AppError {
    AppError::PersistenceError(e.to_string())
}

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    matches!(
        e.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn count_by_role(&self, role: Role) -> AppResult<u64> {
        self.collection
            .count_documents(doc! { "role": role.as_str() })
            .await
            .map_err(persistence)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.collection
            .find_one(doc! { "email": email })
            .await
            .map_err(persistence)
    }

    async fn find_by_uuid(&self, uuid: &str) -> AppResult<Option<User>> {
        self.collection
            .find_one(doc! { "uuid": uuid })
            .await
            .map_err(persistence)
    }

    async fn find_by_role(&self, role: Role, page: u64, limit: u64) -> AppResult<(Vec<User>, u64)> {
        let filter = doc! { "role": role.as_str() };
        let page_size = i64::try_from(limit).context("페이지 크기가 범위를 벗어났습니다")?;
        let total = self
            .collection
            .count_documents(filter.clone())
            .await
            .map_err(persistence)?;

        let users = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": 1 })
            .skip(page.saturating_sub(1).saturating_mul(limit))
            .limit(page_size)
            .await
            .map_err(persistence)?
            .try_collect::<Vec<User>>()
            .await
            .map_err(persistence)?;

        Ok((users, total))
    }

    async fn create(&self, mut user: User) -> AppResult<User> {
        let result = self.collection.insert_one(&user).await.map_err(|e| {
            if is_duplicate_key(&e) {
                AppError::ConflictError("이미 사용 중인 이메일입니다".to_string())
            } else {
                persistence(e)
            }
        })?;

        user.id = result.inserted_id.as_object_id();
        Ok(user)
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        let result = self
            .collection
            .replace_one(doc! { "uuid": user.uuid.as_str() }, user)
            .await
            .map_err(persistence)?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound("사용자를 찾을 수 없습니다".to_string()));
        }
        Ok(())
    }
}
