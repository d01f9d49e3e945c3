//! 사용자 응답 DTO
//!
//! 엔티티의 `password_hash`와 내부 `_id`는 응답에 포함하지 않습니다.

use crate::domain::entities::users::{Role, User};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// 외부에 노출되는 사용자 프로필
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    /// 안정적인 사용자 식별자 (토큰 subject와 동일)
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub role: Role,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        let User {
            uuid,
            name,
            email,
            phone_number,
            role,
            created_at,
            updated_at,
            ..
        } = user;

        Self {
            id: uuid,
            name,
            email,
            phone_number,
            role,
            created_at: created_at.try_to_rfc3339_string().unwrap_or_default(),
            updated_at: updated_at.try_to_rfc3339_string().unwrap_or_default(),
        }
    }
}

/// 로그인 성공 응답
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub profile: UserProfile,
}

impl LoginResponse {
    pub fn new(token: String, expires_at: DateTime<Utc>, user: User) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            expires_at,
            profile: UserProfile::from(user),
        }
    }
}

/// `{ "data": ... }` 형태의 단일 응답
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// 페이지 메타 정보
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
}

/// `{ "data": [...], "meta": {...} }` 형태의 목록 응답
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}
