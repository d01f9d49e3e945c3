//! User Entity Implementation
//!
//! 사용자 엔티티입니다. 토큰의 subject로는 변하지 않는 `uuid`를 사용합니다.
//! 저장소의 기본 키(`_id`)는 행이 다시 만들어지면 바뀔 수 있으므로 토큰에 넣지 않습니다.

use super::Role;
use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// 사용자 계정 엔티티
///
/// `password_hash`는 저장소에만 기록되며 응답 DTO로는 절대 노출되지 않습니다.
/// 응답은 [`UserProfile`](crate::domain::dto::users::response::UserProfile)로 변환해서 내보냅니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 토큰 subject로 쓰이는 안정적인 식별자
    pub uuid: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    /// 새 사용자를 생성합니다. `uuid`는 v4로 새로 발급합니다.
    pub fn new(
        name: String,
        email: String,
        phone_number: Option<String>,
        password_hash: String,
        role: Role,
    ) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            uuid: uuid::Uuid::new_v4().to_string(),
            name,
            email,
            phone_number,
            password_hash,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// `updated_at`을 현재 시각으로 갱신합니다.
    pub fn touch(&mut self) {
        self.updated_at = DateTime::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_gets_distinct_uuid() {
        let a = User::new("A".into(), "a@example.com".into(), None, "hash".into(), Role::Customer);
        let b = User::new("B".into(), "b@example.com".into(), None, "hash".into(), Role::Customer);

        assert_ne!(a.uuid, b.uuid);
        assert!(a.id.is_none());
        assert!(!a.is_admin());
    }
}
