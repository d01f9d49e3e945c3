//! JWT 클레임 및 발급 결과
//!
//! 토큰에는 subject(사용자 uuid), 역할, 발급/만료 시각만 담습니다.
//! 서버는 토큰 자체를 저장하지 않으며, 무효화된 경우에만 무효화 목록에 흔적이 남습니다.

use crate::domain::entities::users::Role;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// 서명 검증을 통과한 클레임
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// 사용자 uuid
    pub sub: String,
    pub role: Role,
    /// 발급 시각 (Unix seconds)
    pub iat: i64,
    /// 만료 시각 (Unix seconds)
    pub exp: i64,
}

/// 발급된 토큰
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// 서명 검증 없이 읽은 클레임
///
/// 로그아웃 시 남은 유효 시간을 계산하는 용도로만 존재합니다.
/// subject와 역할은 의도적으로 노출하지 않으므로 이 값으로는 어떤 권한 판단도 할 수 없습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnverifiedClaims {
    exp: i64,
}

impl UnverifiedClaims {
    pub(crate) fn new(exp: i64) -> Self {
        Self { exp }
    }

    /// 토큰이 주장하는 만료 시각
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// `now` 기준 남은 유효 시간. 이미 만료되었으면 0 이하
    pub fn remaining_lifetime(&self, now: DateTime<Utc>) -> Duration {
        match self.expires_at() {
            Some(expires_at) => expires_at - now,
            None => Duration::zero(),
        }
    }
}
