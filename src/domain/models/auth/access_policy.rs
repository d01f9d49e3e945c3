//! 보호된 라우트의 접근 정책

use crate::domain::entities::users::Role;

/// 라우트가 요구하는 접근 조건
///
/// 역할 검사는 항상 토큰 검증과 무효화 확인이 끝난 뒤에 수행됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// 유효한 토큰만 요구
    Authenticated,
    /// 유효한 토큰과 특정 역할을 요구
    RequireRole(Role),
}

impl AccessPolicy {
    /// 인증된 역할이 정책을 만족하는지 확인합니다.
    pub fn permits(&self, role: Role) -> bool {
        match self {
            AccessPolicy::Authenticated => true,
            AccessPolicy::RequireRole(required) => *required == role,
        }
    }
}
