//! # 접근 가드
//!
//! 보호된 요청마다 실행되는 인증 결정 파이프라인입니다.
//! 예외로 흐름을 끊지 않고, 각 단계가 다음 단계로 넘어가거나 거부 사유를 돌려주는
//! 명시적인 상태 전이로 구성됩니다.
//!
//! ```text
//! NoToken ──(Bearer <token>)──► CheckingRevocation ──(무효화 아님)──► Verifying ──(서명/만료 OK)──► Authorized
//!    │                               │                                   │                            │
//!    ▼                               ▼                                   ▼                            ▼
//! Rejected(MissingToken)      Rejected(Revoked)                  Rejected(Expired |          (역할 정책 검사)
//!                             Rejected(RevocationUnverifiable)            InvalidToken)      Rejected(Forbidden)
//! ```
//!
//! 역할 검사는 반드시 `Authorized` 이후에 수행합니다. 토큰의 역할 클레임은
//! 서명과 무효화 확인을 통과하기 전에는 신뢰할 수 없습니다.
//!
//! ## 캐시 장애
//!
//! 무효화 목록을 조회할 수 없을 때의 동작은 [`RevocationFailureMode`]로 명시합니다.
//! 기본값 `FailClosed`는 요청을 거부(503)하고, `FailOpen`은 경고를 남긴 뒤 서명/만료 검증만으로 판단합니다.

use super::token_service::TokenService;
use crate::config::RevocationFailureMode;
use crate::core::errors::AppError;
use crate::domain::models::auth::{AccessPolicy, AuthenticatedUser};
use crate::repositories::tokens::RevocationStore;
use crate::utils::token_utils::token_fingerprint;
use async_trait::async_trait;

/// 거부 사유
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// 헤더 누락 또는 `Bearer <token>` 형식이 아님
    MissingToken,
    /// 로그아웃 등으로 무효화된 토큰
    Revoked,
    /// 무효화 목록을 확인할 수 없음 (fail-closed)
    RevocationUnverifiable(String),
    /// 만료된 토큰
    Expired,
    /// 서명 불일치, 알고리즘 불일치, 형식 오류
    InvalidToken(String),
    /// 인증은 되었으나 역할이 부족함
    Forbidden,
}

impl RejectReason {
    /// 응답으로 변환할 에러
    pub fn into_error(self) -> AppError {
        match self {
            RejectReason::MissingToken => {
                AppError::Unauthorized("Authorization 헤더가 없거나 형식이 잘못되었습니다".to_string())
            }
            RejectReason::Revoked => AppError::TokenRevoked,
            RejectReason::RevocationUnverifiable(detail) => AppError::CacheUnavailable(detail),
            RejectReason::Expired => AppError::TokenExpired,
            RejectReason::InvalidToken(detail) => AppError::TokenInvalidSignature(detail),
            RejectReason::Forbidden => AppError::Forbidden("요구되는 역할이 아닙니다".to_string()),
        }
    }
}

/// 인증 결정
#[derive(Debug, Clone, PartialEq)]
pub enum AccessDecision {
    Authorized(AuthenticatedUser),
    Rejected(RejectReason),
}

/// 요청 인증 능력
///
/// 미들웨어와 핸들러는 구체 타입 대신 이 trait에 의존합니다.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// `Authorization` 헤더 값과 접근 정책으로 요청을 판정합니다.
    async fn authenticate(&self, authorization: Option<&str>, policy: AccessPolicy) -> AccessDecision;
}

/// 토큰 검증과 무효화 목록을 결합한 기본 [`Authenticator`]
#[derive(Clone)]
pub struct AccessGuard {
    tokens: TokenService,
    revocations: RevocationStore,
    failure_mode: RevocationFailureMode,
}

impl AccessGuard {
    pub fn new(
        tokens: TokenService,
        revocations: RevocationStore,
        failure_mode: RevocationFailureMode,
    ) -> Self {
        Self {
            tokens,
            revocations,
            failure_mode,
        }
    }

    fn reject(reason: RejectReason) -> AccessDecision {
        log::warn!("접근 거부: {:?}", reason);
        AccessDecision::Rejected(reason)
    }
}

#[async_trait]
impl Authenticator for AccessGuard {
    async fn authenticate(&self, authorization: Option<&str>, policy: AccessPolicy) -> AccessDecision {
        // NoToken
        let token = match authorization.map(TokenService::extract_bearer_token) {
            Some(Ok(token)) => token,
            _ => return Self::reject(RejectReason::MissingToken),
        };
        let fingerprint = token_fingerprint(token);

        // CheckingRevocation
        match self.revocations.is_revoked(token).await {
            Ok(true) => {
                log::warn!("무효화된 토큰 사용 시도: {}", fingerprint);
                return Self::reject(RejectReason::Revoked);
            }
            Ok(false) => {}
            Err(e) => match self.failure_mode {
                RevocationFailureMode::FailClosed => {
                    return Self::reject(RejectReason::RevocationUnverifiable(e.to_string()));
                }
                RevocationFailureMode::FailOpen => {
                    log::warn!("무효화 목록 확인 불가, fail-open 정책으로 진행: {} ({})", fingerprint, e);
                }
            },
        }

        // Verifying
        let claims = match self.tokens.verify(token) {
            Ok(claims) => claims,
            Err(AppError::TokenExpired) => return Self::reject(RejectReason::Expired),
            Err(e) => return Self::reject(RejectReason::InvalidToken(e.to_string())),
        };

        // Authorized
        let user = AuthenticatedUser {
            subject: claims.sub,
            role: claims.role,
        };

        if !policy.permits(user.role) {
            log::warn!("권한 부족: 사용자 {} ({}), 정책 {:?}", user.subject, user.role, policy);
            return Self::reject(RejectReason::Forbidden);
        }

        log::debug!("인증 성공: 사용자 {} ({})", user.subject, user.role);
        AccessDecision::Authorized(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caching::memory::InMemoryCache;
    use crate::config::JwtConfig;
    use crate::core::clock::ManualClock;
    use crate::domain::entities::users::Role;
    use chrono::Duration;
    use std::sync::Arc;

    struct Fixture {
        guard: AccessGuard,
        tokens: TokenService,
        revocations: RevocationStore,
        cache: Arc<InMemoryCache>,
        clock: Arc<ManualClock>,
    }

    fn fixture(failure_mode: RevocationFailureMode) -> Fixture {
        let clock = Arc::new(ManualClock::default());
        let cache = Arc::new(InMemoryCache::new(clock.clone()));
        let tokens = TokenService::new(
            &JwtConfig {
                secret: "guard-test-secret".into(),
                expiration_hours: 24,
            },
            clock.clone(),
        );
        let revocations = RevocationStore::new(cache.clone());
        let guard = AccessGuard::new(tokens.clone(), revocations.clone(), failure_mode);
        Fixture {
            guard,
            tokens,
            revocations,
            cache,
            clock,
        }
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {}", token)
    }

    #[actix_web::test]
    async fn test_valid_token_is_authorized() {
        let f = fixture(RevocationFailureMode::FailClosed);
        let issued = f.tokens.issue("uuid-1", Role::Customer).unwrap();

        let decision = f
            .guard
            .authenticate(Some(&bearer(&issued.token)), AccessPolicy::Authenticated)
            .await;

        assert_eq!(
            decision,
            AccessDecision::Authorized(AuthenticatedUser {
                subject: "uuid-1".into(),
                role: Role::Customer,
            })
        );
    }

    #[actix_web::test]
    async fn test_missing_or_malformed_header() {
        let f = fixture(RevocationFailureMode::FailClosed);

        for header in [None, Some("Token abc"), Some("Bearer"), Some("Bearer a b")] {
            let decision = f.guard.authenticate(header, AccessPolicy::Authenticated).await;
            assert_eq!(decision, AccessDecision::Rejected(RejectReason::MissingToken));
        }
    }

    #[actix_web::test]
    async fn test_revoked_token_is_rejected_even_if_otherwise_valid() {
        let f = fixture(RevocationFailureMode::FailClosed);
        let issued = f.tokens.issue("uuid-1", Role::Admin).unwrap();
        f.revocations.revoke(&issued.token, Duration::hours(1)).await.unwrap();

        let decision = f
            .guard
            .authenticate(Some(&bearer(&issued.token)), AccessPolicy::Authenticated)
            .await;
        assert_eq!(decision, AccessDecision::Rejected(RejectReason::Revoked));
    }

    #[actix_web::test]
    async fn test_expired_token() {
        let f = fixture(RevocationFailureMode::FailClosed);
        let issued = f.tokens.issue("uuid-1", Role::Admin).unwrap();
        f.clock.advance(Duration::hours(25));

        let decision = f
            .guard
            .authenticate(Some(&bearer(&issued.token)), AccessPolicy::Authenticated)
            .await;
        assert_eq!(decision, AccessDecision::Rejected(RejectReason::Expired));
    }

    #[actix_web::test]
    async fn test_role_checked_after_verification() {
        let f = fixture(RevocationFailureMode::FailClosed);
        let customer = f.tokens.issue("uuid-1", Role::Customer).unwrap();

        let decision = f
            .guard
            .authenticate(Some(&bearer(&customer.token)), AccessPolicy::RequireRole(Role::Admin))
            .await;
        assert_eq!(decision, AccessDecision::Rejected(RejectReason::Forbidden));

        // 서명이 틀린 토큰은 역할과 무관하게 Forbidden이 아닌 InvalidToken
        let tampered = format!("{}x", customer.token);
        let decision = f
            .guard
            .authenticate(Some(&bearer(&tampered)), AccessPolicy::RequireRole(Role::Admin))
            .await;
        assert!(matches!(decision, AccessDecision::Rejected(RejectReason::InvalidToken(_))));
    }

    #[actix_web::test]
    async fn test_cache_outage_fails_closed_by_default() {
        let f = fixture(RevocationFailureMode::FailClosed);
        let issued = f.tokens.issue("uuid-1", Role::Admin).unwrap();
        f.cache.set_available(false);

        let decision = f
            .guard
            .authenticate(Some(&bearer(&issued.token)), AccessPolicy::Authenticated)
            .await;
        match decision {
            AccessDecision::Rejected(reason @ RejectReason::RevocationUnverifiable(_)) => {
                assert!(reason.into_error().is_retryable());
            }
            other => panic!("expected fail-closed rejection, got {:?}", other),
        }
    }

    #[actix_web::test]
    async fn test_cache_outage_fail_open_still_verifies_signature() {
        let f = fixture(RevocationFailureMode::FailOpen);
        let issued = f.tokens.issue("uuid-1", Role::Admin).unwrap();
        f.cache.set_available(false);

        let decision = f
            .guard
            .authenticate(Some(&bearer(&issued.token)), AccessPolicy::Authenticated)
            .await;
        assert!(matches!(decision, AccessDecision::Authorized(_)));

        let decision = f
            .guard
            .authenticate(Some("Bearer forged.token.value"), AccessPolicy::Authenticated)
            .await;
        assert!(matches!(decision, AccessDecision::Rejected(RejectReason::InvalidToken(_))));
    }

    #[test]
    fn test_reject_reason_error_mapping() {
        assert_eq!(RejectReason::Revoked.into_error(), AppError::TokenRevoked);
        assert_eq!(RejectReason::Expired.into_error(), AppError::TokenExpired);
        assert!(matches!(RejectReason::MissingToken.into_error(), AppError::Unauthorized(_)));
        assert!(matches!(RejectReason::Forbidden.into_error(), AppError::Forbidden(_)));
    }
}
