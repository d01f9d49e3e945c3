//! # 토큰 발급/검증 서비스
//!
//! HMAC-SHA256으로 서명된 상태 없는 신원 토큰을 발급하고 검증합니다.
//!
//! ## 클레임
//!
//! | 클레임 | 내용 |
//! |--------|------|
//! | `sub` | 사용자 uuid (저장소 기본 키가 아님) |
//! | `role` | 역할 레이블 |
//! | `iat` | 발급 시각 |
//! | `exp` | 만료 시각 (발급 시각 + 유효 기간, 기본 24시간) |
//!
//! ## 검증 규칙
//!
//! - 알고리즘은 HS256으로 고정합니다. 헤더가 다른 알고리즘을 주장하면 거부합니다.
//! - 만료는 주입된 [`Clock`] 기준으로 판단하며 `exp <= now`이면 만료입니다.
//! - 서명, 알고리즘, 형식 오류는 모두 영구 거부이며 재시도 대상이 아닙니다.
//!
//! ## 미검증 읽기
//!
//! [`TokenService::read_unverified_claims`]는 로그아웃 시 남은 유효 시간을 계산하는 용도로만 존재합니다.
//! 반환 타입 [`UnverifiedClaims`]는 subject와 역할을 노출하지 않습니다.

use crate::config::JwtConfig;
use crate::core::clock::Clock;
use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::users::Role;
use crate::domain::models::token::{IssuedToken, TokenClaims, UnverifiedClaims};
use chrono::{DateTime, Duration};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Deserialize;
use std::sync::Arc;

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// 만료 시각만 읽기 위한 최소 클레임
#[derive(Debug, Deserialize)]
struct ExpiryOnly {
    exp: i64,
}

/// JWT 발급/검증 서비스
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validity: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(config: &JwtConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validity: Duration::hours(config.expiration_hours),
            clock,
        }
    }

    /// 토큰 유효 기간
    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// 새 토큰을 발급합니다.
    ///
    /// # Arguments
    ///
    /// * `subject` - 사용자 uuid
    /// * `role` - 사용자 역할
    ///
    /// # Errors
    ///
    /// * `AppError::EncodingError` - 서명 실패
    pub fn issue(&self, subject: &str, role: Role) -> AppResult<IssuedToken> {
        let now = self.clock.now();
        let expires_at = now + self.validity;

        let claims = TokenClaims {
            sub: subject.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AppError::EncodingError(format!("JWT 토큰 생성 실패: {}", e)))?;

        Ok(IssuedToken {
            token,
            expires_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or(expires_at),
        })
    }

    /// 토큰의 서명, 알고리즘, 만료를 검증하고 클레임을 반환합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::TokenInvalidSignature` - 서명 불일치, 알고리즘 불일치, 형식 오류
    /// * `AppError::TokenExpired` - 만료 시각이 지난 경우
    pub fn verify(&self, token: &str) -> AppResult<TokenClaims> {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => {
                    AppError::TokenInvalidSignature("signature mismatch".to_string())
                }
                ErrorKind::InvalidAlgorithm => {
                    AppError::TokenInvalidSignature("unexpected signing algorithm".to_string())
                }
                _ => AppError::TokenInvalidSignature(format!("malformed token: {}", e)),
            })?;

        if claims.exp <= self.clock.now().timestamp() {
            return Err(AppError::TokenExpired);
        }

        Ok(claims)
    }

    /// 서명을 검증하지 않고 만료 시각만 읽습니다.
    ///
    /// 로그아웃 시 무효화 엔트리의 TTL 계산 전용입니다. 인가 판단에 사용하면 안 됩니다.
    ///
    /// # Errors
    ///
    /// * `AppError::TokenInvalidSignature` - 토큰 구조나 `exp` 클레임을 읽을 수 없는 경우
    pub fn read_unverified_claims(&self, token: &str) -> AppResult<UnverifiedClaims> {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        decode::<ExpiryOnly>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| UnverifiedClaims::new(data.claims.exp))
            .map_err(|e| AppError::TokenInvalidSignature(format!("unreadable token: {}", e)))
    }

    /// `Authorization` 헤더에서 토큰을 꺼냅니다.
    ///
    /// 헤더는 정확히 `Bearer <token>` 두 부분이어야 합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::Unauthorized` - 형식이 다른 경우
    pub fn extract_bearer_token(auth_header: &str) -> AppResult<&str> {
        let mut parts = auth_header.split(' ');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
            _ => Err(AppError::Unauthorized(
                "유효하지 않은 인증 헤더 형식입니다".to_string(),
            )),
        }
    }
}
