//! # Application Error Handling System
//!
//! 인증 서비스 전역에서 사용하는 통합 에러 타입입니다.
//! `thiserror`로 `Error` trait을 구현하고, `actix_web::ResponseError`를 구현하여
//! 핸들러와 미들웨어에서 그대로 HTTP 응답으로 변환됩니다.
//!
//! ## 에러 분류
//!
//! | 분류 | 변형 | 재시도 |
//! |------|------|--------|
//! | 자격 증명 | `InvalidCredentials` | ✗ |
//! | 토큰 | `TokenExpired`, `TokenInvalidSignature`, `TokenRevoked`, `Unauthorized` | ✗ (영구 거부) |
//! | 권한 | `Forbidden` | ✗ |
//! | 할당량 | `RateLimited`, `QuotaExceeded` | 윈도우 경과 후 |
//! | 인프라 | `CacheUnavailable`, `PersistenceError` | ✓ (호출 계층 재량, 제한된 백오프) |
//! | 기타 | `EncodingError`, `ValidationError`, `NotFound`, `ConflictError`, `InternalError` | ✗ |
//!
//! ## HTTP 응답 매핑
//!
//! | AppError | HTTP Status | `error` 코드 |
//! |----------|-------------|--------------|
//! | `ValidationError` | 400 Bad Request | `validation_error` |
//! | `InvalidCredentials` | 401 Unauthorized | `invalid_credentials` |
//! | `Unauthorized` / `TokenInvalidSignature` | 401 Unauthorized | `unauthorized` |
//! | `TokenExpired` | 401 Unauthorized | `unauthorized` (reason: `expired`) |
//! | `TokenRevoked` | 401 Unauthorized | `unauthorized` (reason: `invalidated`) |
//! | `Forbidden` | 403 Forbidden | `forbidden` |
//! | `QuotaExceeded` | 403 Forbidden | `quota_exceeded` |
//! | `NotFound` | 404 Not Found | `not_found` |
//! | `ConflictError` | 409 Conflict | `conflict` |
//! | `RateLimited` | 429 Too Many Requests | `rate_limited` |
//! | `CacheUnavailable` | 503 Service Unavailable | `cache_unavailable` |
//! | 나머지 | 500 Internal Server Error | `internal_error` |
//!
//! 인증 실패는 원인과 관계없이 동일한 일반 메시지를 반환합니다.
//! 만료(`expired`)와 무효화(`invalidated`)만 `reason` 필드로 구분해 주며,
//! 이는 이미 로그인했던 클라이언트에게만 의미 있는 정보입니다.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// 인증 실패 시 클라이언트에게 노출하는 일반 메시지
pub const GENERIC_AUTH_MESSAGE: &str = "인증에 실패했습니다";

/// 애플리케이션 전역 에러 타입
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    /// 잘못된 비밀번호 또는 존재하지 않는 사용자 (의도적으로 구분하지 않음)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// 만료된 토큰
    #[error("Token expired")]
    TokenExpired,

    /// 서명 불일치, 알고리즘 불일치, 형식 오류
    #[error("Invalid token: {0}")]
    TokenInvalidSignature(String),

    /// 로그아웃 등으로 명시적으로 무효화된 토큰
    #[error("Token revoked")]
    TokenRevoked,

    /// Authorization 헤더 누락 또는 형식 오류
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 유효한 토큰이지만 역할이 부족함
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 요청 한도 초과
    #[error("Rate limited (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    /// 관리자 계정 수 상한 도달
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// 공유 캐시에 도달할 수 없음 (타임아웃 포함)
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    /// 관계형 저장소 오류
    #[error("Persistence error: {0}")]
    PersistenceError(String),

    /// 비밀번호 해싱/토큰 서명 실패
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// 입력값 검증 에러 (400 Bad Request)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 리소스 찾을 수 없음 에러 (404 Not Found)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 충돌/중복 에러 (409 Conflict)
    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// 내부 서버 에러 (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 호출 계층이 제한된 백오프로 재시도해도 되는 에러인지 여부
    ///
    /// 토큰 관련 암호학적/형식 에러는 영구 거부이므로 절대 재시도하지 않습니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::CacheUnavailable(_) | AppError::PersistenceError(_))
    }

    /// 응답 본문의 `error` 코드
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::TokenExpired
            | AppError::TokenInvalidSignature(_)
            | AppError::TokenRevoked
            | AppError::Unauthorized(_) => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::RateLimited { .. } => "rate_limited",
            AppError::QuotaExceeded(_) => "quota_exceeded",
            AppError::CacheUnavailable(_) => "cache_unavailable",
            AppError::ValidationError(_) => "validation_error",
            AppError::NotFound(_) => "not_found",
            AppError::ConflictError(_) => "conflict",
            AppError::PersistenceError(_)
            | AppError::EncodingError(_)
            | AppError::InternalError(_) => "internal_error",
        }
    }

    /// 인증 실패의 세부 사유 (노출해도 되는 경우에만)
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            AppError::TokenExpired => Some("expired"),
            AppError::TokenRevoked => Some("invalidated"),
            AppError::TokenInvalidSignature(_) => Some("invalid_token"),
            AppError::Unauthorized(_) => Some("missing_token"),
            _ => None,
        }
    }

    /// 클라이언트에게 보여줄 메시지
    ///
    /// 5xx 계열과 인증 실패는 내부 정보를 노출하지 않습니다.
    fn public_message(&self) -> String {
        match self {
            AppError::InvalidCredentials
            | AppError::TokenExpired
            | AppError::TokenInvalidSignature(_)
            | AppError::TokenRevoked
            | AppError::Unauthorized(_) => GENERIC_AUTH_MESSAGE.to_string(),
            AppError::Forbidden(_) => "접근 권한이 부족합니다".to_string(),
            AppError::RateLimited { .. } => "요청이 너무 많습니다. 잠시 후 다시 시도해주세요".to_string(),
            AppError::CacheUnavailable(_) => "일시적으로 요청을 처리할 수 없습니다".to_string(),
            AppError::PersistenceError(_)
            | AppError::EncodingError(_)
            | AppError::InternalError(_) => "서버 내부 오류가 발생했습니다".to_string(),
            AppError::QuotaExceeded(msg)
            | AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::ConflictError(msg) => msg.clone(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials
            | AppError::TokenExpired
            | AppError::TokenInvalidSignature(_)
            | AppError::TokenRevoked
            | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) | AppError::QuotaExceeded(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::CacheUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::PersistenceError(_)
            | AppError::EncodingError(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// HTTP 에러 응답을 생성합니다.
    ///
    /// ```json
    /// { "error": "unauthorized", "message": "인증에 실패했습니다", "reason": "invalidated" }
    /// ```
    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("요청 처리 실패: {}", self);
        }

        let mut body = json!({
            "error": self.code(),
            "message": self.public_message(),
        });
        if let Some(reason) = self.reason() {
            body["reason"] = json!(reason);
        }

        let mut builder = HttpResponse::build(self.status_code());
        if let AppError::RateLimited { retry_after_secs } = self {
            builder.insert_header(("Retry-After", retry_after_secs.to_string()));
        }
        builder.json(body)
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;

    /// 클로저를 사용하여 지연 평가된 컨텍스트를 제공합니다.
    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}
