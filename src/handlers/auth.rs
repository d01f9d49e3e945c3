//! Authentication HTTP Handlers
//!
//! 회원가입, 로그인, 로그아웃 엔드포인트입니다. 비즈니스 로직은 [`UserService`](crate::services::users::UserService)에 있고,
//! 핸들러는 입력 검증과 응답 구성만 담당합니다.
//!
//! # Endpoints
//!
//! - `POST /api/admin/register` - 관리자 가입 (할당량 적용)
//! - `POST /api/user/register` - 고객 가입
//! - `POST /api/{admin,user}/login` - 로그인 (`login` 클래스 요청 한도)
//! - `POST /api/{admin,user}/logout` - 현재 토큰 무효화 (인증 필요)

use crate::core::{AppError, AppState};
use crate::domain::dto::users::request::{LoginRequest, RegisterRequest};
use crate::domain::dto::users::response::ApiResponse;
use crate::domain::entities::users::Role;
use crate::domain::models::auth::AuthenticatedUser;
use crate::services::auth::TokenService;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, post, web};
use serde_json::json;
use validator::Validate;

/// 관리자 가입 핸들러
///
/// # Endpoint
/// `POST /api/admin/register`
///
/// # Errors
///
/// * `403 quota_exceeded` - 관리자 상한 도달
/// * `409 conflict` - 이메일 중복 또는 동시 관리자 등록 경합
#[post("/register")]
pub async fn register_admin(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    register(state, payload.into_inner(), Role::Admin).await
}

/// 고객 가입 핸들러
///
/// # Endpoint
/// `POST /api/user/register`
#[post("/register")]
pub async fn register_customer(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    register(state, payload.into_inner(), Role::Customer).await
}

async fn register(
    state: web::Data<AppState>,
    request: RegisterRequest,
    role: Role,
) -> Result<HttpResponse, AppError> {
    request
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let profile = state.users.register(request, role).await?;
    Ok(HttpResponse::Created().json(ApiResponse::new(profile)))
}

/// 로그인 핸들러
///
/// 라우트 설정에서 `login` 클래스 요청 한도를 리소스에 직접 감싸므로 매크로 없이 등록합니다.
///
/// # Endpoint
/// `POST /api/{admin,user}/login`
///
/// # Returns
///
/// ```json
/// { "token": "eyJ...", "token_type": "Bearer", "expires_at": "...", "profile": { ... } }
/// ```
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = state.users.login(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// 로그아웃 핸들러
///
/// 접근 가드를 통과한 현재 토큰을 남은 유효 시간 동안 무효화합니다.
///
/// # Endpoint
/// `POST /api/{admin,user}/logout`
pub async fn logout(
    state: web::Data<AppState>,
    req: HttpRequest,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Authorization 헤더가 없습니다".to_string()))?;
    let token = TokenService::extract_bearer_token(auth_header)?;

    state.users.logout(token).await?;
    log::info!("로그아웃 완료: 사용자 {}", user.subject);

    Ok(HttpResponse::Ok().json(json!({
        "message": "로그아웃되었습니다"
    })))
}
