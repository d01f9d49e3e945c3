//! User Profile HTTP Handlers
//!
//! 인증된 사용자의 프로필 조회/수정과 관리자 목록 엔드포인트입니다.
//! 모든 핸들러는 접근 가드가 저장한 [`AuthenticatedUser`]를 추출하여 사용합니다.

use crate::core::{AppError, AppState};
use crate::domain::dto::users::request::{ListQuery, UpdateProfileRequest};
use crate::domain::dto::users::response::ApiResponse;
use crate::domain::models::auth::AuthenticatedUser;
use actix_web::{HttpResponse, web};
use validator::Validate;

/// 내 프로필 조회
///
/// # Endpoint
/// `GET /api/{admin,user}/me`
pub async fn me(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let profile = state.users.profile(&user.subject).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new(profile)))
}

/// 내 프로필 수정
///
/// 이름, 전화번호, 비밀번호 중 전달된 값만 변경합니다.
///
/// # Endpoint
/// `POST /api/{admin,user}/profile/update`
pub async fn update_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    payload: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let profile = state
        .users
        .update_profile(&user.subject, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new(profile)))
}

/// 관리자 목록 (관리자 전용)
///
/// # Endpoint
/// `GET /api/admin/list?page=1&limit=10`
pub async fn list_admins(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let page = state.users.list_admins(query.page, query.limit).await?;
    Ok(HttpResponse::Ok().json(page))
}
