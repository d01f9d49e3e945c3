//! 인증된 사용자 정보
//!
//! 접근 가드가 요청을 승인하면 이 값이 요청 extensions에 저장되고,
//! 핸들러는 `FromRequest` 추출자로 받아 사용합니다.
//!
//! ```rust,ignore
//! #[get("/me")]
//! pub async fn me(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
//!     log::info!("요청 사용자: {}", user.subject);
//!     ...
//! }
//! ```

use crate::core::errors::AppError;
use crate::domain::entities::users::Role;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use serde::Serialize;
use std::future::{Ready, ready};

/// 검증된 토큰에서 얻은 요청 주체
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    /// 토큰 subject (사용자 uuid)
    pub subject: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(AppError::Unauthorized(
                "인증되지 않은 요청입니다".to_string(),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_extracts_user_from_extensions() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(AuthenticatedUser {
            subject: "uuid-1".into(),
            role: Role::Admin,
        });

        let user = AuthenticatedUser::extract(&req).await.unwrap();
        assert_eq!(user.subject, "uuid-1");
        assert!(user.is_admin());
    }

    #[actix_web::test]
    async fn test_missing_user_is_unauthorized() {
        let req = TestRequest::default().to_http_request();
        let result = AuthenticatedUser::extract(&req).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
