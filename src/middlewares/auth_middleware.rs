//! 인증 미들웨어
//!
//! 요청의 `Authorization` 헤더를 [`Authenticator`](crate::services::auth::Authenticator)에 넘겨 판정하고,
//! 승인된 경우 [`AuthenticatedUser`](crate::domain::models::auth::AuthenticatedUser)를 request extensions에 저장합니다.

use std::future::{Ready, ready};
use std::rc::Rc;

use crate::domain::entities::users::Role;
use crate::domain::models::auth::AccessPolicy;
use crate::middlewares::auth_inner::AuthMiddlewareService;
use actix_web::{
    Error, Result,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
};

/// 접근 가드 미들웨어
pub struct AuthMiddleware {
    policy: AccessPolicy,
}

impl AuthMiddleware {
    pub fn new(policy: AccessPolicy) -> Self {
        Self { policy }
    }

    /// 유효한 토큰만 요구
    pub fn required() -> Self {
        Self::new(AccessPolicy::Authenticated)
    }

    /// 유효한 토큰과 특정 역할을 요구
    pub fn with_role(role: Role) -> Self {
        Self::new(AccessPolicy::RequireRole(role))
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            policy: self.policy,
        }))
    }
}
