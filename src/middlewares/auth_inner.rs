//! AuthMiddleware 인증 로직의 핵심적인 기능
use std::rc::Rc;

use crate::core::{AppError, AppState};
use crate::domain::models::auth::AccessPolicy;
use crate::services::auth::AccessDecision;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, forward_ready};
use actix_web::http::header;
use actix_web::{Error, HttpMessage, ResponseError, web};
use futures_util::future::LocalBoxFuture;

/// 실제 인증 판정을 수행하는 서비스
pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub policy: AccessPolicy,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let policy = self.policy;

        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                log::error!("AppState가 등록되지 않은 앱에 AuthMiddleware가 적용되었습니다");
                return Ok(reject(req, AppError::InternalError("인증 컨텍스트 없음".to_string())));
            };

            let authorization = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .map(str::to_owned);

            match state
                .authenticator
                .authenticate(authorization.as_deref(), policy)
                .await
            {
                AccessDecision::Authorized(user) => {
                    req.extensions_mut().insert(user);
                }
                AccessDecision::Rejected(reason) => {
                    return Ok(reject(req, reason.into_error()));
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// 핸들러를 호출하지 않고 에러 응답으로 끝냅니다.
pub(crate) fn reject<B>(req: ServiceRequest, error: AppError) -> ServiceResponse<EitherBody<B>> {
    let response = error.error_response();
    let (req, _) = req.into_parts();
    ServiceResponse::new(req, response).map_into_right_body()
}
