//! 요청 한도 미들웨어
//!
//! 스코프나 리소스에 라우트 클래스를 붙여 [`RateLimiter`](crate::services::rate_limit::RateLimiter)로 요청을 집계합니다.
//! 중첩해서 적용하면 각 클래스가 독립적으로 집계됩니다 (예: 로그인은 `default`와 `login` 모두).
//! 클라이언트 키는 [`client_key`]로 만들며, 프록시 헤더는 신뢰 프록시가 보낸 요청에서만 읽습니다.
//!
//! | 결과 | 응답 |
//! |------|------|
//! | 한도 이내 | 다음 서비스로 전달 |
//! | 한도 초과 | 429, `Retry-After: <윈도우 남은 초>` |
//! | 캐시 장애 | 503 |

use std::future::{Ready, ready};
use std::rc::Rc;

use crate::core::{AppError, AppState};
use crate::middlewares::auth_inner::reject;
use crate::utils::client_ip::client_key;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::{Error, Result, web};
use futures_util::future::LocalBoxFuture;

pub struct RateLimitMiddleware {
    route_class: &'static str,
}

impl RateLimitMiddleware {
    /// 지정한 라우트 클래스의 정책으로 집계하는 미들웨어
    pub fn for_class(route_class: &'static str) -> Self {
        Self { route_class }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service: Rc::new(service),
            route_class: self.route_class,
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
    route_class: &'static str,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
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
        let route_class = self.route_class;

        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                log::error!("AppState가 등록되지 않은 앱에 RateLimitMiddleware가 적용되었습니다");
                return Ok(reject(req, AppError::InternalError("요청 한도 컨텍스트 없음".to_string())));
            };

            let client = client_key(
                req.headers(),
                req.peer_addr(),
                &state.config.server.trusted_proxies,
            );

            match state.rate_limiter.check(&client, route_class).await {
                Ok(decision) if decision.allowed => {}
                Ok(decision) => {
                    return Ok(reject(
                        req,
                        AppError::RateLimited {
                            retry_after_secs: decision.retry_after_secs(),
                        },
                    ));
                }
                Err(e) => return Ok(reject(req, e)),
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}
