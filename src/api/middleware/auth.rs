use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
    body::EitherBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    http::{Method, header::CONTENT_TYPE},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{info, trace};

use crate::api::jwt::get_jwt_service;
use crate::api::services::{ApiResponse, ErrorCode};
use crate::storage::PlacepinStorage;

/// 已认证用户，由 UserAuth 中间件写入请求扩展
#[derive(Clone, Copy, Debug)]
pub struct CurrentUser {
    pub id: i64,
    pub is_staff: bool,
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<CurrentUser>().copied();
        ready(user.ok_or_else(|| actix_web::error::ErrorUnauthorized("Not authenticated")))
    }
}

/// Bearer token 认证中间件
///
/// 验证 access token，加载用户并检查 is_active，
/// 将 CurrentUser 写入请求扩展供 handler 提取。
#[derive(Clone)]
pub struct UserAuth;

impl<S, B> Transform<S, ServiceRequest> for UserAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = UserAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(UserAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct UserAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> UserAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    /// Handle OPTIONS requests for CORS preflight
    fn handle_options_request(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        req.into_response(
            HttpResponse::NoContent()
                .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
                .finish()
                .map_into_right_body(),
        )
    }

    /// Handle unauthorized requests
    fn handle_unauthorized(req: ServiceRequest, message: &str) -> ServiceResponse<EitherBody<B>> {
        info!("User authentication failed - {}", message);
        req.into_response(
            HttpResponse::Unauthorized()
                .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
                .json(ApiResponse::<()> {
                    code: ErrorCode::Unauthorized as i32,
                    message: format!("Unauthorized: {}", message),
                    data: None,
                })
                .map_into_right_body(),
        )
    }

    /// 从 Authorization header 提取 Bearer token
    fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
        req.headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.to_string())
    }
}

impl<S, B> Service<ServiceRequest> for UserAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        Box::pin(async move {
            // Handle CORS preflight requests
            if req.method() == Method::OPTIONS {
                return Ok(Self::handle_options_request(req));
            }

            let Some(token) = Self::extract_bearer_token(&req) else {
                return Ok(Self::handle_unauthorized(req, "missing Bearer token"));
            };

            let user_id = match get_jwt_service().validate_access_token(&token) {
                Ok(id) => id,
                Err(e) => {
                    return Ok(Self::handle_unauthorized(req, &e.to_string()));
                }
            };

            // 从存储加载用户，拒绝不存在或已停用的账号
            let Some(storage) = req
                .app_data::<web::Data<Arc<PlacepinStorage>>>()
                .map(|d| d.get_ref().clone())
            else {
                return Ok(Self::handle_unauthorized(req, "storage unavailable"));
            };

            match storage.find_user_by_id(user_id).await {
                Ok(Some(user)) if user.is_active => {
                    trace!("User authentication successful: user_id={}", user.id);
                    req.extensions_mut().insert(CurrentUser {
                        id: user.id,
                        is_staff: user.is_staff,
                    });
                    let response = srv.call(req).await?.map_into_left_body();
                    Ok(response)
                }
                Ok(Some(_)) => Ok(Self::handle_unauthorized(req, "account is inactive")),
                Ok(None) => Ok(Self::handle_unauthorized(req, "user not found")),
                Err(e) => Ok(Self::handle_unauthorized(req, &e.to_string())),
            }
        })
    }
}
