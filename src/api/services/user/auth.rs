//! 账号注册、激活、登录与密码管理

use actix_governor::governor::middleware::NoOpMiddleware;
use actix_governor::{Governor, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError};
use actix_web::dev::ServiceRequest;
use actix_web::{Responder, Result as ActixResult, web};
use tracing::{debug, info};

use crate::api::middleware::CurrentUser;
use crate::api::services::helpers::{
    api_result, created_response, error_from_placepin, success_response,
};
use crate::api::services::types::MessageResponse;
use crate::services::UserService;

use super::types::{
    ActivateRequest, LoginRequest, PasswordChangeRequest, PasswordEmailRequest,
    PasswordResetRequest, PatchAccount, RefreshRequest, SignupRequest,
};

/// 限流 key：连接 IP（TCP peer address，无法伪造）
#[derive(Clone, Copy)]
pub struct PeerIpKeyExtractor;

impl KeyExtractor for PeerIpKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        req.connection_info()
            .peer_addr()
            .map(|ip| ip.to_string())
            .ok_or_else(|| SimpleKeyExtractionError::new("Unable to extract peer IP"))
    }
}

/// 登录限流：每秒补充 1 个令牌，突发最多 5 次
pub fn login_rate_limiter() -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let config = GovernorConfigBuilder::default()
        .seconds_per_request(1)
        .burst_size(5)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("Invalid rate limit config");

    debug!("Login rate limiter created: 1 req/s, burst 5");
    Governor::new(&config)
}

/// 注册
pub async fn signup(
    body: web::Json<SignupRequest>,
    service: web::Data<UserService>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    info!("User API: signup request - email: {}", body.email);

    match service
        .signup(
            &body.email,
            &body.password,
            &body.nickname,
            body.phone.as_deref(),
        )
        .await
    {
        Ok(user) => Ok(created_response(user)),
        Err(e) => Ok(error_from_placepin(&e)),
    }
}

/// 用激活令牌激活账号
pub async fn activate(
    body: web::Json<ActivateRequest>,
    service: web::Data<UserService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(service.activate(&body.token).await))
}

/// 邮件激活链接
pub async fn verify_email(
    path: web::Path<(i64, String)>,
    service: web::Data<UserService>,
) -> ActixResult<impl Responder> {
    let (uid, token) = path.into_inner();
    Ok(api_result(service.verify_email(uid, &token).await))
}

/// 登录，签发令牌对
pub async fn login(
    body: web::Json<LoginRequest>,
    service: web::Data<UserService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(service.login(&body.email, &body.password).await))
}

/// 刷新令牌
pub async fn refresh_token(
    body: web::Json<RefreshRequest>,
    service: web::Data<UserService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(service.refresh(&body.refresh_token).await))
}

/// 当前账号信息
pub async fn me(
    user: CurrentUser,
    service: web::Data<UserService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(service.me(user.id).await))
}

/// 修改昵称 / 手机号
pub async fn patch_account(
    user: CurrentUser,
    body: web::Json<PatchAccount>,
    service: web::Data<UserService>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    Ok(api_result(
        service
            .update_account(user.id, body.nickname, body.phone)
            .await,
    ))
}

/// 注销（停用账号）
pub async fn deactivate(
    user: CurrentUser,
    service: web::Data<UserService>,
) -> ActixResult<impl Responder> {
    match service.deactivate(user.id).await {
        Ok(()) => Ok(success_response(MessageResponse {
            message: "Account deactivated".to_string(),
        })),
        Err(e) => Ok(error_from_placepin(&e)),
    }
}

/// 修改密码
pub async fn change_password(
    user: CurrentUser,
    body: web::Json<PasswordChangeRequest>,
    service: web::Data<UserService>,
) -> ActixResult<impl Responder> {
    match service
        .change_password(user.id, &body.old_password, &body.new_password)
        .await
    {
        Ok(()) => Ok(success_response(MessageResponse {
            message: "Password changed".to_string(),
        })),
        Err(e) => Ok(error_from_placepin(&e)),
    }
}

/// 发送密码重置邮件
pub async fn password_reset_email(
    body: web::Json<PasswordEmailRequest>,
    service: web::Data<UserService>,
) -> ActixResult<impl Responder> {
    match service.request_password_reset(&body.email).await {
        Ok(()) => Ok(success_response(MessageResponse {
            message: "Password reset email sent".to_string(),
        })),
        Err(e) => Ok(error_from_placepin(&e)),
    }
}

/// 用重置令牌设置新密码
pub async fn password_reset(
    body: web::Json<PasswordResetRequest>,
    service: web::Data<UserService>,
) -> ActixResult<impl Responder> {
    match service.reset_password(&body.token, &body.new_password).await {
        Ok(()) => Ok(success_response(MessageResponse {
            message: "Password has been reset".to_string(),
        })),
        Err(e) => Ok(error_from_placepin(&e)),
    }
}
