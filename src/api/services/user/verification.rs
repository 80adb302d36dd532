//! 手机验证码接口

use actix_governor::governor::middleware::NoOpMiddleware;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{Responder, Result as ActixResult, web};
use tracing::debug;

use crate::api::services::helpers::{api_result, error_from_placepin, success_response};
use crate::api::services::types::MessageResponse;
use crate::services::VerificationService;

use super::auth::PeerIpKeyExtractor;
use super::types::{PhoneConfirmRequest, PhoneSendRequest};

/// 短信发送限流：每 10 秒 1 条，突发最多 3 条
pub fn sms_rate_limiter() -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let config = GovernorConfigBuilder::default()
        .seconds_per_request(10)
        .burst_size(3)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("Invalid rate limit config");

    debug!("SMS rate limiter created: 1 req/10s, burst 3");
    Governor::new(&config)
}

async fn send_code(
    service: &VerificationService,
    phone: &str,
    purpose: &str,
) -> actix_web::HttpResponse {
    match service.send_code(phone, purpose).await {
        Ok(()) => success_response(MessageResponse {
            message: "Verification code sent".to_string(),
        }),
        Err(e) => error_from_placepin(&e),
    }
}

/// 发送注册验证码
pub async fn send_signup_code(
    body: web::Json<PhoneSendRequest>,
    service: web::Data<VerificationService>,
) -> ActixResult<impl Responder> {
    Ok(send_code(
        &service,
        &body.phone,
        crate::services::verification_service::PURPOSE_SIGNUP,
    )
    .await)
}

/// 发送找回账号验证码
pub async fn send_account_code(
    body: web::Json<PhoneSendRequest>,
    service: web::Data<VerificationService>,
) -> ActixResult<impl Responder> {
    Ok(send_code(
        &service,
        &body.phone,
        crate::services::verification_service::PURPOSE_ACCOUNT,
    )
    .await)
}

/// 确认注册验证码
pub async fn confirm_signup_code(
    body: web::Json<PhoneConfirmRequest>,
    service: web::Data<VerificationService>,
) -> ActixResult<impl Responder> {
    match service
        .confirm_code(
            &body.phone,
            &body.code,
            crate::services::verification_service::PURPOSE_SIGNUP,
        )
        .await
    {
        Ok(()) => Ok(success_response(MessageResponse {
            message: "Phone number verified".to_string(),
        })),
        Err(e) => Ok(error_from_placepin(&e)),
    }
}

/// 确认找回账号验证码，返回掩码邮箱
pub async fn confirm_account_code(
    body: web::Json<PhoneConfirmRequest>,
    service: web::Data<VerificationService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        service.confirm_account(&body.phone, &body.code).await,
    ))
}
