//! 社交登录接口

use std::sync::Arc;

use actix_web::{Responder, Result as ActixResult, web};
use tracing::info;

use crate::api::services::helpers::{api_result, error_from_placepin};
use crate::services::UserService;
use crate::services::social_login::{SocialProvider, fetch_profile, login_with_profile};
use crate::storage::PlacepinStorage;

use super::types::SocialLoginRequest;

/// `POST /users/login/{provider}`
///
/// 客户端提交提供方 access token，服务端换取资料并签发本地令牌。
pub async fn social_login(
    path: web::Path<String>,
    body: web::Json<SocialLoginRequest>,
    storage: web::Data<Arc<PlacepinStorage>>,
    user_service: web::Data<UserService>,
) -> ActixResult<impl Responder> {
    let provider = match SocialProvider::parse(&path.into_inner()) {
        Ok(provider) => provider,
        Err(e) => return Ok(error_from_placepin(&e)),
    };
    info!("User API: social login via {}", provider.name());

    let profile = match fetch_profile(provider, body.into_inner().access_token).await {
        Ok(profile) => profile,
        Err(e) => return Ok(error_from_placepin(&e)),
    };

    Ok(api_result(
        login_with_profile(storage.get_ref(), &user_service, profile).await,
    ))
}
