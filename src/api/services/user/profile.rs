//! 资料、相册与常用地区

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, Result as ActixResult, web};

use crate::api::middleware::CurrentUser;
use crate::api::services::ErrorCode;
use crate::api::services::helpers::{
    api_result, created_response, error_from_placepin, error_response, success_response,
};
use crate::api::services::types::MessageResponse;
use crate::services::UserService;
use crate::storage::ProfileChanges;

use super::types::{AlbumPostRequest, ProfileUpdateRequest, RegionUpdateRequest};

fn owner_only(user: &CurrentUser, owner_id: i64) -> Option<HttpResponse> {
    if user.id == owner_id {
        None
    } else {
        Some(error_response(
            StatusCode::FORBIDDEN,
            ErrorCode::Forbidden,
            "only the owner may access this resource",
        ))
    }
}

/// 查看资料
pub async fn get_profile(
    path: web::Path<i64>,
    service: web::Data<UserService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(service.profile(path.into_inner()).await))
}

/// 更新资料（仅本人）
pub async fn put_profile(
    user: CurrentUser,
    path: web::Path<i64>,
    body: web::Json<ProfileUpdateRequest>,
    service: web::Data<UserService>,
) -> ActixResult<impl Responder> {
    let owner_id = path.into_inner();
    if let Some(resp) = owner_only(&user, owner_id) {
        return Ok(resp);
    }

    let body = body.into_inner();
    let changes = ProfileChanges {
        introduce: body.introduce,
        photo: body.photo,
    };
    Ok(api_result(service.update_profile(owner_id, changes).await))
}

/// 设置常用地区
pub async fn put_region(
    user: CurrentUser,
    body: web::Json<RegionUpdateRequest>,
    service: web::Data<UserService>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    Ok(api_result(
        service
            .set_region(user.id, &body.region1, body.region2.as_deref())
            .await,
    ))
}

/// 相册列表
pub async fn list_album(
    path: web::Path<i64>,
    service: web::Data<UserService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(service.album(path.into_inner()).await))
}

/// 添加相册照片（仅本人）
pub async fn post_album_image(
    user: CurrentUser,
    path: web::Path<i64>,
    body: web::Json<AlbumPostRequest>,
    service: web::Data<UserService>,
) -> ActixResult<impl Responder> {
    let owner_id = path.into_inner();
    if let Some(resp) = owner_only(&user, owner_id) {
        return Ok(resp);
    }

    match service.add_album_image(owner_id, &body.image).await {
        Ok(image) => Ok(created_response(image)),
        Err(e) => Ok(error_from_placepin(&e)),
    }
}

/// 删除相册照片（仅本人）
pub async fn delete_album_image(
    user: CurrentUser,
    path: web::Path<(i64, i64)>,
    service: web::Data<UserService>,
) -> ActixResult<impl Responder> {
    let (owner_id, image_id) = path.into_inner();
    if let Some(resp) = owner_only(&user, owner_id) {
        return Ok(resp);
    }

    match service.delete_album_image(owner_id, image_id).await {
        Ok(()) => Ok(success_response(MessageResponse {
            message: "Image deleted successfully".to_string(),
        })),
        Err(e) => Ok(error_from_placepin(&e)),
    }
}
