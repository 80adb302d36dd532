//! 地点图片管理（员工）

use actix_web::{Responder, Result as ActixResult, web};
use tracing::info;

use crate::api::middleware::CurrentUser;
use crate::api::services::helpers::{api_result, created_response, error_from_placepin, success_response};
use crate::api::services::types::MessageResponse;
use crate::services::PlaceService;

use super::posts::staff_only;
use super::types::{PatchImage, PostImages};

/// 追加图片
pub async fn post_images(
    user: CurrentUser,
    path: web::Path<i64>,
    body: web::Json<PostImages>,
    service: web::Data<PlaceService>,
) -> ActixResult<impl Responder> {
    if let Some(resp) = staff_only(&user) {
        return Ok(resp);
    }

    let place_id = path.into_inner();
    info!(
        "Place API: add {} images to place {}",
        body.images.len(),
        place_id
    );

    match service.add_images(place_id, body.into_inner().images).await {
        Ok(images) => Ok(created_response(images)),
        Err(e) => Ok(error_from_placepin(&e)),
    }
}

/// 替换单张图片
pub async fn patch_image(
    user: CurrentUser,
    path: web::Path<(i64, i64)>,
    body: web::Json<PatchImage>,
    service: web::Data<PlaceService>,
) -> ActixResult<impl Responder> {
    if let Some(resp) = staff_only(&user) {
        return Ok(resp);
    }

    let (place_id, image_id) = path.into_inner();
    Ok(api_result(
        service
            .update_image(place_id, image_id, body.into_inner().image)
            .await,
    ))
}

/// 删除单张图片
pub async fn delete_image(
    user: CurrentUser,
    path: web::Path<(i64, i64)>,
    service: web::Data<PlaceService>,
) -> ActixResult<impl Responder> {
    if let Some(resp) = staff_only(&user) {
        return Ok(resp);
    }

    let (place_id, image_id) = path.into_inner();
    match service.delete_image(place_id, image_id).await {
        Ok(()) => Ok(success_response(MessageResponse {
            message: "Image deleted successfully".to_string(),
        })),
        Err(e) => Ok(error_from_placepin(&e)),
    }
}
