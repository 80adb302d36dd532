//! 地点 CRUD 与点赞 / 收藏

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use tracing::{info, trace};

use crate::api::constants::DEFAULT_PAGE_SIZE;
use crate::api::middleware::CurrentUser;
use crate::api::services::helpers::{
    api_result, created_response, error_from_placepin, error_response, paginated_response,
    success_response,
};
use crate::api::services::types::{MessageResponse, PageQuery};
use crate::api::services::ErrorCode;
use crate::services::{CommentService, PlaceService};
use crate::storage::{NewPlace, PlaceChanges};

use super::types::{PatchPlace, PlaceDetailResponse, PostNewPlace, ToggleResponse};

/// 员工专用操作的统一拦截
pub(super) fn staff_only(user: &CurrentUser) -> Option<HttpResponse> {
    if user.is_staff {
        None
    } else {
        Some(error_response(
            StatusCode::FORBIDDEN,
            ErrorCode::Forbidden,
            "staff only",
        ))
    }
}

/// 地点列表（分页，最新在前）
pub async fn list_places(
    query: web::Query<PageQuery>,
    service: web::Data<PlaceService>,
) -> ActixResult<impl Responder> {
    let (page, page_size) = query.resolve(DEFAULT_PAGE_SIZE);
    trace!("Place API: list request page={} size={}", page, page_size);

    match service.list_places(page, page_size).await {
        Ok((places, total)) => Ok(paginated_response(places, page, page_size, total)),
        Err(e) => Ok(error_from_placepin(&e)),
    }
}

/// 地点详情 + 评论树
pub async fn get_place(
    path: web::Path<i64>,
    service: web::Data<PlaceService>,
    comments: web::Data<CommentService>,
) -> ActixResult<impl Responder> {
    let place_id = path.into_inner();

    let detail = match service.place_detail(place_id, None).await {
        Ok(detail) => detail,
        Err(e) => return Ok(error_from_placepin(&e)),
    };
    match comments.comments_for_place(place_id).await {
        Ok(comments) => Ok(success_response(PlaceDetailResponse { detail, comments })),
        Err(e) => Ok(error_from_placepin(&e)),
    }
}

/// 新建地点（员工）
pub async fn post_place(
    user: CurrentUser,
    body: web::Json<PostNewPlace>,
    service: web::Data<PlaceService>,
) -> ActixResult<impl Responder> {
    if let Some(resp) = staff_only(&user) {
        return Ok(resp);
    }

    let body = body.into_inner();
    info!("Place API: create request - title: {}", body.title);

    let new_place = NewPlace {
        title: body.title,
        address: body.address,
        category: body.category,
        content: body.content,
    };

    match service.create_place(user.id, new_place, body.images).await {
        Ok(place) => Ok(created_response(place)),
        Err(e) => Ok(error_from_placepin(&e)),
    }
}

/// 部分更新地点（员工）
pub async fn patch_place(
    user: CurrentUser,
    path: web::Path<i64>,
    body: web::Json<PatchPlace>,
    service: web::Data<PlaceService>,
) -> ActixResult<impl Responder> {
    if let Some(resp) = staff_only(&user) {
        return Ok(resp);
    }

    let body = body.into_inner();
    let changes = PlaceChanges {
        title: body.title,
        address: body.address,
        category: body.category,
        content: body.content,
    };

    Ok(api_result(service.update_place(path.into_inner(), changes).await))
}

/// 删除地点（员工）
pub async fn delete_place(
    user: CurrentUser,
    path: web::Path<i64>,
    service: web::Data<PlaceService>,
) -> ActixResult<impl Responder> {
    if let Some(resp) = staff_only(&user) {
        return Ok(resp);
    }

    let place_id = path.into_inner();
    info!("Place API: delete request - place: {}", place_id);

    match service.delete_place(place_id).await {
        Ok(()) => Ok(success_response(MessageResponse {
            message: "Place deleted successfully".to_string(),
        })),
        Err(e) => Ok(error_from_placepin(&e)),
    }
}

/// 点赞开关
pub async fn toggle_like(
    user: CurrentUser,
    path: web::Path<i64>,
    service: web::Data<PlaceService>,
) -> ActixResult<impl Responder> {
    match service.toggle_like(path.into_inner(), user.id).await {
        Ok(added) => Ok(success_response(ToggleResponse { added })),
        Err(e) => Ok(error_from_placepin(&e)),
    }
}

/// 收藏开关
pub async fn toggle_bookmark(
    user: CurrentUser,
    path: web::Path<i64>,
    service: web::Data<PlaceService>,
) -> ActixResult<impl Responder> {
    match service.toggle_bookmark(path.into_inner(), user.id).await {
        Ok(added) => Ok(success_response(ToggleResponse { added })),
        Err(e) => Ok(error_from_placepin(&e)),
    }
}

/// 某用户最近收藏的地点（最多 4 条）
pub async fn bookmarked_places(
    path: web::Path<i64>,
    service: web::Data<PlaceService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(service.bookmarked_places(path.into_inner()).await))
}
