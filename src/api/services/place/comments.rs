//! 地点评论

use actix_web::{Responder, Result as ActixResult, web};
use tracing::trace;

use crate::api::middleware::CurrentUser;
use crate::api::services::helpers::{
    api_result, created_response, error_from_placepin, success_response,
};
use crate::api::services::types::MessageResponse;
use crate::services::CommentService;

use super::types::PostComment;

/// 评论树（顶层评论带回复）
pub async fn list_comments(
    path: web::Path<i64>,
    service: web::Data<CommentService>,
) -> ActixResult<impl Responder> {
    let place_id = path.into_inner();
    trace!("Place API: list comments for place {}", place_id);
    Ok(api_result(service.comments_for_place(place_id).await))
}

/// 单条评论
pub async fn get_comment(
    path: web::Path<(i64, i64)>,
    service: web::Data<CommentService>,
) -> ActixResult<impl Responder> {
    let (place_id, comment_id) = path.into_inner();
    Ok(api_result(service.comment_detail(place_id, comment_id).await))
}

/// 新建顶层评论
pub async fn post_comment(
    user: CurrentUser,
    path: web::Path<i64>,
    body: web::Json<PostComment>,
    service: web::Data<CommentService>,
) -> ActixResult<impl Responder> {
    match service
        .create_comment(path.into_inner(), user.id, None, body.into_inner().content)
        .await
    {
        Ok(comment) => Ok(created_response(comment)),
        Err(e) => Ok(error_from_placepin(&e)),
    }
}

/// 回复顶层评论；对回复再回复被拒绝
pub async fn post_reply(
    user: CurrentUser,
    path: web::Path<(i64, i64)>,
    body: web::Json<PostComment>,
    service: web::Data<CommentService>,
) -> ActixResult<impl Responder> {
    let (place_id, parent_id) = path.into_inner();
    match service
        .create_comment(place_id, user.id, Some(parent_id), body.into_inner().content)
        .await
    {
        Ok(comment) => Ok(created_response(comment)),
        Err(e) => Ok(error_from_placepin(&e)),
    }
}

/// 修改评论（仅作者）
pub async fn put_comment(
    user: CurrentUser,
    path: web::Path<(i64, i64)>,
    body: web::Json<PostComment>,
    service: web::Data<CommentService>,
) -> ActixResult<impl Responder> {
    let (place_id, comment_id) = path.into_inner();
    Ok(api_result(
        service
            .update_comment(place_id, comment_id, user.id, body.into_inner().content)
            .await,
    ))
}

/// 删除评论（仅作者；有回复时软删除）
pub async fn delete_comment(
    user: CurrentUser,
    path: web::Path<(i64, i64)>,
    service: web::Data<CommentService>,
) -> ActixResult<impl Responder> {
    let (place_id, comment_id) = path.into_inner();
    match service.delete_comment(place_id, comment_id, user.id).await {
        Ok(()) => Ok(success_response(MessageResponse {
            message: "Comment deleted successfully".to_string(),
        })),
        Err(e) => Ok(error_from_placepin(&e)),
    }
}
