//! 好友、推荐与举报

use actix_web::{Responder, Result as ActixResult, web};
use serde::Serialize;

use crate::api::middleware::CurrentUser;
use crate::api::services::helpers::{
    api_result, created_response, error_from_placepin, success_response,
};
use crate::api::services::types::MessageResponse;
use crate::services::FriendService;
use crate::services::friend_service::RecommendFilter;
use crate::storage::FriendshipStatus;

use super::types::ReportRequest;

#[derive(Debug, Serialize)]
struct FriendRequestCreated {
    request_id: i64,
}

#[derive(Debug, Serialize)]
struct FriendshipStatusResponse {
    status: FriendshipStatus,
}

/// 发送好友请求
pub async fn send_friend_request(
    user: CurrentUser,
    path: web::Path<i64>,
    service: web::Data<FriendService>,
) -> ActixResult<impl Responder> {
    match service.send_request(user.id, path.into_inner()).await {
        Ok(request_id) => Ok(created_response(FriendRequestCreated { request_id })),
        Err(e) => Ok(error_from_placepin(&e)),
    }
}

/// 与某用户的关系状态
pub async fn friendship_status(
    user: CurrentUser,
    path: web::Path<i64>,
    service: web::Data<FriendService>,
) -> ActixResult<impl Responder> {
    match service.friendship_status(user.id, path.into_inner()).await {
        Ok(status) => Ok(success_response(FriendshipStatusResponse { status })),
        Err(e) => Ok(error_from_placepin(&e)),
    }
}

/// 接受好友请求（仅接收方）
pub async fn accept_friend_request(
    user: CurrentUser,
    path: web::Path<i64>,
    service: web::Data<FriendService>,
) -> ActixResult<impl Responder> {
    match service.accept_request(path.into_inner(), user.id).await {
        Ok(()) => Ok(success_response(MessageResponse {
            message: "Friend request accepted".to_string(),
        })),
        Err(e) => Ok(error_from_placepin(&e)),
    }
}

/// 拒绝好友请求（仅接收方）
pub async fn reject_friend_request(
    user: CurrentUser,
    path: web::Path<i64>,
    service: web::Data<FriendService>,
) -> ActixResult<impl Responder> {
    match service.reject_request(path.into_inner(), user.id).await {
        Ok(()) => Ok(success_response(MessageResponse {
            message: "Friend request rejected".to_string(),
        })),
        Err(e) => Ok(error_from_placepin(&e)),
    }
}

/// 收到的待处理请求
pub async fn pending_requests(
    user: CurrentUser,
    service: web::Data<FriendService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(service.pending_requests(user.id).await))
}

/// 好友列表
pub async fn friend_list(
    user: CurrentUser,
    service: web::Data<FriendService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(service.friends_of(user.id).await))
}

/// 解除好友关系
pub async fn remove_friend(
    user: CurrentUser,
    path: web::Path<i64>,
    service: web::Data<FriendService>,
) -> ActixResult<impl Responder> {
    match service.remove_friend(user.id, path.into_inner()).await {
        Ok(()) => Ok(success_response(MessageResponse {
            message: "Friend removed".to_string(),
        })),
        Err(e) => Ok(error_from_placepin(&e)),
    }
}

/// 好友推荐（region | new）
pub async fn recommend_users(
    user: CurrentUser,
    path: web::Path<String>,
    service: web::Data<FriendService>,
) -> ActixResult<impl Responder> {
    let filter = match RecommendFilter::parse(&path.into_inner()) {
        Ok(filter) => filter,
        Err(e) => return Ok(error_from_placepin(&e)),
    };
    Ok(api_result(service.recommend(user.id, filter).await))
}

/// 举报用户
pub async fn report_user(
    user: CurrentUser,
    path: web::Path<i64>,
    body: web::Json<ReportRequest>,
    service: web::Data<FriendService>,
) -> ActixResult<impl Responder> {
    match service
        .report_user(user.id, path.into_inner(), &body.reason)
        .await
    {
        Ok(_) => Ok(created_response(MessageResponse {
            message: "Report submitted".to_string(),
        })),
        Err(e) => Ok(error_from_placepin(&e)),
    }
}
