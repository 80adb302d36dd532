//! User API 路由配置

use actix_web::web;

use crate::api::middleware::UserAuth;

use super::auth::{
    activate, change_password, deactivate, login, login_rate_limiter, me, password_reset,
    password_reset_email, patch_account, refresh_token, signup, verify_email,
};
use super::friends::{
    accept_friend_request, friend_list, friendship_status, pending_requests, recommend_users,
    reject_friend_request, remove_friend, report_user, send_friend_request,
};
use super::profile::{
    delete_album_image, get_profile, list_album, post_album_image, put_profile, put_region,
};
use super::social::social_login;
use super::verification::{
    confirm_account_code, confirm_signup_code, send_account_code, send_signup_code,
    sms_rate_limiter,
};

/// `/users` 路由
///
/// 注册、激活、登录、验证码和社交登录公开；
/// 其余接口要求 Bearer 认证。登录和短信发送带限流。
pub fn user_routes() -> actix_web::Scope {
    web::scope("/users")
        .route("", web::post().to(signup))
        .route("", web::get().to(me).wrap(UserAuth))
        .route("", web::patch().to(patch_account).wrap(UserAuth))
        .route("", web::delete().to(deactivate).wrap(UserAuth))
        .route("/activate", web::post().to(activate))
        .route("/verify-email/{uid}/{token}", web::get().to(verify_email))
        .route("/login", web::post().to(login).wrap(login_rate_limiter()))
        .route("/login/{provider}", web::post().to(social_login))
        .route("/token/refresh", web::post().to(refresh_token))
        .route(
            "/password/change",
            web::put().to(change_password).wrap(UserAuth),
        )
        .route("/password/email", web::post().to(password_reset_email))
        .route("/password/reset", web::post().to(password_reset))
        .route(
            "/phone/send/signup",
            web::post().to(send_signup_code).wrap(sms_rate_limiter()),
        )
        .route(
            "/phone/send/account",
            web::post().to(send_account_code).wrap(sms_rate_limiter()),
        )
        .route("/phone/confirm/signup", web::post().to(confirm_signup_code))
        .route(
            "/phone/confirm/account",
            web::post().to(confirm_account_code),
        )
        .route("/profile/{user_id}", web::get().to(get_profile))
        .route(
            "/profile/{user_id}",
            web::put().to(put_profile).wrap(UserAuth),
        )
        .route("/region", web::put().to(put_region).wrap(UserAuth))
        .route(
            "/recommend/{filter}",
            web::get().to(recommend_users).wrap(UserAuth),
        )
        // 固定路径必须排在 /friend/{user_id} 之前
        .route(
            "/friend/request-list",
            web::get().to(pending_requests).wrap(UserAuth),
        )
        .route("/friend/list", web::get().to(friend_list).wrap(UserAuth))
        .route(
            "/friend/{rid}/accept",
            web::post().to(accept_friend_request).wrap(UserAuth),
        )
        .route(
            "/friend/{rid}/reject",
            web::post().to(reject_friend_request).wrap(UserAuth),
        )
        .route(
            "/friend/{fid}/delete",
            web::delete().to(remove_friend).wrap(UserAuth),
        )
        .route(
            "/friend/{user_id}",
            web::post().to(send_friend_request).wrap(UserAuth),
        )
        .route(
            "/friend/{user_id}",
            web::get().to(friendship_status).wrap(UserAuth),
        )
        .route(
            "/report/{user_id}",
            web::post().to(report_user).wrap(UserAuth),
        )
        .route(
            "/{user_id}/image",
            web::get().to(list_album).wrap(UserAuth),
        )
        .route(
            "/{user_id}/image",
            web::post().to(post_album_image).wrap(UserAuth),
        )
        .route(
            "/{user_id}/image/{img}",
            web::delete().to(delete_album_image).wrap(UserAuth),
        )
}
