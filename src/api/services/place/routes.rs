//! Place API 路由配置

use actix_web::web;

use crate::api::middleware::UserAuth;

use super::comments::{
    delete_comment, get_comment, list_comments, post_comment, post_reply, put_comment,
};
use super::images::{delete_image, patch_image, post_images};
use super::posts::{
    bookmarked_places, delete_place, get_place, list_places, patch_place, post_place, toggle_bookmark,
    toggle_like,
};
use super::search::{category_places, search_places};

/// `/places` 路由
///
/// 读接口公开，写接口和分类浏览要求认证；
/// 地点与图片的增删改另有员工限制（handler 内校验）。
pub fn place_routes() -> actix_web::Scope {
    web::scope("/places")
        .route("", web::get().to(list_places))
        .route("", web::post().to(post_place).wrap(UserAuth))
        // 固定路径必须排在 /{id} 之前
        .route("/search", web::get().to(search_places))
        .route("/category", web::get().to(category_places).wrap(UserAuth))
        .route("/bookmarks/{user_id}", web::get().to(bookmarked_places))
        .route("/{id}/comments", web::get().to(list_comments))
        .route(
            "/{id}/comments",
            web::post().to(post_comment).wrap(UserAuth),
        )
        .route("/{id}/comments/{cid}", web::get().to(get_comment))
        .route(
            "/{id}/comments/{cid}",
            web::post().to(post_reply).wrap(UserAuth),
        )
        .route(
            "/{id}/comments/{cid}",
            web::put().to(put_comment).wrap(UserAuth),
        )
        .route(
            "/{id}/comments/{cid}",
            web::delete().to(delete_comment).wrap(UserAuth),
        )
        .route(
            "/{id}/images/{img}",
            web::patch().to(patch_image).wrap(UserAuth),
        )
        .route(
            "/{id}/images/{img}",
            web::delete().to(delete_image).wrap(UserAuth),
        )
        .route("/{id}/images", web::post().to(post_images).wrap(UserAuth))
        .route("/{id}/like", web::post().to(toggle_like).wrap(UserAuth))
        .route(
            "/{id}/bookmark",
            web::post().to(toggle_bookmark).wrap(UserAuth),
        )
        .route("/{id}", web::get().to(get_place))
        .route("/{id}", web::patch().to(patch_place).wrap(UserAuth))
        .route("/{id}", web::delete().to(delete_place).wrap(UserAuth))
}
