//! 搜索与分类浏览

use actix_web::{Responder, Result as ActixResult, web};
use tracing::trace;

use crate::api::constants::{CATEGORY_PAGE_SIZE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::api::middleware::CurrentUser;
use crate::api::services::helpers::{error_from_placepin, paginated_response};
use crate::services::PlaceService;
use crate::storage::PlaceOrdering;

use super::types::{CategoryQuery, SearchQuery};

/// 标题搜索，支持按聚合计数排序
pub async fn search_places(
    query: web::Query<SearchQuery>,
    service: web::Data<PlaceService>,
) -> ActixResult<impl Responder> {
    let ordering = query
        .ordering
        .as_deref()
        .map(PlaceOrdering::parse)
        .unwrap_or_default();
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    trace!(
        "Place API: search '{}' ordering={:?} page={}",
        query.q, ordering, page
    );

    match service.search(&query.q, ordering, page, page_size).await {
        Ok((places, total)) => Ok(paginated_response(places, page, page_size, total)),
        Err(e) => Ok(error_from_placepin(&e)),
    }
}

/// 分类浏览，按请求者的常用地区逐级回退
pub async fn category_places(
    user: CurrentUser,
    query: web::Query<CategoryQuery>,
    service: web::Data<PlaceService>,
) -> ActixResult<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);

    match service
        .category_places(&query.category, Some(user.id), page)
        .await
    {
        Ok((places, total)) => Ok(paginated_response(places, page, CATEGORY_PAGE_SIZE, total)),
        Err(e) => Ok(error_from_placepin(&e)),
    }
}
