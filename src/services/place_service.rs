//! Place management service
//!
//! Provides unified business logic for place listings, shared between
//! HTTP handlers and tests.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use migration::entities::{place, place_image};
use serde::Serialize;
use tracing::info;

use crate::api::constants::{BOOKMARKED_PLACES_LIMIT, CATEGORY_PAGE_SIZE};
use crate::errors::{PlacepinError, Result};
use crate::storage::{NewPlace, PlaceChanges, PlaceOrdering, PlacepinStorage};

// ============ Response DTOs ============

#[derive(Debug, Clone, Serialize)]
pub struct PlaceImageDto {
    pub id: i64,
    pub image: String,
}

impl From<place_image::Model> for PlaceImageDto {
    fn from(model: place_image::Model) -> Self {
        Self {
            id: model.id,
            image: model.image,
        }
    }
}

/// 列表和详情共用的地点视图
#[derive(Debug, Clone, Serialize)]
pub struct PlaceView {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub address: String,
    pub category: String,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub images: Vec<PlaceImageDto>,
    pub comment_count: u64,
    pub like_count: u64,
    pub bookmark_count: u64,
}

/// 详情视图，附带访问者自己的点赞 / 收藏状态
#[derive(Debug, Clone, Serialize)]
pub struct PlaceDetail {
    #[serde(flatten)]
    pub place: PlaceView,
    pub liked: bool,
    pub bookmarked: bool,
}

// ============ PlaceService Implementation ============

/// Service for place listing operations
pub struct PlaceService {
    storage: Arc<PlacepinStorage>,
}

impl PlaceService {
    pub fn new(storage: Arc<PlacepinStorage>) -> Self {
        Self { storage }
    }

    /// 把裸模型装配成带图片和计数的视图
    async fn assemble_views(&self, models: Vec<place::Model>) -> Result<Vec<PlaceView>> {
        let ids: Vec<i64> = models.iter().map(|p| p.id).collect();
        let mut images = self.storage.images_for_places(&ids).await?;
        let counts = self.storage.counts_for_places(&ids).await?;

        Ok(models
            .into_iter()
            .map(|model| {
                let count = counts.get(&model.id).copied().unwrap_or_default();
                PlaceView {
                    images: images
                        .remove(&model.id)
                        .unwrap_or_default()
                        .into_iter()
                        .map(PlaceImageDto::from)
                        .collect(),
                    comment_count: count.comments,
                    like_count: count.likes,
                    bookmark_count: count.bookmarks,
                    id: model.id,
                    user_id: model.user_id,
                    title: model.title,
                    address: model.address,
                    category: model.category,
                    content: model.content,
                    created_at: model.created_at,
                    updated_at: model.updated_at,
                }
            })
            .collect())
    }

    /// 分页列表，最新在前
    pub async fn list_places(&self, page: u64, page_size: u64) -> Result<(Vec<PlaceView>, u64)> {
        let (models, total) = self.storage.list_places(page, page_size).await?;
        Ok((self.assemble_views(models).await?, total))
    }

    /// 单个地点详情；viewer 提供时附带其点赞 / 收藏状态
    pub async fn place_detail(&self, place_id: i64, viewer: Option<i64>) -> Result<PlaceDetail> {
        let model = self
            .storage
            .find_place(place_id)
            .await?
            .ok_or_else(|| PlacepinError::not_found(format!("place {} not found", place_id)))?;

        let mut views = self.assemble_views(vec![model]).await?;
        let place = views
            .pop()
            .ok_or_else(|| PlacepinError::not_found(format!("place {} not found", place_id)))?;

        let (liked, bookmarked) = match viewer {
            Some(user_id) => (
                self.storage.has_liked(place_id, user_id).await?,
                self.storage.has_bookmarked(place_id, user_id).await?,
            ),
            None => (false, false),
        };

        Ok(PlaceDetail {
            place,
            liked,
            bookmarked,
        })
    }

    pub async fn create_place(
        &self,
        user_id: i64,
        new_place: NewPlace,
        image_urls: Vec<String>,
    ) -> Result<PlaceView> {
        if new_place.title.trim().is_empty() {
            return Err(PlacepinError::validation("title must not be empty"));
        }
        if new_place.address.trim().is_empty() {
            return Err(PlacepinError::validation("address must not be empty"));
        }
        if new_place.category.trim().is_empty() {
            return Err(PlacepinError::validation("category must not be empty"));
        }

        let model = self.storage.insert_place(user_id, new_place).await?;
        if !image_urls.is_empty() {
            self.storage
                .insert_place_images(model.id, image_urls)
                .await?;
        }

        info!("PlaceService: created place {} ('{}')", model.id, model.title);

        let mut views = self.assemble_views(vec![model]).await?;
        views
            .pop()
            .ok_or_else(|| PlacepinError::database_operation("inserted place vanished"))
    }

    pub async fn update_place(&self, place_id: i64, changes: PlaceChanges) -> Result<PlaceView> {
        if let Some(ref title) = changes.title {
            if title.trim().is_empty() {
                return Err(PlacepinError::validation("title must not be empty"));
            }
        }

        let model = self.storage.update_place(place_id, changes).await?;
        info!("PlaceService: updated place {}", place_id);

        let mut views = self.assemble_views(vec![model]).await?;
        views
            .pop()
            .ok_or_else(|| PlacepinError::database_operation("updated place vanished"))
    }

    pub async fn delete_place(&self, place_id: i64) -> Result<()> {
        self.storage.delete_place(place_id).await?;
        info!("PlaceService: deleted place {}", place_id);
        Ok(())
    }

    // ============ Images ============

    pub async fn add_images(
        &self,
        place_id: i64,
        urls: Vec<String>,
    ) -> Result<Vec<PlaceImageDto>> {
        if urls.is_empty() {
            return Err(PlacepinError::validation("images must not be empty"));
        }
        self.storage
            .find_place(place_id)
            .await?
            .ok_or_else(|| PlacepinError::not_found(format!("place {} not found", place_id)))?;

        let inserted = self.storage.insert_place_images(place_id, urls).await?;
        Ok(inserted.into_iter().map(PlaceImageDto::from).collect())
    }

    /// 图片必须属于给定地点才允许改动
    async fn image_in_place(&self, place_id: i64, image_id: i64) -> Result<place_image::Model> {
        let image = self
            .storage
            .find_place_image(image_id)
            .await?
            .ok_or_else(|| PlacepinError::not_found(format!("image {} not found", image_id)))?;

        if image.place_id != place_id {
            return Err(PlacepinError::validation(format!(
                "image {} does not belong to place {}",
                image_id, place_id
            )));
        }
        Ok(image)
    }

    pub async fn update_image(
        &self,
        place_id: i64,
        image_id: i64,
        url: String,
    ) -> Result<PlaceImageDto> {
        if url.trim().is_empty() {
            return Err(PlacepinError::validation("image url must not be empty"));
        }
        self.image_in_place(place_id, image_id).await?;
        let model = self.storage.update_place_image(image_id, url).await?;
        Ok(PlaceImageDto::from(model))
    }

    pub async fn delete_image(&self, place_id: i64, image_id: i64) -> Result<()> {
        self.image_in_place(place_id, image_id).await?;
        self.storage.delete_place_image(image_id).await
    }

    // ============ Likes / Bookmarks ============

    /// 返回 true 表示本次新增
    pub async fn toggle_like(&self, place_id: i64, user_id: i64) -> Result<bool> {
        self.storage
            .find_place(place_id)
            .await?
            .ok_or_else(|| PlacepinError::not_found(format!("place {} not found", place_id)))?;
        self.storage.toggle_like(place_id, user_id).await
    }

    pub async fn toggle_bookmark(&self, place_id: i64, user_id: i64) -> Result<bool> {
        self.storage
            .find_place(place_id)
            .await?
            .ok_or_else(|| PlacepinError::not_found(format!("place {} not found", place_id)))?;
        self.storage.toggle_bookmark(place_id, user_id).await
    }

    /// 某用户最近收藏的地点
    pub async fn bookmarked_places(&self, user_id: i64) -> Result<Vec<PlaceView>> {
        let models = self
            .storage
            .bookmarked_places(user_id, BOOKMARKED_PLACES_LIMIT)
            .await?;
        self.assemble_views(models).await
    }

    // ============ Search / Category ============

    /// 标题搜索，支持按评论 / 点赞 / 收藏数排序
    pub async fn search(
        &self,
        query: &str,
        ordering: PlaceOrdering,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<PlaceView>, u64)> {
        let (models, total) = self
            .storage
            .search_places(query, ordering, page, page_size)
            .await?;
        Ok((self.assemble_views(models).await?, total))
    }

    /// 分类列表，按访问者的常用地区逐级回退过滤
    ///
    /// 地址需同时包含一二级地区；结果为空再退到只按一级地区过滤，
    /// 此时即使为空也直接返回。只有访问者缺少地区设置时才不做地区过滤。
    pub async fn category_places(
        &self,
        category: &str,
        viewer: Option<i64>,
        page: u64,
    ) -> Result<(Vec<PlaceView>, u64)> {
        let keyword = Some(category);

        let profile = match viewer {
            Some(user_id) => self.storage.profile_for_user(user_id).await?,
            None => None,
        };
        let region1 = profile.as_ref().and_then(|p| p.current_region1.as_deref());
        let region2 = profile.as_ref().and_then(|p| p.current_region2.as_deref());

        if let (Some(region1), Some(region2)) = (region1, region2) {
            let (models, total) = self
                .storage
                .places_matching(&[region1, region2], keyword, page, CATEGORY_PAGE_SIZE)
                .await?;
            if total > 0 {
                return Ok((self.assemble_views(models).await?, total));
            }

            let (models, total) = self
                .storage
                .places_matching(&[region1], keyword, page, CATEGORY_PAGE_SIZE)
                .await?;
            return Ok((self.assemble_views(models).await?, total));
        }

        let (models, total) = self
            .storage
            .places_matching(&[], keyword, page, CATEGORY_PAGE_SIZE)
            .await?;
        Ok((self.assemble_views(models).await?, total))
    }
}
