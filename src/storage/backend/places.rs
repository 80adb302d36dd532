//! 地点（place）相关的查询与变更

use std::collections::HashMap;

use chrono::Utc;
use migration::entities::{place, place_bookmark, place_image, place_like};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ExprTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::debug;

use crate::errors::{PlacepinError, Result};
use crate::storage::models::{NewPlace, PlaceChanges, PlaceCounts, PlaceOrdering};

use super::PlacepinStorage;

impl PlacepinStorage {
    /// 分页获取地点列表（id 倒序），返回 (models, total)
    pub async fn list_places(&self, page: u64, page_size: u64) -> Result<(Vec<place::Model>, u64)> {
        let paginator = place::Entity::find()
            .order_by_desc(place::Column::Id)
            .paginate(&self.db, page_size);

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((models, total))
    }

    pub async fn find_place(&self, place_id: i64) -> Result<Option<place::Model>> {
        Ok(place::Entity::find_by_id(place_id).one(&self.db).await?)
    }

    pub async fn insert_place(&self, user_id: i64, new_place: NewPlace) -> Result<place::Model> {
        let now = Utc::now();
        let model = place::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            title: Set(new_place.title),
            address: Set(new_place.address),
            category: Set(new_place.category),
            content: Set(new_place.content),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        debug!("Place inserted: id={}", model.id);
        Ok(model)
    }

    /// 部分更新地点，None 字段保持不变
    pub async fn update_place(&self, place_id: i64, changes: PlaceChanges) -> Result<place::Model> {
        let model = place::Entity::find_by_id(place_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| PlacepinError::not_found(format!("place {} not found", place_id)))?;

        let mut active: place::ActiveModel = model.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(address) = changes.address {
            active.address = Set(address);
        }
        if let Some(category) = changes.category {
            active.category = Set(category);
        }
        if let Some(content) = changes.content {
            active.content = Set(Some(content));
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&self.db).await?)
    }

    /// 删除地点及其关联行（评论、点赞、收藏、图片由外键级联处理）
    pub async fn delete_place(&self, place_id: i64) -> Result<()> {
        let result = place::Entity::delete_by_id(place_id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(PlacepinError::not_found(format!(
                "place {} not found",
                place_id
            )));
        }
        Ok(())
    }

    /// 批量加载多个地点的图片，按 place_id 分组
    pub async fn images_for_places(
        &self,
        place_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<place_image::Model>>> {
        if place_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let images = place_image::Entity::find()
            .filter(place_image::Column::PlaceId.is_in(place_ids.to_vec()))
            .order_by_asc(place_image::Column::Id)
            .all(&self.db)
            .await?;

        let mut grouped: HashMap<i64, Vec<place_image::Model>> = HashMap::new();
        for image in images {
            grouped.entry(image.place_id).or_default().push(image);
        }
        Ok(grouped)
    }

    /// 批量统计多个地点的评论 / 点赞 / 收藏数，避免逐条 N+1 查询
    pub async fn counts_for_places(&self, place_ids: &[i64]) -> Result<HashMap<i64, PlaceCounts>> {
        use migration::entities::place_comment;

        if place_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut counts: HashMap<i64, PlaceCounts> = HashMap::new();

        let comment_rows: Vec<(i64, i64)> = place_comment::Entity::find()
            .select_only()
            .column(place_comment::Column::PlaceId)
            .column_as(place_comment::Column::Id.count(), "cnt")
            .filter(place_comment::Column::PlaceId.is_in(place_ids.to_vec()))
            .group_by(place_comment::Column::PlaceId)
            .into_tuple()
            .all(&self.db)
            .await?;
        for (place_id, cnt) in comment_rows {
            counts.entry(place_id).or_default().comments = cnt as u64;
        }

        let like_rows: Vec<(i64, i64)> = place_like::Entity::find()
            .select_only()
            .column(place_like::Column::PlaceId)
            .column_as(place_like::Column::Id.count(), "cnt")
            .filter(place_like::Column::PlaceId.is_in(place_ids.to_vec()))
            .group_by(place_like::Column::PlaceId)
            .into_tuple()
            .all(&self.db)
            .await?;
        for (place_id, cnt) in like_rows {
            counts.entry(place_id).or_default().likes = cnt as u64;
        }

        let bookmark_rows: Vec<(i64, i64)> = place_bookmark::Entity::find()
            .select_only()
            .column(place_bookmark::Column::PlaceId)
            .column_as(place_bookmark::Column::Id.count(), "cnt")
            .filter(place_bookmark::Column::PlaceId.is_in(place_ids.to_vec()))
            .group_by(place_bookmark::Column::PlaceId)
            .into_tuple()
            .all(&self.db)
            .await?;
        for (place_id, cnt) in bookmark_rows {
            counts.entry(place_id).or_default().bookmarks = cnt as u64;
        }

        Ok(counts)
    }

    pub async fn insert_place_images(
        &self,
        place_id: i64,
        urls: Vec<String>,
    ) -> Result<Vec<place_image::Model>> {
        let now = Utc::now();
        let mut inserted = Vec::with_capacity(urls.len());
        for url in urls {
            let model = place_image::ActiveModel {
                id: NotSet,
                place_id: Set(place_id),
                image: Set(url),
                created_at: Set(now),
            }
            .insert(&self.db)
            .await?;
            inserted.push(model);
        }
        Ok(inserted)
    }

    pub async fn find_place_image(&self, image_id: i64) -> Result<Option<place_image::Model>> {
        Ok(place_image::Entity::find_by_id(image_id)
            .one(&self.db)
            .await?)
    }

    pub async fn update_place_image(
        &self,
        image_id: i64,
        url: String,
    ) -> Result<place_image::Model> {
        let model = place_image::Entity::find_by_id(image_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| PlacepinError::not_found(format!("image {} not found", image_id)))?;

        let mut active: place_image::ActiveModel = model.into();
        active.image = Set(url);
        Ok(active.update(&self.db).await?)
    }

    pub async fn delete_place_image(&self, image_id: i64) -> Result<()> {
        let result = place_image::Entity::delete_by_id(image_id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(PlacepinError::not_found(format!(
                "image {} not found",
                image_id
            )));
        }
        Ok(())
    }

    /// 点赞开关，返回 true 表示本次新增、false 表示取消
    pub async fn toggle_like(&self, place_id: i64, user_id: i64) -> Result<bool> {
        let existing = place_like::Entity::find()
            .filter(place_like::Column::PlaceId.eq(place_id))
            .filter(place_like::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;

        match existing {
            Some(model) => {
                place_like::Entity::delete_by_id(model.id)
                    .exec(&self.db)
                    .await?;
                Ok(false)
            }
            None => {
                place_like::ActiveModel {
                    id: NotSet,
                    place_id: Set(place_id),
                    user_id: Set(user_id),
                    created_at: Set(Utc::now()),
                }
                .insert(&self.db)
                .await?;
                Ok(true)
            }
        }
    }

    /// 收藏开关，返回 true 表示本次新增、false 表示取消
    pub async fn toggle_bookmark(&self, place_id: i64, user_id: i64) -> Result<bool> {
        let existing = place_bookmark::Entity::find()
            .filter(place_bookmark::Column::PlaceId.eq(place_id))
            .filter(place_bookmark::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;

        match existing {
            Some(model) => {
                place_bookmark::Entity::delete_by_id(model.id)
                    .exec(&self.db)
                    .await?;
                Ok(false)
            }
            None => {
                place_bookmark::ActiveModel {
                    id: NotSet,
                    place_id: Set(place_id),
                    user_id: Set(user_id),
                    created_at: Set(Utc::now()),
                }
                .insert(&self.db)
                .await?;
                Ok(true)
            }
        }
    }

    pub async fn has_liked(&self, place_id: i64, user_id: i64) -> Result<bool> {
        let count = place_like::Entity::find()
            .filter(place_like::Column::PlaceId.eq(place_id))
            .filter(place_like::Column::UserId.eq(user_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    pub async fn has_bookmarked(&self, place_id: i64, user_id: i64) -> Result<bool> {
        let count = place_bookmark::Entity::find()
            .filter(place_bookmark::Column::PlaceId.eq(place_id))
            .filter(place_bookmark::Column::UserId.eq(user_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// 某用户收藏的地点，按收藏时间倒序
    pub async fn bookmarked_places(&self, user_id: i64, limit: u64) -> Result<Vec<place::Model>> {
        let bookmarks = place_bookmark::Entity::find()
            .filter(place_bookmark::Column::UserId.eq(user_id))
            .order_by_desc(place_bookmark::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        let ids: Vec<i64> = bookmarks.iter().map(|b| b.place_id).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let places = place::Entity::find()
            .filter(place::Column::Id.is_in(ids.clone()))
            .all(&self.db)
            .await?;

        // 恢复收藏顺序
        let mut by_id: HashMap<i64, place::Model> = places.into_iter().map(|p| (p.id, p)).collect();
        Ok(ids.into_iter().filter_map(|id| by_id.remove(&id)).collect())
    }

    /// 按标题搜索并按聚合指标排序
    pub async fn search_places(
        &self,
        title_query: &str,
        ordering: PlaceOrdering,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<place::Model>, u64)> {
        use migration::entities::place_comment;

        let filter = place::Column::Title.contains(title_query);
        let total = place::Entity::find()
            .filter(filter.clone())
            .count(&self.db)
            .await?;

        let mut query = place::Entity::find().filter(filter);

        // 聚合排序走 LEFT JOIN + GROUP BY，避免无关联行的地点被丢掉
        query = match ordering {
            PlaceOrdering::CommentCount => query
                .left_join(place_comment::Entity)
                .group_by(place::Column::Id)
                .order_by_desc(
                    Expr::col((place_comment::Entity, place_comment::Column::Id)).count(),
                )
                .order_by_desc(place::Column::Id),
            PlaceOrdering::LikeCount => query
                .left_join(place_like::Entity)
                .group_by(place::Column::Id)
                .order_by_desc(Expr::col((place_like::Entity, place_like::Column::Id)).count())
                .order_by_desc(place::Column::Id),
            PlaceOrdering::BookmarkCount => query
                .left_join(place_bookmark::Entity)
                .group_by(place::Column::Id)
                .order_by_desc(
                    Expr::col((place_bookmark::Entity, place_bookmark::Column::Id)).count(),
                )
                .order_by_desc(place::Column::Id),
            PlaceOrdering::CreatedAtAsc => query.order_by_asc(place::Column::CreatedAt),
            PlaceOrdering::CreatedAtDesc => query.order_by_desc(place::Column::CreatedAt),
        };

        let models = query
            .limit(page_size)
            .offset(page.saturating_sub(1) * page_size)
            .all(&self.db)
            .await?;

        Ok((models, total))
    }

    /// 按分类关键字与地址片段过滤（地区三级回退的底层原语）
    pub async fn places_matching(
        &self,
        address_contains: &[&str],
        category_keyword: Option<&str>,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<place::Model>, u64)> {
        let mut condition = Condition::all();
        if let Some(keyword) = category_keyword {
            condition = condition.add(place::Column::Category.contains(keyword));
        }
        // 地址必须同时包含所有片段
        for fragment in address_contains {
            condition = condition.add(place::Column::Address.contains(*fragment));
        }

        let paginator = place::Entity::find()
            .filter(condition)
            .order_by_desc(place::Column::Id)
            .paginate(&self.db, page_size);

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((models, total))
    }
}
