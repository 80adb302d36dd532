//! 地点评论的查询与变更

use chrono::Utc;
use migration::entities::place_comment;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::errors::{PlacepinError, Result};

use super::PlacepinStorage;

impl PlacepinStorage {
    /// 某地点的顶层评论（parent_id IS NULL），id 升序
    pub async fn top_level_comments(&self, place_id: i64) -> Result<Vec<place_comment::Model>> {
        Ok(place_comment::Entity::find()
            .filter(place_comment::Column::PlaceId.eq(place_id))
            .filter(place_comment::Column::ParentId.is_null())
            .order_by_asc(place_comment::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// 某地点的全部评论（含回复），id 升序
    pub async fn all_comments_for_place(&self, place_id: i64) -> Result<Vec<place_comment::Model>> {
        Ok(place_comment::Entity::find()
            .filter(place_comment::Column::PlaceId.eq(place_id))
            .order_by_asc(place_comment::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn find_comment(&self, comment_id: i64) -> Result<Option<place_comment::Model>> {
        Ok(place_comment::Entity::find_by_id(comment_id)
            .one(&self.db)
            .await?)
    }

    pub async fn insert_comment(
        &self,
        place_id: i64,
        user_id: i64,
        parent_id: Option<i64>,
        depth: i16,
        content: String,
    ) -> Result<place_comment::Model> {
        let now = Utc::now();
        Ok(place_comment::ActiveModel {
            id: NotSet,
            place_id: Set(place_id),
            user_id: Set(user_id),
            parent_id: Set(parent_id),
            depth: Set(depth),
            content: Set(Some(content)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?)
    }

    pub async fn update_comment(
        &self,
        comment_id: i64,
        content: String,
    ) -> Result<place_comment::Model> {
        let model = place_comment::Entity::find_by_id(comment_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| PlacepinError::not_found(format!("comment {} not found", comment_id)))?;

        let mut active: place_comment::ActiveModel = model.into();
        active.content = Set(Some(content));
        active.updated_at = Set(Utc::now());
        Ok(active.update(&self.db).await?)
    }

    pub async fn has_replies(&self, comment_id: i64) -> Result<bool> {
        let count = place_comment::Entity::find()
            .filter(place_comment::Column::ParentId.eq(comment_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// 占位删除：内容置空，保留行以维持回复树
    pub async fn tombstone_comment(&self, comment_id: i64) -> Result<()> {
        let model = place_comment::Entity::find_by_id(comment_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| PlacepinError::not_found(format!("comment {} not found", comment_id)))?;

        let mut active: place_comment::ActiveModel = model.into();
        active.content = Set(None);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }

    pub async fn delete_comment(&self, comment_id: i64) -> Result<()> {
        let result = place_comment::Entity::delete_by_id(comment_id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(PlacepinError::not_found(format!(
                "comment {} not found",
                comment_id
            )));
        }
        Ok(())
    }
}
