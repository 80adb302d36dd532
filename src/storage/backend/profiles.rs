//! 用户资料与照片相册

use chrono::Utc;
use migration::entities::{profile, profile_image};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, Set,
};

use crate::errors::{PlacepinError, Result};
use crate::storage::models::ProfileChanges;

use super::PlacepinStorage;

impl PlacepinStorage {
    pub async fn profile_for_user(&self, user_id: i64) -> Result<Option<profile::Model>> {
        Ok(profile::Entity::find()
            .filter(profile::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?)
    }

    /// 获取资料，不存在时创建空资料
    pub async fn ensure_profile(&self, user_id: i64) -> Result<profile::Model> {
        if let Some(existing) = self.profile_for_user(user_id).await? {
            return Ok(existing);
        }

        Ok(profile::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            introduce: Set(None),
            photo: Set(None),
            current_region1: Set(None),
            current_region2: Set(None),
        }
        .insert(&self.db)
        .await?)
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        changes: ProfileChanges,
    ) -> Result<profile::Model> {
        let model = self.ensure_profile(user_id).await?;

        let mut active: profile::ActiveModel = model.into();
        if let Some(introduce) = changes.introduce {
            active.introduce = Set(Some(introduce));
        }
        if let Some(photo) = changes.photo {
            active.photo = Set(Some(photo));
        }
        Ok(active.update(&self.db).await?)
    }

    pub async fn set_region(
        &self,
        user_id: i64,
        region1: &str,
        region2: Option<&str>,
    ) -> Result<profile::Model> {
        let model = self.ensure_profile(user_id).await?;

        let mut active: profile::ActiveModel = model.into();
        active.current_region1 = Set(Some(region1.to_string()));
        active.current_region2 = Set(region2.map(|s| s.to_string()));
        Ok(active.update(&self.db).await?)
    }

    pub async fn album_images(&self, user_id: i64) -> Result<Vec<profile_image::Model>> {
        Ok(profile_image::Entity::find()
            .filter(profile_image::Column::UserId.eq(user_id))
            .order_by_desc(profile_image::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn insert_album_image(
        &self,
        user_id: i64,
        url: &str,
    ) -> Result<profile_image::Model> {
        Ok(profile_image::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            image: Set(url.to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?)
    }

    pub async fn find_album_image(&self, image_id: i64) -> Result<Option<profile_image::Model>> {
        Ok(profile_image::Entity::find_by_id(image_id)
            .one(&self.db)
            .await?)
    }

    pub async fn delete_album_image(&self, image_id: i64) -> Result<()> {
        let result = profile_image::Entity::delete_by_id(image_id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(PlacepinError::not_found(format!(
                "album image {} not found",
                image_id
            )));
        }
        Ok(())
    }
}
