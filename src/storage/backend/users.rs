//! 用户账号的查询与变更

use chrono::Utc;
use migration::entities::{profile, user, user_report};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::debug;

use crate::errors::{PlacepinError, Result};

use super::PlacepinStorage;

impl PlacepinStorage {
    pub async fn find_user_by_id(&self, user_id: i64) -> Result<Option<user::Model>> {
        Ok(user::Entity::find_by_id(user_id).one(&self.db).await?)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<user::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?)
    }

    pub async fn find_users_by_ids(&self, ids: &[i64]) -> Result<Vec<user::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(user::Entity::find()
            .filter(user::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await?)
    }

    pub async fn find_user_by_phone(&self, phone: &str) -> Result<Option<user::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::Phone.eq(phone))
            .one(&self.db)
            .await?)
    }

    /// 新建账号。password 为 None 表示社交登录账号
    pub async fn insert_user(
        &self,
        email: &str,
        password_hash: Option<String>,
        nickname: &str,
        phone: Option<String>,
        is_active: bool,
    ) -> Result<user::Model> {
        let model = user::ActiveModel {
            id: NotSet,
            email: Set(email.to_string()),
            password: Set(password_hash),
            nickname: Set(nickname.to_string()),
            phone: Set(phone),
            is_active: Set(is_active),
            is_staff: Set(false),
            created_at: Set(Utc::now()),
            last_login: Set(None),
        }
        .insert(&self.db)
        .await?;

        debug!("User inserted: id={}", model.id);
        Ok(model)
    }

    pub async fn update_account(
        &self,
        user_id: i64,
        nickname: Option<String>,
        phone: Option<String>,
    ) -> Result<user::Model> {
        let model = self
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| PlacepinError::not_found(format!("user {} not found", user_id)))?;

        let mut active: user::ActiveModel = model.into();
        if let Some(nickname) = nickname {
            active.nickname = Set(nickname);
        }
        if let Some(phone) = phone {
            active.phone = Set(Some(phone));
        }
        Ok(active.update(&self.db).await?)
    }

    pub async fn set_password(&self, user_id: i64, password_hash: String) -> Result<()> {
        let model = self
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| PlacepinError::not_found(format!("user {} not found", user_id)))?;

        let mut active: user::ActiveModel = model.into();
        active.password = Set(Some(password_hash));
        active.update(&self.db).await?;
        Ok(())
    }

    pub async fn set_active(&self, user_id: i64, is_active: bool) -> Result<()> {
        let model = self
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| PlacepinError::not_found(format!("user {} not found", user_id)))?;

        let mut active: user::ActiveModel = model.into();
        active.is_active = Set(is_active);
        active.update(&self.db).await?;
        Ok(())
    }

    pub async fn set_staff(&self, user_id: i64, is_staff: bool) -> Result<()> {
        let model = self
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| PlacepinError::not_found(format!("user {} not found", user_id)))?;

        let mut active: user::ActiveModel = model.into();
        active.is_staff = Set(is_staff);
        active.update(&self.db).await?;
        Ok(())
    }

    pub async fn set_last_login(&self, user_id: i64) -> Result<()> {
        let model = self
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| PlacepinError::not_found(format!("user {} not found", user_id)))?;

        let mut active: user::ActiveModel = model.into();
        active.last_login = Set(Some(Utc::now()));
        active.update(&self.db).await?;
        Ok(())
    }

    /// 最近注册的活跃用户，排除给定 id 集合
    pub async fn newest_users(&self, exclude: &[i64], limit: u64) -> Result<Vec<user::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::IsActive.eq(true))
            .filter(user::Column::Id.is_not_in(exclude.to_vec()))
            .order_by_desc(user::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?)
    }

    /// 与给定一级地区相同的活跃用户，排除给定 id 集合
    pub async fn users_by_region(
        &self,
        region1: &str,
        exclude: &[i64],
        limit: u64,
    ) -> Result<Vec<user::Model>> {
        Ok(user::Entity::find()
            .inner_join(profile::Entity)
            .filter(profile::Column::CurrentRegion1.eq(region1))
            .filter(user::Column::IsActive.eq(true))
            .filter(user::Column::Id.is_not_in(exclude.to_vec()))
            .order_by_desc(user::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?)
    }

    pub async fn insert_report(
        &self,
        reporter_id: i64,
        reported_id: i64,
        reason: &str,
    ) -> Result<user_report::Model> {
        Ok(user_report::ActiveModel {
            id: NotSet,
            reporter_id: Set(reporter_id),
            reported_id: Set(reported_id),
            reason: Set(reason.to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?)
    }

    pub async fn find_report(
        &self,
        reporter_id: i64,
        reported_id: i64,
    ) -> Result<Option<user_report::Model>> {
        Ok(user_report::Entity::find()
            .filter(user_report::Column::ReporterId.eq(reporter_id))
            .filter(user_report::Column::ReportedId.eq(reported_id))
            .one(&self.db)
            .await?)
    }
}
