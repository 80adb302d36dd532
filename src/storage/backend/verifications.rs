//! 手机验证码的存取

use chrono::{DateTime, Utc};
use migration::entities::phone_verification;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, Set,
};

use crate::errors::Result;

use super::PlacepinStorage;

impl PlacepinStorage {
    pub async fn insert_verification_code(
        &self,
        phone: &str,
        code: &str,
        purpose: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<phone_verification::Model> {
        Ok(phone_verification::ActiveModel {
            id: NotSet,
            phone: Set(phone.to_string()),
            code: Set(code.to_string()),
            purpose: Set(purpose.to_string()),
            verified: Set(false),
            expires_at: Set(expires_at),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?)
    }

    /// 最近一条未确认的验证码
    pub async fn latest_unverified_code(
        &self,
        phone: &str,
        purpose: &str,
    ) -> Result<Option<phone_verification::Model>> {
        Ok(phone_verification::Entity::find()
            .filter(phone_verification::Column::Phone.eq(phone))
            .filter(phone_verification::Column::Purpose.eq(purpose))
            .filter(phone_verification::Column::Verified.eq(false))
            .order_by_desc(phone_verification::Column::Id)
            .one(&self.db)
            .await?)
    }

    pub async fn mark_code_verified(&self, verification_id: i64) -> Result<()> {
        if let Some(model) = phone_verification::Entity::find_by_id(verification_id)
            .one(&self.db)
            .await?
        {
            let mut active: phone_verification::ActiveModel = model.into();
            active.verified = Set(true);
            active.update(&self.db).await?;
        }
        Ok(())
    }

    /// 是否存在已确认且未过期的验证码
    pub async fn has_verified_code(&self, phone: &str, purpose: &str) -> Result<bool> {
        let model = phone_verification::Entity::find()
            .filter(phone_verification::Column::Phone.eq(phone))
            .filter(phone_verification::Column::Purpose.eq(purpose))
            .filter(phone_verification::Column::Verified.eq(true))
            .order_by_desc(phone_verification::Column::Id)
            .one(&self.db)
            .await?;

        Ok(model.is_some_and(|m| m.expires_at > Utc::now()))
    }

    /// 消费已确认的验证码（注册完成后删除，防止复用）
    pub async fn consume_verified_codes(&self, phone: &str, purpose: &str) -> Result<()> {
        phone_verification::Entity::delete_many()
            .filter(phone_verification::Column::Phone.eq(phone))
            .filter(phone_verification::Column::Purpose.eq(purpose))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
