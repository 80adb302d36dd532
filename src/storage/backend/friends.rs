//! 好友请求的查询与变更

use chrono::Utc;
use migration::entities::friend_request;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, NotSet, QueryFilter, QueryOrder, Set,
};

use crate::errors::{PlacepinError, Result};

use super::PlacepinStorage;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_ACCEPTED: &str = "accepted";
pub const STATUS_REJECTED: &str = "rejected";

impl PlacepinStorage {
    pub async fn insert_friend_request(
        &self,
        from_user_id: i64,
        to_user_id: i64,
    ) -> Result<friend_request::Model> {
        Ok(friend_request::ActiveModel {
            id: NotSet,
            from_user_id: Set(from_user_id),
            to_user_id: Set(to_user_id),
            status: Set(STATUS_PENDING.to_string()),
            created_at: Set(Utc::now()),
            responded_at: Set(None),
        }
        .insert(&self.db)
        .await?)
    }

    pub async fn find_friend_request(
        &self,
        request_id: i64,
    ) -> Result<Option<friend_request::Model>> {
        Ok(friend_request::Entity::find_by_id(request_id)
            .one(&self.db)
            .await?)
    }

    /// 两个用户之间的请求记录（方向不限）
    pub async fn find_request_between(
        &self,
        a: i64,
        b: i64,
    ) -> Result<Option<friend_request::Model>> {
        Ok(friend_request::Entity::find()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(friend_request::Column::FromUserId.eq(a))
                            .add(friend_request::Column::ToUserId.eq(b)),
                    )
                    .add(
                        Condition::all()
                            .add(friend_request::Column::FromUserId.eq(b))
                            .add(friend_request::Column::ToUserId.eq(a)),
                    ),
            )
            .order_by_desc(friend_request::Column::Id)
            .one(&self.db)
            .await?)
    }

    /// 发给某用户的待处理请求
    pub async fn pending_requests_to(&self, user_id: i64) -> Result<Vec<friend_request::Model>> {
        Ok(friend_request::Entity::find()
            .filter(friend_request::Column::ToUserId.eq(user_id))
            .filter(friend_request::Column::Status.eq(STATUS_PENDING))
            .order_by_desc(friend_request::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// 某用户参与的已接受请求
    pub async fn accepted_requests_of(&self, user_id: i64) -> Result<Vec<friend_request::Model>> {
        Ok(friend_request::Entity::find()
            .filter(
                Condition::any()
                    .add(friend_request::Column::FromUserId.eq(user_id))
                    .add(friend_request::Column::ToUserId.eq(user_id)),
            )
            .filter(friend_request::Column::Status.eq(STATUS_ACCEPTED))
            .order_by_desc(friend_request::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// 某用户的好友 id 列表（已接受请求的对端）
    pub async fn friend_ids_of(&self, user_id: i64) -> Result<Vec<i64>> {
        let requests = self.accepted_requests_of(user_id).await?;
        Ok(requests
            .into_iter()
            .map(|r| {
                if r.from_user_id == user_id {
                    r.to_user_id
                } else {
                    r.from_user_id
                }
            })
            .collect())
    }

    pub async fn set_friend_request_status(
        &self,
        request_id: i64,
        status: &str,
    ) -> Result<friend_request::Model> {
        let model = self
            .find_friend_request(request_id)
            .await?
            .ok_or_else(|| {
                PlacepinError::not_found(format!("friend request {} not found", request_id))
            })?;

        let mut active: friend_request::ActiveModel = model.into();
        active.status = Set(status.to_string());
        active.responded_at = Set(Some(Utc::now()));
        Ok(active.update(&self.db).await?)
    }

    pub async fn delete_friend_request(&self, request_id: i64) -> Result<()> {
        let result = friend_request::Entity::delete_by_id(request_id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(PlacepinError::not_found(format!(
                "friend request {} not found",
                request_id
            )));
        }
        Ok(())
    }
}
