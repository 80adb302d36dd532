//! Friend request and recommendation service

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::api::constants::RECOMMEND_LIMIT;
use crate::errors::{PlacepinError, Result};
use crate::storage::backend::{STATUS_ACCEPTED, STATUS_PENDING, STATUS_REJECTED};
use crate::storage::{FriendshipStatus, PlacepinStorage};

// ============ Response DTOs ============

/// 好友列表 / 推荐列表里的用户摘要
#[derive(Debug, Clone, Serialize)]
pub struct FriendView {
    pub id: i64,
    pub nickname: String,
    pub introduce: Option<String>,
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FriendRequestView {
    pub id: i64,
    pub from_user_id: i64,
    pub from_nickname: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 推荐模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendFilter {
    /// 同一级地区的活跃用户
    Region,
    /// 最新注册的活跃用户
    New,
}

impl RecommendFilter {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "region" => Ok(Self::Region),
            "new" => Ok(Self::New),
            other => Err(PlacepinError::validation(format!(
                "unknown recommend filter: {}",
                other
            ))),
        }
    }
}

// ============ FriendService Implementation ============

pub struct FriendService {
    storage: Arc<PlacepinStorage>,
}

impl FriendService {
    pub fn new(storage: Arc<PlacepinStorage>) -> Self {
        Self { storage }
    }

    async fn friend_views(&self, ids: &[i64]) -> Result<Vec<FriendView>> {
        let users = self.storage.find_users_by_ids(ids).await?;
        let mut views = Vec::with_capacity(users.len());
        for user in users {
            let profile = self.storage.profile_for_user(user.id).await?;
            views.push(FriendView {
                id: user.id,
                nickname: user.nickname,
                introduce: profile.as_ref().and_then(|p| p.introduce.clone()),
                photo: profile.and_then(|p| p.photo),
            });
        }
        Ok(views)
    }

    /// 发送好友请求
    pub async fn send_request(&self, from_user_id: i64, to_user_id: i64) -> Result<i64> {
        if from_user_id == to_user_id {
            return Err(PlacepinError::validation(
                "cannot send a friend request to yourself",
            ));
        }

        let target = self
            .storage
            .find_user_by_id(to_user_id)
            .await?
            .ok_or_else(|| PlacepinError::not_found(format!("user {} not found", to_user_id)))?;
        if !target.is_active {
            return Err(PlacepinError::not_found(format!(
                "user {} not found",
                to_user_id
            )));
        }

        if let Some(existing) = self
            .storage
            .find_request_between(from_user_id, to_user_id)
            .await?
        {
            match existing.status.as_str() {
                STATUS_PENDING => {
                    return Err(PlacepinError::conflict("a request is already pending"));
                }
                STATUS_ACCEPTED => {
                    return Err(PlacepinError::conflict("already friends"));
                }
                // 被拒绝的请求允许重新发起
                _ => self.storage.delete_friend_request(existing.id).await?,
            }
        }

        let model = self
            .storage
            .insert_friend_request(from_user_id, to_user_id)
            .await?;
        info!(
            "FriendService: user {} sent request {} to user {}",
            from_user_id, model.id, to_user_id
        );
        Ok(model.id)
    }

    /// 接受请求，仅接收方
    pub async fn accept_request(&self, request_id: i64, user_id: i64) -> Result<()> {
        self.respond(request_id, user_id, STATUS_ACCEPTED).await
    }

    /// 拒绝请求，仅接收方
    pub async fn reject_request(&self, request_id: i64, user_id: i64) -> Result<()> {
        self.respond(request_id, user_id, STATUS_REJECTED).await
    }

    async fn respond(&self, request_id: i64, user_id: i64, status: &str) -> Result<()> {
        let request = self
            .storage
            .find_friend_request(request_id)
            .await?
            .ok_or_else(|| {
                PlacepinError::not_found(format!("friend request {} not found", request_id))
            })?;

        if request.to_user_id != user_id {
            return Err(PlacepinError::forbidden(
                "only the recipient may respond to a request",
            ));
        }
        if request.status != STATUS_PENDING {
            return Err(PlacepinError::conflict("request was already handled"));
        }

        self.storage
            .set_friend_request_status(request_id, status)
            .await?;
        info!(
            "FriendService: request {} marked {} by user {}",
            request_id, status, user_id
        );
        Ok(())
    }

    /// 收到的待处理请求
    pub async fn pending_requests(&self, user_id: i64) -> Result<Vec<FriendRequestView>> {
        let requests = self.storage.pending_requests_to(user_id).await?;
        let sender_ids: Vec<i64> = requests.iter().map(|r| r.from_user_id).collect();
        let senders = self.storage.find_users_by_ids(&sender_ids).await?;

        Ok(requests
            .into_iter()
            .map(|r| FriendRequestView {
                from_nickname: senders
                    .iter()
                    .find(|u| u.id == r.from_user_id)
                    .map(|u| u.nickname.clone()),
                id: r.id,
                from_user_id: r.from_user_id,
                created_at: r.created_at,
            })
            .collect())
    }

    /// 好友列表
    pub async fn friends_of(&self, user_id: i64) -> Result<Vec<FriendView>> {
        let ids = self.storage.friend_ids_of(user_id).await?;
        self.friend_views(&ids).await
    }

    /// 与某个用户的关系状态
    pub async fn friendship_status(&self, user_id: i64, other_id: i64) -> Result<FriendshipStatus> {
        if user_id == other_id {
            return Ok(FriendshipStatus::None);
        }

        let Some(request) = self.storage.find_request_between(user_id, other_id).await? else {
            return Ok(FriendshipStatus::None);
        };

        Ok(match request.status.as_str() {
            STATUS_ACCEPTED => FriendshipStatus::Friends,
            STATUS_PENDING if request.from_user_id == user_id => FriendshipStatus::PendingSent,
            STATUS_PENDING => FriendshipStatus::PendingReceived,
            _ => FriendshipStatus::Rejected,
        })
    }

    /// 删除好友（双向解除）
    pub async fn remove_friend(&self, user_id: i64, friend_id: i64) -> Result<()> {
        let request = self
            .storage
            .find_request_between(user_id, friend_id)
            .await?
            .filter(|r| r.status == STATUS_ACCEPTED)
            .ok_or_else(|| PlacepinError::not_found("not friends with this user"))?;

        self.storage.delete_friend_request(request.id).await?;
        info!(
            "FriendService: user {} removed friend {}",
            user_id, friend_id
        );
        Ok(())
    }

    /// 好友推荐，自己和已有好友始终排除在外
    ///
    /// `Region` 模式按请求者资料里的一级地区匹配；
    /// 没有设置地区时退化为 `New` 模式。
    pub async fn recommend(
        &self,
        user_id: i64,
        filter: RecommendFilter,
    ) -> Result<Vec<FriendView>> {
        let mut exclude = self.storage.friend_ids_of(user_id).await?;
        exclude.push(user_id);

        let candidates = match filter {
            RecommendFilter::Region => {
                let profile = self.storage.profile_for_user(user_id).await?;
                match profile.and_then(|p| p.current_region1) {
                    Some(region1) => {
                        self.storage
                            .users_by_region(&region1, &exclude, RECOMMEND_LIMIT)
                            .await?
                    }
                    None => self.storage.newest_users(&exclude, RECOMMEND_LIMIT).await?,
                }
            }
            RecommendFilter::New => self.storage.newest_users(&exclude, RECOMMEND_LIMIT).await?,
        };

        let ids: Vec<i64> = candidates.iter().map(|u| u.id).collect();
        self.friend_views(&ids).await
    }

    /// 举报用户；同一对举报人 / 被举报人只记一次
    pub async fn report_user(
        &self,
        reporter_id: i64,
        reported_id: i64,
        reason: &str,
    ) -> Result<i64> {
        if reporter_id == reported_id {
            return Err(PlacepinError::validation("cannot report yourself"));
        }
        if reason.trim().is_empty() {
            return Err(PlacepinError::validation("reason must not be empty"));
        }

        self.storage
            .find_user_by_id(reported_id)
            .await?
            .ok_or_else(|| PlacepinError::not_found(format!("user {} not found", reported_id)))?;

        if self
            .storage
            .find_report(reporter_id, reported_id)
            .await?
            .is_some()
        {
            return Err(PlacepinError::conflict("already reported this user"));
        }

        let model = self
            .storage
            .insert_report(reporter_id, reported_id, reason)
            .await?;
        info!(
            "FriendService: user {} reported user {}",
            reporter_id, reported_id
        );
        Ok(model.id)
    }
}
