//! Place comment service
//!
//! 评论只允许两层：顶层评论和对顶层评论的回复。

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use migration::entities::place_comment;
use serde::Serialize;
use tracing::info;

use crate::errors::{PlacepinError, Result};
use crate::storage::PlacepinStorage;

// ============ Response DTOs ============

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: i64,
    pub place_id: i64,
    pub user_id: i64,
    pub nickname: Option<String>,
    pub parent_id: Option<i64>,
    pub depth: i16,
    /// None 表示该评论已删除、仅作为回复的占位
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub replies: Vec<CommentView>,
}

impl CommentView {
    fn from_model(model: place_comment::Model, nickname: Option<String>) -> Self {
        Self {
            id: model.id,
            place_id: model.place_id,
            user_id: model.user_id,
            nickname,
            parent_id: model.parent_id,
            depth: model.depth,
            content: model.content,
            created_at: model.created_at,
            updated_at: model.updated_at,
            replies: Vec::new(),
        }
    }
}

// ============ CommentService Implementation ============

pub struct CommentService {
    storage: Arc<PlacepinStorage>,
}

impl CommentService {
    pub fn new(storage: Arc<PlacepinStorage>) -> Self {
        Self { storage }
    }

    async fn require_place(&self, place_id: i64) -> Result<()> {
        self.storage
            .find_place(place_id)
            .await?
            .ok_or_else(|| PlacepinError::not_found(format!("place {} not found", place_id)))?;
        Ok(())
    }

    /// 某地点的评论树：顶层评论按时间升序，回复挂在各自的顶层评论下
    pub async fn comments_for_place(&self, place_id: i64) -> Result<Vec<CommentView>> {
        self.require_place(place_id).await?;

        let models = self.storage.all_comments_for_place(place_id).await?;

        let user_ids: Vec<i64> = models.iter().map(|c| c.user_id).collect();
        let nicknames: HashMap<i64, String> = self
            .storage
            .find_users_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.nickname))
            .collect();

        let mut top_level: Vec<CommentView> = Vec::new();
        let mut index_of: HashMap<i64, usize> = HashMap::new();
        let mut replies: Vec<place_comment::Model> = Vec::new();

        for model in models {
            if model.parent_id.is_none() {
                index_of.insert(model.id, top_level.len());
                let nickname = nicknames.get(&model.user_id).cloned();
                top_level.push(CommentView::from_model(model, nickname));
            } else {
                replies.push(model);
            }
        }

        for model in replies {
            let Some(parent_id) = model.parent_id else {
                continue;
            };
            if let Some(&idx) = index_of.get(&parent_id) {
                let nickname = nicknames.get(&model.user_id).cloned();
                top_level[idx]
                    .replies
                    .push(CommentView::from_model(model, nickname));
            }
        }

        Ok(top_level)
    }

    /// 单条评论，附带其回复
    pub async fn comment_detail(&self, place_id: i64, comment_id: i64) -> Result<CommentView> {
        let model = self
            .storage
            .find_comment(comment_id)
            .await?
            .filter(|c| c.place_id == place_id)
            .ok_or_else(|| PlacepinError::not_found(format!("comment {} not found", comment_id)))?;

        let comments = self.comments_for_place(place_id).await?;
        if model.parent_id.is_none() {
            comments
                .into_iter()
                .find(|c| c.id == comment_id)
                .ok_or_else(|| {
                    PlacepinError::not_found(format!("comment {} not found", comment_id))
                })
        } else {
            comments
                .into_iter()
                .flat_map(|c| c.replies)
                .find(|c| c.id == comment_id)
                .ok_or_else(|| {
                    PlacepinError::not_found(format!("comment {} not found", comment_id))
                })
        }
    }

    /// 新建评论或回复
    ///
    /// 回复只能挂在顶层评论上；对回复再回复一律拒绝。
    pub async fn create_comment(
        &self,
        place_id: i64,
        user_id: i64,
        parent_id: Option<i64>,
        content: String,
    ) -> Result<CommentView> {
        if content.trim().is_empty() {
            return Err(PlacepinError::validation("content must not be empty"));
        }
        self.require_place(place_id).await?;

        let depth = match parent_id {
            None => 0,
            Some(parent_id) => {
                let parent = self.storage.find_comment(parent_id).await?.ok_or_else(|| {
                    PlacepinError::not_found(format!("comment {} not found", parent_id))
                })?;
                if parent.place_id != place_id {
                    return Err(PlacepinError::forbidden(
                        "parent comment belongs to another place",
                    ));
                }
                if parent.depth >= 1 {
                    return Err(PlacepinError::forbidden(
                        "replies to replies are not allowed",
                    ));
                }
                1
            }
        };

        let model = self
            .storage
            .insert_comment(place_id, user_id, parent_id, depth, content)
            .await?;

        info!(
            "CommentService: created comment {} on place {}",
            model.id, place_id
        );

        let nickname = self
            .storage
            .find_user_by_id(user_id)
            .await?
            .map(|u| u.nickname);
        Ok(CommentView::from_model(model, nickname))
    }

    /// 修改评论，仅作者本人
    pub async fn update_comment(
        &self,
        place_id: i64,
        comment_id: i64,
        user_id: i64,
        content: String,
    ) -> Result<CommentView> {
        if content.trim().is_empty() {
            return Err(PlacepinError::validation("content must not be empty"));
        }

        let model = self
            .storage
            .find_comment(comment_id)
            .await?
            .ok_or_else(|| PlacepinError::not_found(format!("comment {} not found", comment_id)))?;

        if model.place_id != place_id {
            return Err(PlacepinError::forbidden(
                "comment belongs to another place",
            ));
        }
        if model.user_id != user_id {
            return Err(PlacepinError::forbidden("only the author may edit"));
        }

        let updated = self.storage.update_comment(comment_id, content).await?;
        let nickname = self
            .storage
            .find_user_by_id(user_id)
            .await?
            .map(|u| u.nickname);
        Ok(CommentView::from_model(updated, nickname))
    }

    /// 删除评论，仅作者本人
    ///
    /// 有回复的评论不能物理删除，改为清空内容留作占位。
    pub async fn delete_comment(
        &self,
        place_id: i64,
        comment_id: i64,
        user_id: i64,
    ) -> Result<()> {
        let model = self
            .storage
            .find_comment(comment_id)
            .await?
            .ok_or_else(|| PlacepinError::not_found(format!("comment {} not found", comment_id)))?;

        if model.place_id != place_id {
            return Err(PlacepinError::forbidden(
                "comment belongs to another place",
            ));
        }
        if model.user_id != user_id {
            return Err(PlacepinError::forbidden("only the author may delete"));
        }

        if self.storage.has_replies(comment_id).await? {
            self.storage.tombstone_comment(comment_id).await?;
            info!("CommentService: tombstoned comment {}", comment_id);
        } else {
            self.storage.delete_comment(comment_id).await?;
            info!("CommentService: deleted comment {}", comment_id);
        }
        Ok(())
    }
}
