//! Place API 请求 / 响应类型

use serde::{Deserialize, Serialize};

use crate::services::comment_service::CommentView;
use crate::services::place_service::PlaceDetail;

#[derive(Debug, Deserialize)]
pub struct PostNewPlace {
    pub title: String,
    pub address: String,
    pub category: String,
    pub content: Option<String>,
    /// 图片 URL 列表，文件本身由外部存储服务承载
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct PatchPlace {
    pub title: Option<String>,
    pub address: Option<String>,
    pub category: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostImages {
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct PatchImage {
    pub image: String,
}

#[derive(Debug, Deserialize)]
pub struct PostComment {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// 标题关键字
    #[serde(default)]
    pub q: String,
    /// 排序：`-comment_count` / `-like` / `-bookmark` / `created_at` / `-created_at`
    pub ordering: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: String,
    pub page: Option<u64>,
}

/// 详情响应：地点视图 + 评论树
#[derive(Debug, Serialize)]
pub struct PlaceDetailResponse {
    #[serde(flatten)]
    pub detail: PlaceDetail,
    pub comments: Vec<CommentView>,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    /// true 表示本次新增，false 表示取消
    pub added: bool,
}
