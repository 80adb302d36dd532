//! 存储层共用的数据结构

use serde::{Deserialize, Serialize};

/// 单个地点的聚合计数
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PlaceCounts {
    pub comments: u64,
    pub likes: u64,
    pub bookmarks: u64,
}

/// 搜索结果排序方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceOrdering {
    CommentCount,
    LikeCount,
    BookmarkCount,
    CreatedAtAsc,
    #[default]
    CreatedAtDesc,
}

impl PlaceOrdering {
    /// 解析查询参数（Django 风格：`-` 前缀表示降序）
    pub fn parse(s: &str) -> Self {
        match s {
            "comment_count" | "-comment_count" => Self::CommentCount,
            "like" | "-like" => Self::LikeCount,
            "bookmark" | "-bookmark" => Self::BookmarkCount,
            "created_at" => Self::CreatedAtAsc,
            _ => Self::CreatedAtDesc,
        }
    }
}

/// 新建地点的输入
#[derive(Debug, Clone)]
pub struct NewPlace {
    pub title: String,
    pub address: String,
    pub category: String,
    pub content: Option<String>,
}

/// 地点部分更新的输入，None 表示保持原值
#[derive(Debug, Clone, Default)]
pub struct PlaceChanges {
    pub title: Option<String>,
    pub address: Option<String>,
    pub category: Option<String>,
    pub content: Option<String>,
}

/// 资料部分更新的输入
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub introduce: Option<String>,
    pub photo: Option<String>,
}

/// 与某个用户的好友关系状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendshipStatus {
    /// 无任何请求记录
    None,
    /// 我发出的请求待处理
    PendingSent,
    /// 对方发来的请求待处理
    PendingReceived,
    /// 已是好友
    Friends,
    /// 请求被拒绝
    Rejected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_ordering_parse() {
        assert_eq!(PlaceOrdering::parse("comment_count"), PlaceOrdering::CommentCount);
        assert_eq!(PlaceOrdering::parse("-comment_count"), PlaceOrdering::CommentCount);
        assert_eq!(PlaceOrdering::parse("like"), PlaceOrdering::LikeCount);
        assert_eq!(PlaceOrdering::parse("bookmark"), PlaceOrdering::BookmarkCount);
        assert_eq!(PlaceOrdering::parse("created_at"), PlaceOrdering::CreatedAtAsc);
        assert_eq!(PlaceOrdering::parse("-created_at"), PlaceOrdering::CreatedAtDesc);
        assert_eq!(PlaceOrdering::parse("garbage"), PlaceOrdering::CreatedAtDesc);
    }
}
