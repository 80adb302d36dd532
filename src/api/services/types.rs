//! API 共用类型定义

use serde::{Deserialize, Serialize};

/// 统一 JSON 响应信封
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// 分页响应
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PaginatedResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: T,
    pub pagination: PaginationInfo,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PaginationInfo {
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub total_pages: u64,
}

/// 分页查询参数
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl PageQuery {
    /// 解析 page/page_size，default_size 由各端点指定
    pub fn resolve(&self, default_size: u64) -> (u64, u64) {
        let page = self.page.unwrap_or(1).max(1);
        let page_size = self
            .page_size
            .unwrap_or(default_size)
            .clamp(1, crate::api::constants::MAX_PAGE_SIZE);
        (page, page_size)
    }
}

/// 通用消息响应
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_defaults() {
        let q = PageQuery::default();
        assert_eq!(q.resolve(20), (1, 20));
        assert_eq!(q.resolve(100), (1, 100));
    }

    #[test]
    fn test_page_query_clamps_page_size() {
        let q = PageQuery {
            page: Some(0),
            page_size: Some(5000),
        };
        assert_eq!(q.resolve(20), (1, 100));
    }
}
