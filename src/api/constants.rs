//! API 层常量

/// 列表 / 搜索的默认每页条数
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// 分类筛选的默认每页条数
pub const CATEGORY_PAGE_SIZE: u64 = 100;

/// 每页条数上限
pub const MAX_PAGE_SIZE: u64 = 100;

/// 收藏地点列表返回的条数上限
pub const BOOKMARKED_PLACES_LIMIT: u64 = 4;

/// 用户推荐返回的条数上限
pub const RECOMMEND_LIMIT: u64 = 10;

/// 手机验证码位数
pub const PHONE_CODE_LENGTH: usize = 6;
