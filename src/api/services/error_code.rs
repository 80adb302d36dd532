//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::PlacepinError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 地点 / 评论错误
/// - 4000-4099: 用户 / 验证错误
/// - 5000-5099: 好友 / 举报错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    Conflict = 1009,
    RateLimitExceeded = 1029,

    // 认证错误 2000-2099
    AuthFailed = 2000,
    TokenExpired = 2001,
    TokenInvalid = 2002,
    AccountInactive = 2003,

    // 地点 / 评论错误 3000-3099
    PlaceNotFound = 3000,
    CommentNotFound = 3001,
    CommentDepthExceeded = 3002,
    ImageNotInPlace = 3003,

    // 用户 / 验证错误 4000-4099
    UserNotFound = 4000,
    EmailTaken = 4001,
    PhoneTaken = 4002,
    VerificationInvalid = 4003,
    VerificationExpired = 4004,
    SocialProviderError = 4005,

    // 好友 / 举报错误 5000-5099
    FriendRequestNotFound = 5000,
    FriendRequestConflict = 5001,
    ReportConflict = 5002,
}

impl From<PlacepinError> for ErrorCode {
    fn from(err: PlacepinError) -> Self {
        match err {
            PlacepinError::Validation(_) => ErrorCode::BadRequest,
            PlacepinError::Unauthorized(_) => ErrorCode::AuthFailed,
            PlacepinError::TokenInvalid(_) => ErrorCode::TokenInvalid,
            PlacepinError::Forbidden(_) => ErrorCode::Forbidden,
            PlacepinError::NotFound(_) => ErrorCode::NotFound,
            PlacepinError::Conflict(_) => ErrorCode::Conflict,
            PlacepinError::VerificationInvalid(_) => ErrorCode::VerificationInvalid,
            PlacepinError::SocialProvider(_) => ErrorCode::SocialProviderError,
            _ => ErrorCode::InternalServerError,
        }
    }
}
