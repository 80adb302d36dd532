use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum PlacepinError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Validation(String),
    NotFound(String),
    Forbidden(String),
    Unauthorized(String),
    Conflict(String),
    Serialization(String),
    PasswordHash(String),
    TokenInvalid(String),
    VerificationInvalid(String),
    SocialProvider(String),
    NotifyDelivery(String),
}

impl PlacepinError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            PlacepinError::DatabaseConfig(_) => "E001",
            PlacepinError::DatabaseConnection(_) => "E002",
            PlacepinError::DatabaseOperation(_) => "E003",
            PlacepinError::Validation(_) => "E004",
            PlacepinError::NotFound(_) => "E005",
            PlacepinError::Forbidden(_) => "E006",
            PlacepinError::Unauthorized(_) => "E007",
            PlacepinError::Conflict(_) => "E008",
            PlacepinError::Serialization(_) => "E009",
            PlacepinError::PasswordHash(_) => "E010",
            PlacepinError::TokenInvalid(_) => "E011",
            PlacepinError::VerificationInvalid(_) => "E012",
            PlacepinError::SocialProvider(_) => "E013",
            PlacepinError::NotifyDelivery(_) => "E014",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            PlacepinError::DatabaseConfig(_) => "Database Configuration Error",
            PlacepinError::DatabaseConnection(_) => "Database Connection Error",
            PlacepinError::DatabaseOperation(_) => "Database Operation Error",
            PlacepinError::Validation(_) => "Validation Error",
            PlacepinError::NotFound(_) => "Resource Not Found",
            PlacepinError::Forbidden(_) => "Permission Denied",
            PlacepinError::Unauthorized(_) => "Unauthorized",
            PlacepinError::Conflict(_) => "Resource Conflict",
            PlacepinError::Serialization(_) => "Serialization Error",
            PlacepinError::PasswordHash(_) => "Password Hash Error",
            PlacepinError::TokenInvalid(_) => "Token Invalid",
            PlacepinError::VerificationInvalid(_) => "Verification Invalid",
            PlacepinError::SocialProvider(_) => "Social Provider Error",
            PlacepinError::NotifyDelivery(_) => "Notification Delivery Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            PlacepinError::DatabaseConfig(msg) => msg,
            PlacepinError::DatabaseConnection(msg) => msg,
            PlacepinError::DatabaseOperation(msg) => msg,
            PlacepinError::Validation(msg) => msg,
            PlacepinError::NotFound(msg) => msg,
            PlacepinError::Forbidden(msg) => msg,
            PlacepinError::Unauthorized(msg) => msg,
            PlacepinError::Conflict(msg) => msg,
            PlacepinError::Serialization(msg) => msg,
            PlacepinError::PasswordHash(msg) => msg,
            PlacepinError::TokenInvalid(msg) => msg,
            PlacepinError::VerificationInvalid(msg) => msg,
            PlacepinError::SocialProvider(msg) => msg,
            PlacepinError::NotifyDelivery(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            PlacepinError::Validation(_) | PlacepinError::VerificationInvalid(_) => {
                StatusCode::BAD_REQUEST
            }
            PlacepinError::Unauthorized(_) | PlacepinError::TokenInvalid(_) => {
                StatusCode::UNAUTHORIZED
            }
            PlacepinError::Forbidden(_) => StatusCode::FORBIDDEN,
            PlacepinError::NotFound(_) => StatusCode::NOT_FOUND,
            PlacepinError::Conflict(_) => StatusCode::CONFLICT,
            PlacepinError::SocialProvider(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for PlacepinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 默认使用简洁格式
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for PlacepinError {}

// 便捷的构造函数
impl PlacepinError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        PlacepinError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        PlacepinError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        PlacepinError::DatabaseOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        PlacepinError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        PlacepinError::NotFound(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        PlacepinError::Forbidden(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        PlacepinError::Unauthorized(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        PlacepinError::Conflict(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        PlacepinError::Serialization(msg.into())
    }

    pub fn password_hash<T: Into<String>>(msg: T) -> Self {
        PlacepinError::PasswordHash(msg.into())
    }

    pub fn token_invalid<T: Into<String>>(msg: T) -> Self {
        PlacepinError::TokenInvalid(msg.into())
    }

    pub fn verification_invalid<T: Into<String>>(msg: T) -> Self {
        PlacepinError::VerificationInvalid(msg.into())
    }

    pub fn social_provider<T: Into<String>>(msg: T) -> Self {
        PlacepinError::SocialProvider(msg.into())
    }

    pub fn notify_delivery<T: Into<String>>(msg: T) -> Self {
        PlacepinError::NotifyDelivery(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for PlacepinError {
    fn from(err: sea_orm::DbErr) -> Self {
        PlacepinError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for PlacepinError {
    fn from(err: std::io::Error) -> Self {
        PlacepinError::DatabaseConfig(err.to_string())
    }
}

impl From<serde_json::Error> for PlacepinError {
    fn from(err: serde_json::Error) -> Self {
        PlacepinError::Serialization(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for PlacepinError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        PlacepinError::TokenInvalid(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlacepinError>;
