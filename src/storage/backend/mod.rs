//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod comments;
mod connection;
mod friends;
mod places;
mod profiles;
mod users;
mod verifications;

use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::errors::{PlacepinError, Result};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use friends::{STATUS_ACCEPTED, STATUS_PENDING, STATUS_REJECTED};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite://")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(PlacepinError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct PlacepinStorage {
    db: DatabaseConnection,
    backend_name: String,
}

impl PlacepinStorage {
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(PlacepinError::database_config(
                "DATABASE_URL 未设置".to_string(),
            ));
        }

        // 根据不同数据库类型配置连接选项
        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name).await?
        };

        let storage = PlacepinStorage {
            db,
            backend_name: backend_name.to_string(),
        };

        // 运行迁移
        run_migrations(&storage.db).await?;

        warn!(
            "{} Storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    /// 基于已有连接构建存储（测试用）
    pub fn from_connection(db: DatabaseConnection, backend_name: &str) -> Self {
        PlacepinStorage {
            db,
            backend_name: backend_name.to_string(),
        }
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// 获取数据库连接（用于需要直接访问数据库的场景）
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_backend_from_url() {
        assert_eq!(infer_backend_from_url("sqlite://places.db").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("places.db").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("mysql://localhost/pp").unwrap(), "mysql");
        assert_eq!(
            infer_backend_from_url("postgres://localhost/pp").unwrap(),
            "postgres"
        );
        assert!(infer_backend_from_url("redis://localhost").is_err());
    }
}
