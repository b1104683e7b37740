//! SeaORM storage backend
//!
//! Database access for the analytics engine, supporting SQLite,
//! MySQL/MariaDB, and PostgreSQL. `AnalyticsStorage` owns the connection
//! pool; every aggregation entry point opens one scoped transaction via
//! [`AnalyticsStorage::begin`] and commits or rolls back on every exit
//! path.

mod connection;
pub mod custom_link;
pub mod models;
pub mod repository;
pub mod social_media;

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tracing::warn;

use crate::config::DatabaseConfig;
use crate::errors::{LinktallyError, Result};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use custom_link::CustomLinkRepository;
pub use models::{
    CallerIdentity, DailyAnalytic, DeviceBreakdown, Interaction, LinkRef, NewDailyAnalytic,
    NewInteraction,
};
pub use repository::{DeviceBreakdownStore, LinkAnalyticsRepository};
pub use social_media::SocialMediaRepository;

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
        Err(LinktallyError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct AnalyticsStorage {
    db: DatabaseConnection,
    backend_name: String,
}

impl AnalyticsStorage {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(LinktallyError::database_config(
                "database.url 未设置".to_string(),
            ));
        }

        let backend_name = infer_backend_from_url(&config.url)?;

        let db = if backend_name == "sqlite" {
            connect_sqlite(&config.url).await?
        } else {
            connect_generic(&config.url, &backend_name, config.pool_size).await?
        };

        let storage = AnalyticsStorage { db, backend_name };

        run_migrations(&storage.db).await?;

        warn!(
            "{} Storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    /// 开启一个作用域事务；调用方负责 commit，或在错误路径 rollback
    pub async fn begin(&self) -> Result<DatabaseTransaction> {
        self.db
            .begin()
            .await
            .map_err(|e| LinktallyError::database_operation(format!("开始事务失败: {}", e)))
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// 获取数据库连接（测试与运维工具直接访问数据库的场景）
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_backend_from_url() {
        assert_eq!(
            infer_backend_from_url("sqlite://data/linktally.db?mode=rwc").unwrap(),
            "sqlite"
        );
        assert_eq!(
            infer_backend_from_url("mysql://root@localhost/linktally").unwrap(),
            "mysql"
        );
        assert_eq!(
            infer_backend_from_url("mariadb://root@localhost/linktally").unwrap(),
            "mysql"
        );
        assert_eq!(
            infer_backend_from_url("postgres://postgres@localhost/linktally").unwrap(),
            "postgres"
        );
    }

    #[test]
    fn test_infer_backend_rejects_unknown_scheme() {
        assert!(infer_backend_from_url("mongodb://localhost").is_err());
    }
}
