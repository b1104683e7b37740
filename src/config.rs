//! Configuration management
//!
//! Loads `AppConfig` from an optional `linktally.toml` plus
//! `LINKTALLY_`-prefixed environment variables (with `dotenvy` support).
//! The analytics thresholds that used to live as package-level globals in
//! older builds are explicit fields here and are handed to the aggregator
//! and cache wrapper at construction time.

use serde::Deserialize;

use crate::errors::Result;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

impl AppConfig {
    /// 加载配置：可选的 linktally.toml + LINKTALLY__* 环境变量覆盖
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::File::with_name("linktally").required(false))
            .add_source(
                config::Environment::with_prefix("LINKTALLY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// sqlite:// / mysql:// / postgres:// 连接串
    #[serde(default = "default_database_url")]
    pub url: String,
    /// 连接池大小（SQLite 后端忽略）
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            pool_size: default_pool_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// 响应缓存后端："memory" 或 "redis"
    #[serde(default = "default_cache_backend")]
    pub backend: String,
    #[serde(default)]
    pub redis: RedisConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: default_cache_backend(),
            redis: RedisConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_redis_url")]
    pub url: String,
    #[serde(default = "default_redis_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: default_redis_key_prefix(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// 日志文件路径；None 或空串输出到控制台
    #[serde(default)]
    pub file: Option<String>,
    /// "full" 或 "json"
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub enable_rotation: bool,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            format: default_log_format(),
            enable_rotation: false,
            max_backups: default_max_backups(),
        }
    }
}

/// 分析引擎阈值配置
///
/// 所有惰性重算与缓存行为都由这里驱动，构造聚合器/缓存层时显式传入。
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsConfig {
    /// 当日汇总行两次重算之间的最小间隔（秒）
    #[serde(default = "default_update_interval_secs")]
    pub update_interval_secs: u64,
    /// 响应缓存 TTL（秒）
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// 明细查询允许回溯的天数（start_date 校验窗口）
    #[serde(default = "default_window_days")]
    pub history_window_days: i64,
    /// 汇总查询的滚动窗口天数
    #[serde(default = "default_window_days")]
    pub summary_window_days: i64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            update_interval_secs: default_update_interval_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            history_window_days: default_window_days(),
            summary_window_days: default_window_days(),
        }
    }
}

impl AnalyticsConfig {
    pub fn update_interval(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.update_interval_secs as i64)
    }

    pub fn cache_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cache_ttl_secs)
    }
}

fn default_database_url() -> String {
    "sqlite://linktally.db?mode=rwc".to_string()
}

fn default_pool_size() -> u32 {
    10
}

fn default_cache_backend() -> String {
    "memory".to_string()
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_redis_key_prefix() -> String {
    "linktally:analytics:".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "full".to_string()
}

fn default_max_backups() -> u32 {
    7
}

fn default_update_interval_secs() -> u64 {
    3600
}

fn default_cache_ttl_secs() -> u64 {
    60
}

fn default_window_days() -> i64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_analytics_config() {
        let cfg = AnalyticsConfig::default();
        assert_eq!(cfg.update_interval_secs, 3600);
        assert_eq!(cfg.cache_ttl_secs, 60);
        assert_eq!(cfg.history_window_days, 30);
        assert_eq!(cfg.summary_window_days, 30);
        assert_eq!(cfg.update_interval(), chrono::Duration::hours(1));
    }

    #[test]
    fn test_default_app_config() {
        let cfg = AppConfig::default();
        assert!(cfg.database.url.starts_with("sqlite://"));
        assert_eq!(cfg.cache.backend, "memory");
        assert_eq!(cfg.logging.level, "info");
    }
}
