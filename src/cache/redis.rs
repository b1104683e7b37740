//! Redis 响应缓存
//!
//! 多实例部署共享一份响应缓存。持久化复用一条 multiplexed 连接，
//! 出错时重置，下次调用重建。

use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, trace};

use crate::config::RedisConfig;
use crate::errors::{LinktallyError, Result};

use super::ResponseCache;

pub struct RedisResponseCache {
    client: redis::Client,
    /// 持久化连接，使用 RwLock 保护
    connection: Arc<RwLock<Option<MultiplexedConnection>>>,
    key_prefix: String,
}

impl RedisResponseCache {
    pub fn new(config: &RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.clone()).map_err(|e| {
            LinktallyError::cache_connection(format!("Redis URL 无效 ({}): {}", config.url, e))
        })?;

        // 启动时做一次同步 PING，尽早暴露配置错误
        let mut conn = client.get_connection().map_err(|e| {
            LinktallyError::cache_connection(format!(
                "无法连接 Redis ({}): {}",
                config.url, e
            ))
        })?;
        redis::cmd("PING").query::<String>(&mut conn).map_err(|e| {
            LinktallyError::cache_connection(format!("Redis ping 失败 ({}): {}", config.url, e))
        })?;

        debug!(
            "RedisResponseCache created with prefix: '{}'",
            config.key_prefix
        );

        Ok(Self {
            client,
            connection: Arc::new(RwLock::new(None)),
            key_prefix: config.key_prefix.clone(),
        })
    }

    /// 获取或建立持久连接
    async fn get_connection(&self) -> std::result::Result<MultiplexedConnection, redis::RedisError> {
        {
            let conn_guard = self.connection.read().await;
            if let Some(ref conn) = *conn_guard {
                return Ok(conn.clone());
            }
        }

        let mut conn_guard = self.connection.write().await;

        // 双重检查，避免竞态条件
        if let Some(ref conn) = *conn_guard {
            return Ok(conn.clone());
        }

        let new_conn = self.client.get_multiplexed_async_connection().await?;
        *conn_guard = Some(new_conn.clone());
        debug!("Redis connection established and cached");

        Ok(new_conn)
    }

    /// 重置连接（在连接错误时调用）
    async fn reset_connection(&self) {
        let mut conn_guard = self.connection.write().await;
        *conn_guard = None;
        debug!("Redis connection reset due to error");
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl ResponseCache for RedisResponseCache {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let redis_key = self.make_key(key);

        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                self.reset_connection().await;
                return None;
            }
        };

        let result: redis::RedisResult<Option<Vec<u8>>> = conn.get(&redis_key).await;

        match result {
            Ok(Some(data)) => {
                trace!("RedisResponseCache hit: {}", key);
                Some(data)
            }
            Ok(None) => None,
            Err(e) => {
                error!("Failed to get key '{}': {}", key, e);
                self.reset_connection().await;
                None
            }
        }
    }

    async fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        let redis_key = self.make_key(key);

        let mut conn = self.get_connection().await.map_err(|e| {
            LinktallyError::cache_connection(format!("Redis 连接失败: {}", e))
        })?;

        let ttl_secs = ttl.as_secs().max(1);
        match conn
            .set_ex::<String, Vec<u8>, ()>(redis_key, value, ttl_secs)
            .await
        {
            Ok(()) => {
                trace!("RedisResponseCache stored: {} (ttl {}s)", key, ttl_secs);
                Ok(())
            }
            Err(e) => {
                self.reset_connection().await;
                Err(LinktallyError::cache_connection(format!(
                    "Redis 写入失败: {}",
                    e
                )))
            }
        }
    }
}
