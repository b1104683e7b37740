//! Response cache (cache-aside)
//!
//! A short-TTL byte cache in front of the range/summary aggregation,
//! keyed by the caller's bearer credential plus the normalized request
//! path. TTL expiry is the only invalidation: analytics responses may be
//! up to one TTL stale by design, and a cache write failure never fails
//! the request.

pub mod aside;
pub mod memory;
pub mod redis;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::CacheConfig;
use crate::errors::{LinktallyError, Result};

pub use aside::CachedAnalytics;
pub use memory::MemoryResponseCache;
pub use redis::RedisResponseCache;

#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// 命中返回缓存字节；未命中或后端不可用返回 None
    async fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// 写入一个条目；失败属于配置级故障，由调用方记日志后继续
    async fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;
}

/// 按配置构建响应缓存后端
pub fn build_response_cache(config: &CacheConfig) -> Result<Arc<dyn ResponseCache>> {
    match config.backend.as_str() {
        "memory" => Ok(Arc::new(MemoryResponseCache::default())),
        "redis" => Ok(Arc::new(RedisResponseCache::new(&config.redis)?)),
        other => Err(LinktallyError::config(format!(
            "未知的缓存后端: {}（支持 memory / redis）",
            other
        ))),
    }
}

/// 缓存键：凭证 + 规范化请求路径
pub fn cache_key(token: &str, path: &str) -> String {
    format!("{}{}", token, normalize_path(path))
}

/// 路径规范化：保证前导斜杠，去掉尾部斜杠
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
