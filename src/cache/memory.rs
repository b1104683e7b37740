//! 进程内响应缓存（moka）
//!
//! 单机部署与测试使用；条目按写入时传入的 TTL 过期。

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use moka::policy::Expiry;
use tracing::trace;

use crate::errors::Result;

use super::ResponseCache;

/// 每个条目携带自己的 TTL
struct PerEntryTtl;

impl Expiry<String, (Vec<u8>, Duration)> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &(Vec<u8>, Duration),
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.1)
    }
}

pub struct MemoryResponseCache {
    cache: Cache<String, (Vec<u8>, Duration)>,
}

impl MemoryResponseCache {
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self { cache }
    }
}

impl Default for MemoryResponseCache {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl ResponseCache for MemoryResponseCache {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let hit = self.cache.get(key).await.map(|(bytes, _)| bytes);
        if hit.is_some() {
            trace!("MemoryResponseCache hit: {}", key);
        }
        hit
    }

    async fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        self.cache.insert(key.to_string(), (value, ttl)).await;
        Ok(())
    }
}
