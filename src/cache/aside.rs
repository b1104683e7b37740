//! Cache-aside 封装
//!
//! 区间/汇总入口的缓存前置：命中直接反序列化返回（不触发聚合），
//! 未命中计算后回填。回填失败按配置级故障记日志，
//! 新鲜结果照常返回——缓存只是优化，不是正确性依赖。

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::analytics::AnalyticsService;
use crate::analytics::response::{AnalyticSummaryResponse, DailyAnalyticResponse};
use crate::errors::Result;
use crate::storage::{CallerIdentity, LinkAnalyticsRepository};

use super::{ResponseCache, cache_key};

pub struct CachedAnalytics<R> {
    service: AnalyticsService<R>,
    cache: Arc<dyn ResponseCache>,
    ttl: Duration,
}

impl<R: LinkAnalyticsRepository> CachedAnalytics<R> {
    pub fn new(service: AnalyticsService<R>, cache: Arc<dyn ResponseCache>) -> Self {
        let ttl = service.config().cache_ttl();
        Self {
            service,
            cache,
            ttl,
        }
    }

    /// 单链接明细，带缓存前置
    ///
    /// `token` 是调用方的原始 bearer 凭证（只用于缓存键），
    /// `identity` 是外部鉴权层解出的身份。
    pub async fn get_link_analytic(
        &self,
        token: &str,
        path: &str,
        identity: &CallerIdentity,
        selector: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyAnalyticResponse>> {
        let key = cache_key(token, path);

        if let Some(cached) = self.lookup::<Vec<DailyAnalyticResponse>>(&key, path).await {
            return Ok(cached);
        }

        let fresh = self
            .service
            .get_link_analytic(identity, selector, start, end)
            .await?;
        self.store(&key, &fresh).await;
        Ok(fresh)
    }

    /// 30 天汇总，带缓存前置
    pub async fn get_summary(
        &self,
        token: &str,
        path: &str,
        identity: &CallerIdentity,
    ) -> Result<AnalyticSummaryResponse> {
        let key = cache_key(token, path);

        if let Some(cached) = self.lookup::<AnalyticSummaryResponse>(&key, path).await {
            return Ok(cached);
        }

        let fresh = self.service.get_summary(identity).await?;
        self.store(&key, &fresh).await;
        Ok(fresh)
    }

    async fn lookup<T: DeserializeOwned>(&self, key: &str, path: &str) -> Option<T> {
        let bytes = self.cache.get(key).await?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => {
                debug!("Analytics cache hit: {}", path);
                Some(value)
            }
            Err(e) => {
                // 反序列化失败视为未命中，条目等 TTL 自然过期
                warn!("Discarding undecodable cache entry for {}: {}", path, e);
                None
            }
        }
    }

    async fn store<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_vec(value) {
            Ok(bytes) => {
                if let Err(e) = self.cache.put(key, bytes, self.ttl).await {
                    // 配置级故障：结果照常返回，这里只暴露给运维
                    error!("Response cache write failed (check cache configuration): {}", e);
                }
            }
            Err(e) => {
                error!("Response serialization for cache failed: {}", e);
            }
        }
    }
}
