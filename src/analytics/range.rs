//! 区间明细与 30 天汇总驱动
//!
//! 两个入口各自在一个数据库事务内完成整段计算：
//! 成功提交，任何错误路径回滚。日期按升序逐日驱动单日聚合器，
//! 区间内每一天都有一条结果（零点击的日期在首次触达时物化为零值行）。

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use sea_orm::DatabaseTransaction;
use tracing::{debug, info};

use crate::config::AnalyticsConfig;
use crate::device::DeviceCounts;
use crate::errors::{LinktallyError, Result};
use crate::storage::{AnalyticsStorage, CallerIdentity, LinkAnalyticsRepository};

use super::aggregator::DailyAggregator;
use super::response::{
    AnalyticSummaryResponse, DailyAnalyticResponse, DeviceBreakdownResponse, LinkTotalsResponse,
};

/// 区间/汇总聚合服务，泛化于链接家族的仓储适配器
pub struct AnalyticsService<R> {
    storage: Arc<AnalyticsStorage>,
    repo: Arc<R>,
    config: AnalyticsConfig,
}

impl<R: LinkAnalyticsRepository> AnalyticsService<R> {
    pub fn new(storage: Arc<AnalyticsStorage>, repo: Arc<R>, config: AnalyticsConfig) -> Self {
        Self {
            storage,
            repo,
            config,
        }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// 单链接按日明细，[start, end] 闭区间，升序、无空洞
    pub async fn get_link_analytic(
        &self,
        identity: &CallerIdentity,
        selector: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyAnalyticResponse>> {
        info!(
            "Analytics: get_link_analytic selector={} start={} end={} user={}",
            selector, start, end, identity.username
        );

        let txn = self.storage.begin().await?;
        let result = self
            .link_analytic_in_txn(&txn, identity, selector, start, end)
            .await;

        match result {
            Ok(responses) => {
                txn.commit().await.map_err(|e| {
                    LinktallyError::database_operation(format!("提交事务失败: {}", e))
                })?;
                debug!(
                    "Analytics: get_link_analytic returned {} days",
                    responses.len()
                );
                Ok(responses)
            }
            Err(e) => {
                let _ = txn.rollback().await;
                Err(e)
            }
        }
    }

    /// 全部链接的 30 天滚动汇总；没有链接返回空汇总
    pub async fn get_summary(&self, identity: &CallerIdentity) -> Result<AnalyticSummaryResponse> {
        info!("Analytics: get_summary user={}", identity.username);

        let txn = self.storage.begin().await?;
        let result = self.summary_in_txn(&txn, identity).await;

        match result {
            Ok(summary) => {
                txn.commit().await.map_err(|e| {
                    LinktallyError::database_operation(format!("提交事务失败: {}", e))
                })?;
                debug!("Analytics: get_summary covered {} links", summary.links.len());
                Ok(summary)
            }
            Err(e) => {
                let _ = txn.rollback().await;
                Err(e)
            }
        }
    }

    async fn link_analytic_in_txn(
        &self,
        txn: &DatabaseTransaction,
        identity: &CallerIdentity,
        selector: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyAnalyticResponse>> {
        let today = Utc::now().date_naive();
        validate_range(start, end, today, self.config.history_window_days)?;

        let link = self
            .repo
            .find_owned_link(txn, selector, &identity.user_id)
            .await?
            .ok_or_else(|| {
                LinktallyError::link_not_registered("link is not registered for this account")
            })?;

        let aggregator = DailyAggregator::new(self.repo.as_ref(), &self.config);
        let mut responses = Vec::new();

        let mut day = start;
        while day <= end {
            let row = aggregator.get_or_refresh(txn, link.id, day, today).await?;
            responses.push(DailyAnalyticResponse::from_row(&link, &row));
            day += Duration::days(1);
        }

        Ok(responses)
    }

    async fn summary_in_txn(
        &self,
        txn: &DatabaseTransaction,
        identity: &CallerIdentity,
    ) -> Result<AnalyticSummaryResponse> {
        let today = Utc::now().date_naive();
        let window_start = today - Duration::days(self.config.summary_window_days);

        let links = self.repo.list_owned_links(txn, &identity.user_id).await?;

        let aggregator = DailyAggregator::new(self.repo.as_ref(), &self.config);
        let mut device_total = DeviceCounts::default();
        let mut link_totals = Vec::with_capacity(links.len());

        for link in &links {
            let mut totals = LinkTotalsResponse {
                name: link.name.clone(),
                total_click_count: 0,
                total_view_count: 0,
            };

            let mut day = window_start;
            while day <= today {
                let row = aggregator.get_or_refresh(txn, link.id, day, today).await?;

                totals.total_click_count += row.click_count as i64;
                totals.total_view_count += row.view_count as i64;

                device_total.desktop += row.breakdown.desktop;
                device_total.mobile += row.breakdown.mobile;
                device_total.tablet += row.breakdown.tablet;
                device_total.other += row.breakdown.other;

                day += Duration::days(1);
            }

            link_totals.push(totals);
        }

        Ok(AnalyticSummaryResponse {
            links: link_totals,
            device_analytic: DeviceBreakdownResponse::from(device_total),
            last_updated: Utc::now(),
        })
    }
}

/// 明细查询的日期区间校验
fn validate_range(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
    window_days: i64,
) -> Result<()> {
    if end > today {
        return Err(LinktallyError::invalid_end_date(
            "end date must be today or earlier, not in the future",
        ));
    }

    if start < today - Duration::days(window_days) {
        return Err(LinktallyError::invalid_start_date(format!(
            "start date must be within the last {} days",
            window_days
        )));
    }

    Ok(())
}
