//! 单日取数/刷新算法
//!
//! `get_or_refresh` 保证返回的 (链接, 日期) 日汇总行是最新的：
//! 未物化的日期现场从点击事件重算并创建；已物化的按过期规则决定是否刷新。
//!
//! 过期规则：
//! - `stale_by_age`：updated_at 早于当日结束（行创建于当日尚未结束时，
//!   可能只覆盖了部分点击事件）
//! - 历史日期：stale_by_age 时刷新一次，之后永久冻结（历史不可变）
//! - 当日：每 update_interval 至多刷新一次，约束轮询下的重算成本

use chrono::{DateTime, Duration, NaiveDate, Utc};
use sea_orm::DatabaseTransaction;
use tracing::debug;

use crate::config::AnalyticsConfig;
use crate::device::{DeviceCounts, count_devices};
use crate::errors::Result;
use crate::storage::{DailyAnalytic, LinkAnalyticsRepository, NewDailyAnalytic};

/// 当日结束时刻（次日 UTC 零点）
pub(crate) fn end_of_day(day: NaiveDate) -> DateTime<Utc> {
    (day + Duration::days(1)).and_hms_opt(0, 0, 0).unwrap().and_utc()
}

/// 判断已存在的日汇总行是否需要重算
pub fn needs_refresh(
    updated_at: DateTime<Utc>,
    day: NaiveDate,
    today: NaiveDate,
    now: DateTime<Utc>,
    update_interval: Duration,
) -> bool {
    let stale_by_age = updated_at < end_of_day(day);
    let is_today = day == today;
    let due_for_refresh = now >= updated_at + update_interval;

    (stale_by_age && !is_today) || (stale_by_age && is_today && due_for_refresh)
}

/// 单日聚合器，泛化于链接家族的仓储适配器
pub struct DailyAggregator<'a, R> {
    repo: &'a R,
    update_interval: Duration,
}

impl<'a, R: LinkAnalyticsRepository> DailyAggregator<'a, R> {
    pub fn new(repo: &'a R, config: &AnalyticsConfig) -> Self {
        Self {
            repo,
            update_interval: config.update_interval(),
        }
    }

    /// 返回 (link_id, day) 的最新日汇总行，必要时现场物化或刷新
    pub async fn get_or_refresh(
        &self,
        txn: &DatabaseTransaction,
        link_id: i64,
        day: NaiveDate,
        today: NaiveDate,
    ) -> Result<DailyAnalytic> {
        match self.repo.find_daily(txn, link_id, day).await? {
            None => {
                // 首次触达的日期没有历史计数可保留，直接全量计算
                let (click_count, counts) = self.recount(txn, link_id, day).await?;
                debug!(
                    "Aggregator: materializing link={} day={} clicks={}",
                    link_id, day, click_count
                );
                self.repo
                    .insert_daily(
                        txn,
                        NewDailyAnalytic {
                            link_id,
                            date: day,
                            click_count,
                            counts,
                        },
                    )
                    .await
            }
            Some(row) => {
                if needs_refresh(row.updated_at, day, today, Utc::now(), self.update_interval) {
                    let (click_count, counts) = self.recount(txn, link_id, day).await?;
                    debug!(
                        "Aggregator: refreshing link={} day={} clicks={}",
                        link_id, day, click_count
                    );
                    self.repo.update_daily(txn, &row, click_count, counts).await
                } else {
                    // 新鲜行原样返回，零写入
                    Ok(row)
                }
            }
        }
    }

    /// 从点击事件全量重算当日计数与设备分布
    async fn recount(
        &self,
        txn: &DatabaseTransaction,
        link_id: i64,
        day: NaiveDate,
    ) -> Result<(i32, DeviceCounts)> {
        let interactions = self.repo.interactions_on(txn, link_id, day).await?;
        let counts = count_devices(interactions.iter().map(|i| i.user_agent.as_str()));
        Ok((interactions.len() as i32, counts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(day: NaiveDate, h: u32, min: u32) -> DateTime<Utc> {
        day.and_hms_opt(h, min, 0).unwrap().and_utc()
    }

    fn hour() -> Duration {
        Duration::hours(1)
    }

    #[test]
    fn test_past_day_updated_mid_day_is_stale() {
        let day = date(2024, 1, 10);
        let today = date(2024, 1, 15);
        // 行创建于当天 12:00，早于当日结束 -> 需要补一次刷新
        assert!(needs_refresh(at(day, 12, 0), day, today, at(today, 9, 0), hour()));
    }

    #[test]
    fn test_past_day_updated_after_close_is_frozen() {
        let day = date(2024, 1, 10);
        let today = date(2024, 1, 15);
        // updated_at 已过当日结束 -> 永久冻结，无论过了多久
        let after_close = at(date(2024, 1, 11), 0, 30);
        assert!(!needs_refresh(after_close, day, today, at(today, 9, 0), hour()));
    }

    #[test]
    fn test_today_within_interval_not_refreshed() {
        let today = date(2024, 1, 15);
        let updated = at(today, 9, 0);
        let now = at(today, 9, 30);
        assert!(!needs_refresh(updated, today, today, now, hour()));
    }

    #[test]
    fn test_today_after_interval_refreshed() {
        let today = date(2024, 1, 15);
        let updated = at(today, 9, 0);
        let now = at(today, 10, 0);
        assert!(needs_refresh(updated, today, today, now, hour()));
    }

    #[test]
    fn test_interval_boundary_is_inclusive() {
        let today = date(2024, 1, 15);
        let updated = at(today, 9, 0);
        // now == updated_at + interval -> 到期
        assert!(needs_refresh(updated, today, today, updated + hour(), hour()));
    }

    #[test]
    fn test_end_of_day_is_next_midnight() {
        let day = date(2024, 1, 10);
        assert_eq!(end_of_day(day), at(date(2024, 1, 11), 0, 0));
    }
}
