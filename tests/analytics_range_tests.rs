//! AnalyticsService 集成测试
//!
//! 覆盖日期区间校验、链接归属校验、区间完整性、
//! 单日物化/刷新语义、历史冻结以及 30 天汇总。

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use sea_orm::{ActiveValue::Set, EntityTrait};
use tempfile::TempDir;

use linktally::analytics::AnalyticsService;
use linktally::config::{AnalyticsConfig, DatabaseConfig};
use linktally::errors::LinktallyError;
use linktally::storage::{AnalyticsStorage, CallerIdentity, CustomLinkRepository};
use migration::entities::{custom_link, custom_link_interaction};

const UA_DESKTOP: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const UA_MOBILE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";

// =============================================================================
// 夹具
// =============================================================================

async fn create_temp_storage() -> (Arc<AnalyticsStorage>, TempDir) {
    let td = TempDir::new().unwrap();
    let p = td.path().join("analytics_range_test.db");
    let cfg = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", p.display()),
        pool_size: 5,
    };
    let s = AnalyticsStorage::new(&cfg).await.unwrap();
    (Arc::new(s), td)
}

fn identity(user_id: &str) -> CallerIdentity {
    CallerIdentity {
        user_id: user_id.to_string(),
        username: "tester".to_string(),
    }
}

fn service(storage: &Arc<AnalyticsStorage>) -> AnalyticsService<CustomLinkRepository> {
    AnalyticsService::new(
        Arc::clone(storage),
        Arc::new(CustomLinkRepository),
        AnalyticsConfig::default(),
    )
}

async fn seed_custom_link(storage: &AnalyticsStorage, user_id: &str, title: &str) -> i64 {
    let model = custom_link::ActiveModel {
        user_id: Set(user_id.to_string()),
        title: Set(title.to_string()),
        short_code: Set(format!("code-{}", uuid::Uuid::new_v4())),
        long_link: Set("https://example.com/landing".to_string()),
        activate: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    custom_link::Entity::insert(model)
        .exec_with_returning(storage.get_db())
        .await
        .unwrap()
        .id
}

async fn seed_interaction(
    storage: &AnalyticsStorage,
    link_id: i64,
    user_agent: &str,
    at: DateTime<Utc>,
) {
    let model = custom_link_interaction::ActiveModel {
        custom_link_id: Set(link_id),
        client_ip: Set("203.0.113.7".to_string()),
        user_agent: Set(user_agent.to_string()),
        created_at: Set(at),
        ..Default::default()
    };

    custom_link_interaction::Entity::insert(model)
        .exec(storage.get_db())
        .await
        .unwrap();
}

fn noon(day: NaiveDate) -> DateTime<Utc> {
    day.and_hms_opt(12, 0, 0).unwrap().and_utc()
}

// =============================================================================
// 日期区间校验
// =============================================================================

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[tokio::test]
    async fn test_end_date_today_accepted() {
        let (storage, _td) = create_temp_storage().await;
        let user = uuid::Uuid::new_v4().to_string();
        let link_id = seed_custom_link(&storage, &user, "landing").await;

        let today = Utc::now().date_naive();
        let result = service(&storage)
            .get_link_analytic(&identity(&user), link_id, today, today)
            .await;

        assert!(result.is_ok(), "end=today 应当通过: {:?}", result.err());
        assert_eq!(result.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_end_date_tomorrow_rejected() {
        let (storage, _td) = create_temp_storage().await;
        let user = uuid::Uuid::new_v4().to_string();
        let link_id = seed_custom_link(&storage, &user, "landing").await;

        let today = Utc::now().date_naive();
        let result = service(&storage)
            .get_link_analytic(&identity(&user), link_id, today, today + Duration::days(1))
            .await;

        assert!(matches!(result, Err(LinktallyError::InvalidEndDate(_))));
    }

    #[tokio::test]
    async fn test_start_date_30_days_ago_accepted() {
        let (storage, _td) = create_temp_storage().await;
        let user = uuid::Uuid::new_v4().to_string();
        let link_id = seed_custom_link(&storage, &user, "landing").await;

        let today = Utc::now().date_naive();
        let start = today - Duration::days(30);
        let result = service(&storage)
            .get_link_analytic(&identity(&user), link_id, start, start)
            .await;

        assert!(result.is_ok(), "start=today-30 应当通过: {:?}", result.err());
    }

    #[tokio::test]
    async fn test_start_date_31_days_ago_rejected() {
        let (storage, _td) = create_temp_storage().await;
        let user = uuid::Uuid::new_v4().to_string();
        let link_id = seed_custom_link(&storage, &user, "landing").await;

        let today = Utc::now().date_naive();
        let start = today - Duration::days(31);
        let result = service(&storage)
            .get_link_analytic(&identity(&user), link_id, start, today)
            .await;

        assert!(matches!(result, Err(LinktallyError::InvalidStartDate(_))));
    }

    #[tokio::test]
    async fn test_unknown_link_rejected() {
        let (storage, _td) = create_temp_storage().await;
        let user = uuid::Uuid::new_v4().to_string();

        let today = Utc::now().date_naive();
        let result = service(&storage)
            .get_link_analytic(&identity(&user), 9999, today, today)
            .await;

        assert!(matches!(result, Err(LinktallyError::LinkNotRegistered(_))));
    }

    #[tokio::test]
    async fn test_foreign_link_rejected() {
        let (storage, _td) = create_temp_storage().await;
        let owner = uuid::Uuid::new_v4().to_string();
        let stranger = uuid::Uuid::new_v4().to_string();
        let link_id = seed_custom_link(&storage, &owner, "landing").await;

        let today = Utc::now().date_naive();
        let result = service(&storage)
            .get_link_analytic(&identity(&stranger), link_id, today, today)
            .await;

        // 归属校验：别人的链接等同于不存在
        assert!(matches!(result, Err(LinktallyError::LinkNotRegistered(_))));
    }
}

// =============================================================================
// 区间完整性与单日语义
// =============================================================================

#[cfg(test)]
mod range_tests {
    use super::*;

    #[tokio::test]
    async fn test_range_has_one_row_per_day_ascending() {
        let (storage, _td) = create_temp_storage().await;
        let user = uuid::Uuid::new_v4().to_string();
        let link_id = seed_custom_link(&storage, &user, "landing").await;

        let today = Utc::now().date_naive();
        let start = today - Duration::days(3);

        let rows = service(&storage)
            .get_link_analytic(&identity(&user), link_id, start, today)
            .await
            .unwrap();

        // 闭区间 4 天，升序无空洞，无点击的日期物化为零值行
        assert_eq!(rows.len(), 4);
        for (offset, row) in rows.iter().enumerate() {
            let expected = start + Duration::days(offset as i64);
            assert_eq!(row.date, expected.format("%Y-%m-%d").to_string());
            assert_eq!(row.click_count, 0);
            assert_eq!(row.view_count, 0);
            assert_eq!(row.device_analytic.mobile, 0);
            assert_eq!(row.device_analytic.tablet, 0);
            assert_eq!(row.device_analytic.desktop, 0);
            assert_eq!(row.device_analytic.other, 0);
        }
    }

    #[tokio::test]
    async fn test_clicks_and_device_breakdown_scenario() {
        let (storage, _td) = create_temp_storage().await;
        let user = uuid::Uuid::new_v4().to_string();
        let link_id = seed_custom_link(&storage, &user, "landing").await;

        // 第一天 3 次点击（2 桌面 1 手机），第二天 0 次
        let day = Utc::now().date_naive() - Duration::days(2);
        seed_interaction(&storage, link_id, UA_DESKTOP, noon(day)).await;
        seed_interaction(&storage, link_id, UA_DESKTOP, noon(day) + Duration::hours(1)).await;
        seed_interaction(&storage, link_id, UA_MOBILE, noon(day) + Duration::hours(2)).await;

        let rows = service(&storage)
            .get_link_analytic(&identity(&user), link_id, day, day + Duration::days(1))
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].date, day.format("%Y-%m-%d").to_string());
        assert_eq!(rows[0].click_count, 3);
        assert_eq!(rows[0].device_analytic.desktop, 2);
        assert_eq!(rows[0].device_analytic.mobile, 1);
        assert_eq!(rows[0].device_analytic.tablet, 0);
        assert_eq!(rows[0].device_analytic.other, 0);

        assert_eq!(rows[1].click_count, 0);
        assert_eq!(rows[1].device_analytic.desktop, 0);
        assert_eq!(rows[1].device_analytic.mobile, 0);

        // 设备分布计数总和等于点击数
        let d = &rows[0].device_analytic;
        assert_eq!(d.desktop + d.mobile + d.tablet + d.other, rows[0].click_count);
    }

    #[tokio::test]
    async fn test_interactions_outside_day_window_excluded() {
        let (storage, _td) = create_temp_storage().await;
        let user = uuid::Uuid::new_v4().to_string();
        let link_id = seed_custom_link(&storage, &user, "landing").await;

        let day = Utc::now().date_naive() - Duration::days(2);
        // 前一天 23:59 与当天 00:00：只有后者落入 [day, day+24h)
        let just_before = day.and_hms_opt(0, 0, 0).unwrap().and_utc() - Duration::minutes(1);
        let at_midnight = day.and_hms_opt(0, 0, 0).unwrap().and_utc();
        seed_interaction(&storage, link_id, UA_DESKTOP, just_before).await;
        seed_interaction(&storage, link_id, UA_DESKTOP, at_midnight).await;

        let rows = service(&storage)
            .get_link_analytic(&identity(&user), link_id, day, day)
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].click_count, 1);
    }

    #[tokio::test]
    async fn test_view_count_stays_reserved() {
        let (storage, _td) = create_temp_storage().await;
        let user = uuid::Uuid::new_v4().to_string();
        let link_id = seed_custom_link(&storage, &user, "landing").await;

        let day = Utc::now().date_naive() - Duration::days(1);
        seed_interaction(&storage, link_id, UA_DESKTOP, noon(day)).await;

        let rows = service(&storage)
            .get_link_analytic(&identity(&user), link_id, day, day)
            .await
            .unwrap();

        // view_count 是预留字段：点击事件不会驱动它
        assert_eq!(rows[0].click_count, 1);
        assert_eq!(rows[0].view_count, 0);
    }
}

// =============================================================================
// 历史冻结与当日刷新节流
// =============================================================================

#[cfg(test)]
mod refresh_tests {
    use super::*;

    #[tokio::test]
    async fn test_past_day_frozen_after_first_materialization() {
        let (storage, _td) = create_temp_storage().await;
        let user = uuid::Uuid::new_v4().to_string();
        let link_id = seed_custom_link(&storage, &user, "landing").await;

        let day = Utc::now().date_naive() - Duration::days(2);
        seed_interaction(&storage, link_id, UA_DESKTOP, noon(day)).await;

        let svc = service(&storage);
        // 首次调用物化该行；物化发生在当日结束之后 -> 行永久冻结
        svc.get_link_analytic(&identity(&user), link_id, day, day)
            .await
            .unwrap();

        // 即使之后又补录了事件也不再重算
        seed_interaction(&storage, link_id, UA_MOBILE, noon(day) + Duration::hours(1)).await;

        let second = svc
            .get_link_analytic(&identity(&user), link_id, day, day)
            .await
            .unwrap();
        let third = svc
            .get_link_analytic(&identity(&user), link_id, day, day)
            .await
            .unwrap();

        // 冻结行逐比特一致：计数、设备分布、updated_at 全部不变
        assert_eq!(second, third);
        assert_eq!(second[0].click_count, 1);
        assert_eq!(second[0].device_analytic.desktop, 1);
        assert_eq!(second[0].device_analytic.mobile, 0);
    }

    #[tokio::test]
    async fn test_today_not_refreshed_within_interval() {
        let (storage, _td) = create_temp_storage().await;
        let user = uuid::Uuid::new_v4().to_string();
        let link_id = seed_custom_link(&storage, &user, "landing").await;

        let today = Utc::now().date_naive();
        seed_interaction(&storage, link_id, UA_DESKTOP, Utc::now()).await;

        let svc = service(&storage);
        // 首次调用物化当日行
        svc.get_link_analytic(&identity(&user), link_id, today, today)
            .await
            .unwrap();

        seed_interaction(&storage, link_id, UA_MOBILE, Utc::now()).await;

        // update_interval 内不重算：后续两次读取原样返回同一行
        let second = svc
            .get_link_analytic(&identity(&user), link_id, today, today)
            .await
            .unwrap();
        let third = svc
            .get_link_analytic(&identity(&user), link_id, today, today)
            .await
            .unwrap();

        assert_eq!(second[0].click_count, 1);
        assert_eq!(second, third);
        assert_eq!(second[0].last_updated, third[0].last_updated);
    }

    #[tokio::test]
    async fn test_today_refreshed_after_interval_elapsed() {
        let (storage, _td) = create_temp_storage().await;
        let user = uuid::Uuid::new_v4().to_string();
        let link_id = seed_custom_link(&storage, &user, "landing").await;

        let today = Utc::now().date_naive();
        seed_interaction(&storage, link_id, UA_DESKTOP, Utc::now()).await;

        let svc_hourly = service(&storage);
        let first = svc_hourly
            .get_link_analytic(&identity(&user), link_id, today, today)
            .await
            .unwrap();
        assert_eq!(first[0].click_count, 1);

        // interval=0 模拟间隔已过
        let svc_eager = AnalyticsService::new(
            Arc::clone(&storage),
            Arc::new(CustomLinkRepository),
            AnalyticsConfig {
                update_interval_secs: 0,
                ..AnalyticsConfig::default()
            },
        );

        seed_interaction(&storage, link_id, UA_MOBILE, Utc::now()).await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        let second = svc_eager
            .get_link_analytic(&identity(&user), link_id, today, today)
            .await
            .unwrap();

        assert_eq!(second[0].click_count, 2);
        assert_eq!(second[0].device_analytic.mobile, 1);
        assert!(second[0].last_updated > first[0].last_updated);
    }
}

// =============================================================================
// 30 天汇总
// =============================================================================

#[cfg(test)]
mod summary_tests {
    use super::*;

    #[tokio::test]
    async fn test_summary_with_no_links_is_empty() {
        let (storage, _td) = create_temp_storage().await;
        let user = uuid::Uuid::new_v4().to_string();

        let summary = service(&storage).get_summary(&identity(&user)).await.unwrap();

        assert!(summary.links.is_empty());
        assert_eq!(summary.device_analytic.desktop, 0);
        assert_eq!(summary.device_analytic.mobile, 0);
        assert_eq!(summary.device_analytic.tablet, 0);
        assert_eq!(summary.device_analytic.other, 0);
    }

    #[tokio::test]
    async fn test_summary_totals_per_link_and_grand_devices() {
        let (storage, _td) = create_temp_storage().await;
        let user = uuid::Uuid::new_v4().to_string();
        let landing = seed_custom_link(&storage, &user, "landing").await;
        let promo = seed_custom_link(&storage, &user, "promo").await;

        let day = Utc::now().date_naive() - Duration::days(3);
        seed_interaction(&storage, landing, UA_DESKTOP, noon(day)).await;
        seed_interaction(&storage, landing, UA_MOBILE, noon(day) + Duration::hours(1)).await;
        seed_interaction(&storage, promo, UA_MOBILE, noon(day + Duration::days(1))).await;

        let summary = service(&storage).get_summary(&identity(&user)).await.unwrap();

        assert_eq!(summary.links.len(), 2);
        let landing_totals = summary.links.iter().find(|l| l.name == "landing").unwrap();
        let promo_totals = summary.links.iter().find(|l| l.name == "promo").unwrap();

        assert_eq!(landing_totals.total_click_count, 2);
        assert_eq!(landing_totals.total_view_count, 0);
        assert_eq!(promo_totals.total_click_count, 1);

        assert_eq!(summary.device_analytic.desktop, 1);
        assert_eq!(summary.device_analytic.mobile, 2);
        assert_eq!(summary.device_analytic.tablet, 0);
        assert_eq!(summary.device_analytic.other, 0);
    }

    #[tokio::test]
    async fn test_summary_ignores_other_users_links() {
        let (storage, _td) = create_temp_storage().await;
        let user = uuid::Uuid::new_v4().to_string();
        let other = uuid::Uuid::new_v4().to_string();

        let foreign = seed_custom_link(&storage, &other, "foreign").await;
        seed_interaction(&storage, foreign, UA_DESKTOP, Utc::now()).await;

        let summary = service(&storage).get_summary(&identity(&user)).await.unwrap();
        assert!(summary.links.is_empty());
    }
}
