//! 社媒链接侧的端到端测试
//!
//! 两个链接家族共用同一套算法；这里验证社媒适配器的差异点：
//! selector 按 (社媒类型, 用户) 解析，汇总标签取平台名。

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use sea_orm::{ActiveValue::Set, EntityTrait};
use tempfile::TempDir;

use linktally::analytics::{AnalyticsService, InteractionRecorder};
use linktally::config::{AnalyticsConfig, DatabaseConfig};
use linktally::errors::LinktallyError;
use linktally::storage::{AnalyticsStorage, CallerIdentity, SocialMediaRepository};
use migration::entities::{social_media_interaction, social_media_link, social_media_type};

const UA_DESKTOP: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const UA_TABLET: &str = "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Mobile/15E148 Safari/604.1";

async fn create_temp_storage() -> (Arc<AnalyticsStorage>, TempDir) {
    let td = TempDir::new().unwrap();
    let p = td.path().join("social_media_test.db");
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

fn service(storage: &Arc<AnalyticsStorage>) -> AnalyticsService<SocialMediaRepository> {
    AnalyticsService::new(
        Arc::clone(storage),
        Arc::new(SocialMediaRepository),
        AnalyticsConfig::default(),
    )
}

async fn seed_type(storage: &AnalyticsStorage, name: &str) -> i64 {
    let model = social_media_type::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    };

    social_media_type::Entity::insert(model)
        .exec_with_returning(storage.get_db())
        .await
        .unwrap()
        .id
}

async fn seed_link(storage: &AnalyticsStorage, user_id: &str, type_id: i64) -> i64 {
    let model = social_media_link::ActiveModel {
        user_id: Set(user_id.to_string()),
        type_id: Set(type_id),
        link_or_username: Set("@tester".to_string()),
        activate: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    social_media_link::Entity::insert(model)
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
    let model = social_media_interaction::ActiveModel {
        social_media_link_id: Set(link_id),
        client_ip: Set("198.51.100.23".to_string()),
        user_agent: Set(user_agent.to_string()),
        created_at: Set(at),
        ..Default::default()
    };

    social_media_interaction::Entity::insert(model)
        .exec(storage.get_db())
        .await
        .unwrap();
}

fn noon(day: NaiveDate) -> DateTime<Utc> {
    day.and_hms_opt(12, 0, 0).unwrap().and_utc()
}

#[tokio::test]
async fn test_selector_resolves_by_type_and_owner() {
    let (storage, _td) = create_temp_storage().await;
    let user = uuid::Uuid::new_v4().to_string();
    let instagram = seed_type(&storage, "Instagram").await;
    let link_id = seed_link(&storage, &user, instagram).await;

    let day = Utc::now().date_naive() - Duration::days(1);
    seed_interaction(&storage, link_id, UA_DESKTOP, noon(day)).await;
    seed_interaction(&storage, link_id, UA_TABLET, noon(day) + Duration::hours(2)).await;

    // selector 是社媒类型 id，不是链接 id
    let rows = service(&storage)
        .get_link_analytic(&identity(&user), instagram, day, day)
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].link_id, link_id);
    assert_eq!(rows[0].name, "Instagram");
    assert_eq!(rows[0].click_count, 2);
    assert_eq!(rows[0].device_analytic.desktop, 1);
    assert_eq!(rows[0].device_analytic.tablet, 1);
}

#[tokio::test]
async fn test_unbound_type_rejected() {
    let (storage, _td) = create_temp_storage().await;
    let user = uuid::Uuid::new_v4().to_string();
    let twitter = seed_type(&storage, "Twitter").await;

    let today = Utc::now().date_naive();
    let result = service(&storage)
        .get_link_analytic(&identity(&user), twitter, today, today)
        .await;

    assert!(matches!(result, Err(LinktallyError::LinkNotRegistered(_))));
}

#[tokio::test]
async fn test_summary_labels_links_by_platform_name() {
    let (storage, _td) = create_temp_storage().await;
    let user = uuid::Uuid::new_v4().to_string();
    let instagram = seed_type(&storage, "Instagram").await;
    let twitter = seed_type(&storage, "Twitter").await;
    let insta_link = seed_link(&storage, &user, instagram).await;
    seed_link(&storage, &user, twitter).await;

    let day = Utc::now().date_naive() - Duration::days(2);
    seed_interaction(&storage, insta_link, UA_DESKTOP, noon(day)).await;

    let summary = service(&storage).get_summary(&identity(&user)).await.unwrap();

    let names: Vec<&str> = summary.links.iter().map(|l| l.name.as_str()).collect();
    assert!(names.contains(&"Instagram"));
    assert!(names.contains(&"Twitter"));

    let insta = summary.links.iter().find(|l| l.name == "Instagram").unwrap();
    assert_eq!(insta.total_click_count, 1);
    assert_eq!(summary.device_analytic.desktop, 1);
}

#[tokio::test]
async fn test_recorder_works_for_social_media_side() {
    let (storage, _td) = create_temp_storage().await;
    let user = uuid::Uuid::new_v4().to_string();
    let instagram = seed_type(&storage, "Instagram").await;
    let link_id = seed_link(&storage, &user, instagram).await;

    let recorder = InteractionRecorder::new(Arc::clone(&storage), Arc::new(SocialMediaRepository));
    recorder
        .record(link_id, "198.51.100.23", UA_DESKTOP)
        .await
        .unwrap();

    let today = Utc::now().date_naive();
    let rows = service(&storage)
        .get_link_analytic(&identity(&user), instagram, today, today)
        .await
        .unwrap();

    assert_eq!(rows[0].click_count, 1);
    assert_eq!(rows[0].device_analytic.desktop, 1);
}
