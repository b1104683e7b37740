//! 社媒链接侧的仓储适配器
//!
//! selector 语义：社媒类型 id（一个用户对每个平台至多绑定一条链接）。

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder,
};

use crate::device::DeviceCounts;
use crate::errors::{LinktallyError, Result};
use migration::entities::{social_media_analytic, social_media_interaction, social_media_link};

use super::models::{
    DailyAnalytic, Interaction, LinkRef, NewDailyAnalytic, NewInteraction,
};
use super::repository::{DeviceBreakdownStore, LinkAnalyticsRepository, attach_breakdown};

pub struct SocialMediaRepository;

#[async_trait]
impl LinkAnalyticsRepository for SocialMediaRepository {
    async fn find_owned_link(
        &self,
        txn: &DatabaseTransaction,
        selector: i64,
        user_id: &str,
    ) -> Result<Option<LinkRef>> {
        let found = social_media_link::Entity::find()
            .filter(social_media_link::Column::TypeId.eq(selector))
            .filter(social_media_link::Column::UserId.eq(user_id))
            .find_also_related(migration::entities::social_media_type::Entity)
            .one(txn)
            .await
            .map_err(|e| LinktallyError::database_operation(format!("查询社媒链接失败: {}", e)))?;

        Ok(found.map(|(link, media_type)| LinkRef {
            id: link.id,
            name: media_type
                .map(|t| t.name)
                .unwrap_or(link.link_or_username),
        }))
    }

    async fn list_owned_links(
        &self,
        txn: &DatabaseTransaction,
        user_id: &str,
    ) -> Result<Vec<LinkRef>> {
        let rows = social_media_link::Entity::find()
            .filter(social_media_link::Column::UserId.eq(user_id))
            .find_also_related(migration::entities::social_media_type::Entity)
            .order_by_asc(social_media_link::Column::Id)
            .all(txn)
            .await
            .map_err(|e| LinktallyError::database_operation(format!("查询社媒链接失败: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|(link, media_type)| LinkRef {
                id: link.id,
                name: media_type
                    .map(|t| t.name)
                    .unwrap_or(link.link_or_username),
            })
            .collect())
    }

    async fn record_interaction(
        &self,
        txn: &DatabaseTransaction,
        event: NewInteraction,
    ) -> Result<()> {
        let model = social_media_interaction::ActiveModel {
            social_media_link_id: Set(event.link_id),
            client_ip: Set(event.client_ip),
            user_agent: Set(event.user_agent),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        social_media_interaction::Entity::insert(model)
            .exec(txn)
            .await
            .map_err(|e| LinktallyError::database_operation(format!("写入点击事件失败: {}", e)))?;

        Ok(())
    }

    async fn interactions_on(
        &self,
        txn: &DatabaseTransaction,
        link_id: i64,
        day: NaiveDate,
    ) -> Result<Vec<Interaction>> {
        let window_start = day.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let window_end = window_start + Duration::days(1);

        let rows = social_media_interaction::Entity::find()
            .filter(social_media_interaction::Column::SocialMediaLinkId.eq(link_id))
            .filter(social_media_interaction::Column::CreatedAt.gte(window_start))
            .filter(social_media_interaction::Column::CreatedAt.lt(window_end))
            .order_by_asc(social_media_interaction::Column::CreatedAt)
            .all(txn)
            .await
            .map_err(|e| LinktallyError::database_operation(format!("查询点击事件失败: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|m| Interaction {
                id: m.id,
                link_id: m.social_media_link_id,
                client_ip: m.client_ip,
                user_agent: m.user_agent,
                created_at: m.created_at,
            })
            .collect())
    }

    async fn find_daily(
        &self,
        txn: &DatabaseTransaction,
        link_id: i64,
        day: NaiveDate,
    ) -> Result<Option<DailyAnalytic>> {
        let found = social_media_analytic::Entity::find()
            .filter(social_media_analytic::Column::SocialMediaLinkId.eq(link_id))
            .filter(social_media_analytic::Column::Date.eq(day))
            .find_also_related(migration::entities::device_analytic::Entity)
            .one(txn)
            .await
            .map_err(|e| LinktallyError::database_operation(format!("查询日汇总失败: {}", e)))?;

        match found {
            Some((row, breakdown)) => Ok(Some(attach_breakdown(
                row.social_media_link_id,
                row.id,
                row.date,
                row.click_count,
                row.view_count,
                row.created_at,
                row.updated_at,
                breakdown,
            )?)),
            None => Ok(None),
        }
    }

    async fn insert_daily(
        &self,
        txn: &DatabaseTransaction,
        row: NewDailyAnalytic,
    ) -> Result<DailyAnalytic> {
        // 先持久化子记录，父行引用其 id
        let breakdown = DeviceBreakdownStore::create(txn, row.counts).await?;
        let now = Utc::now();

        let model = social_media_analytic::ActiveModel {
            social_media_link_id: Set(row.link_id),
            device_analytic_id: Set(breakdown.id),
            date: Set(row.date),
            click_count: Set(row.click_count),
            view_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let created = social_media_analytic::Entity::insert(model)
            .exec_with_returning(txn)
            .await
            .map_err(|e| LinktallyError::database_operation(format!("创建日汇总失败: {}", e)))?;

        Ok(DailyAnalytic {
            id: created.id,
            link_id: created.social_media_link_id,
            date: created.date,
            click_count: created.click_count,
            view_count: created.view_count,
            breakdown,
            created_at: created.created_at,
            updated_at: created.updated_at,
        })
    }

    async fn update_daily(
        &self,
        txn: &DatabaseTransaction,
        current: &DailyAnalytic,
        click_count: i32,
        counts: DeviceCounts,
    ) -> Result<DailyAnalytic> {
        let breakdown = DeviceBreakdownStore::update(txn, current.breakdown.id, counts).await?;
        let now = Utc::now();

        let model = social_media_analytic::ActiveModel {
            id: Set(current.id),
            social_media_link_id: Set(current.link_id),
            device_analytic_id: Set(breakdown.id),
            date: Set(current.date),
            click_count: Set(click_count),
            view_count: Set(current.view_count),
            created_at: Set(current.created_at),
            updated_at: Set(now),
        };

        social_media_analytic::Entity::update(model)
            .exec(txn)
            .await
            .map_err(|e| LinktallyError::database_operation(format!("更新日汇总失败: {}", e)))?;

        Ok(DailyAnalytic {
            id: current.id,
            link_id: current.link_id,
            date: current.date,
            click_count,
            view_count: current.view_count,
            breakdown,
            created_at: current.created_at,
            updated_at: now,
        })
    }
}
