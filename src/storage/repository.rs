//! Repository seam for the two link families
//!
//! The staleness algorithm is written once against
//! [`LinkAnalyticsRepository`]; `SocialMediaRepository` and
//! `CustomLinkRepository` adapt it to their entity tables. What the
//! `selector` argument means is adapter-defined: the social-media adapter
//! resolves it as a social-media *type* id per owner, the custom-link
//! adapter as the link id itself.
//!
//! All methods run inside the caller's transaction.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveValue::Set, DatabaseTransaction, EntityTrait};

use crate::device::DeviceCounts;
use crate::errors::{LinktallyError, Result};
use migration::entities::device_analytic;

use super::models::{
    DailyAnalytic, DeviceBreakdown, Interaction, LinkRef, NewDailyAnalytic, NewInteraction,
};

#[async_trait]
pub trait LinkAnalyticsRepository: Send + Sync {
    /// 按 selector + 归属用户查找链接；不存在或不属于该用户返回 None
    async fn find_owned_link(
        &self,
        txn: &DatabaseTransaction,
        selector: i64,
        user_id: &str,
    ) -> Result<Option<LinkRef>>;

    /// 列出某用户的全部链接（汇总路径）
    async fn list_owned_links(
        &self,
        txn: &DatabaseTransaction,
        user_id: &str,
    ) -> Result<Vec<LinkRef>>;

    /// 追加一条点击事件，时间戳由存储层分配
    async fn record_interaction(
        &self,
        txn: &DatabaseTransaction,
        event: NewInteraction,
    ) -> Result<()>;

    /// 返回某链接在 [day, day+24h) 窗口内的全部点击事件
    async fn interactions_on(
        &self,
        txn: &DatabaseTransaction,
        link_id: i64,
        day: NaiveDate,
    ) -> Result<Vec<Interaction>>;

    /// 点查 (link, day) 日汇总行，连同其设备分布
    async fn find_daily(
        &self,
        txn: &DatabaseTransaction,
        link_id: i64,
        day: NaiveDate,
    ) -> Result<Option<DailyAnalytic>>;

    /// 先持久化设备分布子记录，再创建引用它的日汇总行
    async fn insert_daily(
        &self,
        txn: &DatabaseTransaction,
        row: NewDailyAnalytic,
    ) -> Result<DailyAnalytic>;

    /// 重算后的全量替换：按原 id 更新设备分布，再更新父行的
    /// click_count 与 updated_at；身份、创建时间与 view_count 保持不变
    async fn update_daily(
        &self,
        txn: &DatabaseTransaction,
        current: &DailyAnalytic,
        click_count: i32,
        counts: DeviceCounts,
    ) -> Result<DailyAnalytic>;
}

/// 设备分布子表操作，两个适配器共用
pub struct DeviceBreakdownStore;

impl DeviceBreakdownStore {
    pub async fn create(txn: &DatabaseTransaction, counts: DeviceCounts) -> Result<DeviceBreakdown> {
        let model = device_analytic::ActiveModel {
            desktop: Set(counts.desktop),
            mobile: Set(counts.mobile),
            tablet: Set(counts.tablet),
            other: Set(counts.other),
            ..Default::default()
        };

        let created = device_analytic::Entity::insert(model)
            .exec_with_returning(txn)
            .await
            .map_err(|e| {
                LinktallyError::database_operation(format!("创建设备分布记录失败: {}", e))
            })?;

        Ok(DeviceBreakdown {
            id: created.id,
            desktop: created.desktop,
            mobile: created.mobile,
            tablet: created.tablet,
            other: created.other,
        })
    }

    pub async fn update(
        txn: &DatabaseTransaction,
        id: i64,
        counts: DeviceCounts,
    ) -> Result<DeviceBreakdown> {
        let model = device_analytic::ActiveModel {
            id: Set(id),
            desktop: Set(counts.desktop),
            mobile: Set(counts.mobile),
            tablet: Set(counts.tablet),
            other: Set(counts.other),
        };

        device_analytic::Entity::update(model)
            .exec(txn)
            .await
            .map_err(|e| {
                LinktallyError::database_operation(format!("更新设备分布记录失败: {}", e))
            })?;

        Ok(DeviceBreakdown {
            id,
            desktop: counts.desktop,
            mobile: counts.mobile,
            tablet: counts.tablet,
            other: counts.other,
        })
    }
}

/// 组装日汇总行并校验 1:1 子记录存在
pub(crate) fn attach_breakdown(
    link_id: i64,
    id: i64,
    date: NaiveDate,
    click_count: i32,
    view_count: i32,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
    breakdown: Option<device_analytic::Model>,
) -> Result<DailyAnalytic> {
    let breakdown = breakdown.ok_or_else(|| {
        LinktallyError::database_operation(format!(
            "日汇总行 {} 缺少设备分布子记录（数据不一致）",
            id
        ))
    })?;

    Ok(DailyAnalytic {
        id,
        link_id,
        date,
        click_count,
        view_count,
        breakdown: DeviceBreakdown {
            id: breakdown.id,
            desktop: breakdown.desktop,
            mobile: breakdown.mobile,
            tablet: breakdown.tablet,
            other: breakdown.other,
        },
        created_at,
        updated_at,
    })
}
