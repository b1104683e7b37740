//! 分析接口的响应结构
//!
//! 既是对外返回的 JSON 形状，也是响应缓存的序列化格式，
//! 因此统一派生 Serialize + Deserialize。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::device::DeviceCounts;
use crate::storage::{DailyAnalytic, DeviceBreakdown, LinkRef};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceBreakdownResponse {
    pub mobile: i32,
    pub tablet: i32,
    pub desktop: i32,
    pub other: i32,
}

impl From<&DeviceBreakdown> for DeviceBreakdownResponse {
    fn from(b: &DeviceBreakdown) -> Self {
        Self {
            mobile: b.mobile,
            tablet: b.tablet,
            desktop: b.desktop,
            other: b.other,
        }
    }
}

impl From<DeviceCounts> for DeviceBreakdownResponse {
    fn from(c: DeviceCounts) -> Self {
        Self {
            mobile: c.mobile,
            tablet: c.tablet,
            desktop: c.desktop,
            other: c.other,
        }
    }
}

/// 单日明细响应，一天一条
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAnalyticResponse {
    pub link_id: i64,
    pub name: String,
    pub click_count: i32,
    pub view_count: i32,
    pub device_analytic: DeviceBreakdownResponse,
    /// YYYY-MM-DD
    pub date: String,
    pub last_updated: DateTime<Utc>,
}

impl DailyAnalyticResponse {
    pub(crate) fn from_row(link: &LinkRef, row: &DailyAnalytic) -> Self {
        Self {
            link_id: row.link_id,
            name: link.name.clone(),
            click_count: row.click_count,
            view_count: row.view_count,
            device_analytic: DeviceBreakdownResponse::from(&row.breakdown),
            date: row.date.format("%Y-%m-%d").to_string(),
            last_updated: row.updated_at,
        }
    }
}

/// 汇总响应中的单链接累计
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTotalsResponse {
    pub name: String,
    pub total_click_count: i64,
    pub total_view_count: i64,
}

/// 30 天滚动窗口的汇总响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticSummaryResponse {
    pub links: Vec<LinkTotalsResponse>,
    pub device_analytic: DeviceBreakdownResponse,
    pub last_updated: DateTime<Utc>,
}
