//! Storage-facing domain models
//!
//! Plain structs decoupled from the sea-orm entity types; the repository
//! adapters convert at the boundary.

use chrono::{DateTime, NaiveDate, Utc};

use crate::device::DeviceCounts;

/// 已解析的调用者身份（由外部鉴权层解出，这里不接触原始凭证）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: String,
    pub username: String,
}

/// 一条归属某用户的链接（社媒链接或自定义短链接）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    pub id: i64,
    /// 社媒链接为平台名，自定义链接为标题
    pub name: String,
}

/// 一次点击事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    pub id: i64,
    pub link_id: i64,
    pub client_ip: String,
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
}

/// 待写入的点击事件（时间戳由存储层分配）
#[derive(Debug, Clone)]
pub struct NewInteraction {
    pub link_id: i64,
    pub client_ip: String,
    pub user_agent: String,
}

/// 持久化的设备分布子记录
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceBreakdown {
    pub id: i64,
    pub desktop: i32,
    pub mobile: i32,
    pub tablet: i32,
    pub other: i32,
}

/// 一条 (链接, 日期) 日汇总记录，携带其独占的设备分布
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyAnalytic {
    pub id: i64,
    pub link_id: i64,
    pub date: NaiveDate,
    pub click_count: i32,
    /// 预留字段：持久化并对外返回，但没有任何从点击事件派生它的路径
    pub view_count: i32,
    pub breakdown: DeviceBreakdown,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 待创建的日汇总记录
#[derive(Debug, Clone)]
pub struct NewDailyAnalytic {
    pub link_id: i64,
    pub date: NaiveDate,
    pub click_count: i32,
    pub counts: DeviceCounts,
}
