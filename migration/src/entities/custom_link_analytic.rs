//! 自定义短链接日汇总实体
//!
//! 结构与 social_media_analytic 平行，算法共用。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "custom_link_analytics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub custom_link_id: i64,
    pub device_analytic_id: i64,
    pub date: Date,
    pub click_count: i32,
    pub view_count: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::device_analytic::Entity",
        from = "Column::DeviceAnalyticId",
        to = "super::device_analytic::Column::Id"
    )]
    DeviceAnalytic,
}

impl Related<super::device_analytic::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeviceAnalytic.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
