//! 设备分布实体，每行归属于唯一一条日汇总记录

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "device_analytics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub desktop: i32,
    pub mobile: i32,
    pub tablet: i32,
    pub other: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
