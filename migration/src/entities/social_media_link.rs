//! 用户绑定的社交媒体链接实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "social_media_links")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: String,
    pub type_id: i64,
    pub link_or_username: String,
    pub activate: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::social_media_type::Entity",
        from = "Column::TypeId",
        to = "super::social_media_type::Column::Id"
    )]
    SocialMediaType,
}

impl Related<super::social_media_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SocialMediaType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
