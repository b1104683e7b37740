//! 初始表结构迁移
//!
//! 创建分析引擎依赖的全部表：
//! - 链接表（social_media_links / custom_links）及社媒类型表
//! - 点击事件表（*_interactions，append-only）
//! - 日汇总表（*_analytics）与设备分布子表（device_analytics）

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 社媒类型表
        manager
            .create_table(
                Table::create()
                    .table(SocialMediaTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SocialMediaTypes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SocialMediaTypes::Name)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // 社媒链接表
        manager
            .create_table(
                Table::create()
                    .table(SocialMediaLinks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SocialMediaLinks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SocialMediaLinks::UserId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SocialMediaLinks::TypeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SocialMediaLinks::LinkOrUsername)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SocialMediaLinks::Activate)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(SocialMediaLinks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_social_media_links_type")
                            .from(SocialMediaLinks::Table, SocialMediaLinks::TypeId)
                            .to(SocialMediaTypes::Table, SocialMediaTypes::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 自定义短链接表
        manager
            .create_table(
                Table::create()
                    .table(CustomLinks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CustomLinks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CustomLinks::UserId).string_len(36).not_null())
                    .col(ColumnDef::new(CustomLinks::Title).string_len(255).not_null())
                    .col(
                        ColumnDef::new(CustomLinks::ShortCode)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(CustomLinks::LongLink).text().not_null())
                    .col(
                        ColumnDef::new(CustomLinks::Activate)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(CustomLinks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 点击事件表（两种链接各一张，结构平行）
        manager
            .create_table(
                Table::create()
                    .table(SocialMediaInteractions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SocialMediaInteractions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SocialMediaInteractions::SocialMediaLinkId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SocialMediaInteractions::ClientIp)
                            .string_len(45)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SocialMediaInteractions::UserAgent)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SocialMediaInteractions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CustomLinkInteractions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CustomLinkInteractions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CustomLinkInteractions::CustomLinkId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CustomLinkInteractions::ClientIp)
                            .string_len(45)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CustomLinkInteractions::UserAgent)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CustomLinkInteractions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 设备分布子表
        manager
            .create_table(
                Table::create()
                    .table(DeviceAnalytics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeviceAnalytics::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DeviceAnalytics::Desktop)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DeviceAnalytics::Mobile)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DeviceAnalytics::Tablet)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DeviceAnalytics::Other)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // 日汇总表（两种链接各一张）
        manager
            .create_table(
                Table::create()
                    .table(SocialMediaAnalytics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SocialMediaAnalytics::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SocialMediaAnalytics::SocialMediaLinkId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SocialMediaAnalytics::DeviceAnalyticId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SocialMediaAnalytics::Date).date().not_null())
                    .col(
                        ColumnDef::new(SocialMediaAnalytics::ClickCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SocialMediaAnalytics::ViewCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SocialMediaAnalytics::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SocialMediaAnalytics::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_social_media_analytics_device")
                            .from(
                                SocialMediaAnalytics::Table,
                                SocialMediaAnalytics::DeviceAnalyticId,
                            )
                            .to(DeviceAnalytics::Table, DeviceAnalytics::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CustomLinkAnalytics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CustomLinkAnalytics::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CustomLinkAnalytics::CustomLinkId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CustomLinkAnalytics::DeviceAnalyticId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CustomLinkAnalytics::Date).date().not_null())
                    .col(
                        ColumnDef::new(CustomLinkAnalytics::ClickCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CustomLinkAnalytics::ViewCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CustomLinkAnalytics::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CustomLinkAnalytics::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_custom_link_analytics_device")
                            .from(
                                CustomLinkAnalytics::Table,
                                CustomLinkAnalytics::DeviceAnalyticId,
                            )
                            .to(DeviceAnalytics::Table, DeviceAnalytics::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 依赖顺序反向删除
        manager
            .drop_table(Table::drop().table(CustomLinkAnalytics::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SocialMediaAnalytics::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DeviceAnalytics::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CustomLinkInteractions::Table).to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(SocialMediaInteractions::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(CustomLinks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SocialMediaLinks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SocialMediaTypes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SocialMediaTypes {
    #[sea_orm(iden = "social_media_types")]
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum SocialMediaLinks {
    #[sea_orm(iden = "social_media_links")]
    Table,
    Id,
    UserId,
    TypeId,
    LinkOrUsername,
    Activate,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CustomLinks {
    #[sea_orm(iden = "custom_links")]
    Table,
    Id,
    UserId,
    Title,
    ShortCode,
    LongLink,
    Activate,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SocialMediaInteractions {
    #[sea_orm(iden = "social_media_interactions")]
    Table,
    Id,
    SocialMediaLinkId,
    ClientIp,
    UserAgent,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CustomLinkInteractions {
    #[sea_orm(iden = "custom_link_interactions")]
    Table,
    Id,
    CustomLinkId,
    ClientIp,
    UserAgent,
    CreatedAt,
}

#[derive(DeriveIden)]
enum DeviceAnalytics {
    #[sea_orm(iden = "device_analytics")]
    Table,
    Id,
    Desktop,
    Mobile,
    Tablet,
    Other,
}

#[derive(DeriveIden)]
enum SocialMediaAnalytics {
    #[sea_orm(iden = "social_media_analytics")]
    Table,
    Id,
    SocialMediaLinkId,
    DeviceAnalyticId,
    Date,
    ClickCount,
    ViewCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CustomLinkAnalytics {
    #[sea_orm(iden = "custom_link_analytics")]
    Table,
    Id,
    CustomLinkId,
    DeviceAnalyticId,
    Date,
    ClickCount,
    ViewCount,
    CreatedAt,
    UpdatedAt,
}
