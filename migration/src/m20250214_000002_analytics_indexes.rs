//! 分析查询索引
//!
//! - 点击事件表的 (link_id, created_at) 复合索引，服务日窗口扫描
//! - 日汇总表的 (link_id, date) 唯一索引，保证每 (链接, 日期) 至多一行
//! - 链接表的 user_id 索引，服务汇总路径的归属查询

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_social_media_interactions_link_time")
                    .table(SocialMediaInteractions::Table)
                    .col(SocialMediaInteractions::SocialMediaLinkId)
                    .col(SocialMediaInteractions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_custom_link_interactions_link_time")
                    .table(CustomLinkInteractions::Table)
                    .col(CustomLinkInteractions::CustomLinkId)
                    .col(CustomLinkInteractions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // 唯一索引同时兜住并发首读双写的竞态：
        // 后提交的事务会得到唯一约束冲突而不是产生第二行
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uniq_social_media_analytics_link_date")
                    .table(SocialMediaAnalytics::Table)
                    .col(SocialMediaAnalytics::SocialMediaLinkId)
                    .col(SocialMediaAnalytics::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uniq_custom_link_analytics_link_date")
                    .table(CustomLinkAnalytics::Table)
                    .col(CustomLinkAnalytics::CustomLinkId)
                    .col(CustomLinkAnalytics::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_social_media_links_user")
                    .table(SocialMediaLinks::Table)
                    .col(SocialMediaLinks::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_custom_links_user")
                    .table(CustomLinks::Table)
                    .col(CustomLinks::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_custom_links_user").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_social_media_links_user").to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("uniq_custom_link_analytics_link_date")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("uniq_social_media_analytics_link_date")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_custom_link_interactions_link_time")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_social_media_interactions_link_time")
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum SocialMediaInteractions {
    #[sea_orm(iden = "social_media_interactions")]
    Table,
    SocialMediaLinkId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CustomLinkInteractions {
    #[sea_orm(iden = "custom_link_interactions")]
    Table,
    CustomLinkId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SocialMediaAnalytics {
    #[sea_orm(iden = "social_media_analytics")]
    Table,
    SocialMediaLinkId,
    Date,
}

#[derive(DeriveIden)]
enum CustomLinkAnalytics {
    #[sea_orm(iden = "custom_link_analytics")]
    Table,
    CustomLinkId,
    Date,
}

#[derive(DeriveIden)]
enum SocialMediaLinks {
    #[sea_orm(iden = "social_media_links")]
    Table,
    UserId,
}

#[derive(DeriveIden)]
enum CustomLinks {
    #[sea_orm(iden = "custom_links")]
    Table,
    UserId,
}
