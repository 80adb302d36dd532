use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 places 表
        manager
            .create_table(
                Table::create()
                    .table(Place::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Place::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Place::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Place::Title).string().not_null())
                    .col(ColumnDef::new(Place::Address).text().not_null())
                    .col(ColumnDef::new(Place::Category).string().not_null())
                    .col(ColumnDef::new(Place::Content).text().null())
                    .col(
                        ColumnDef::new(Place::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Place::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_places_user")
                            .from(Place::Table, Place::UserId)
                            .to(User::Table, User::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_places_category")
                    .table(Place::Table)
                    .col(Place::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_places_created_at")
                    .table(Place::Table)
                    .col(Place::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // 创建 place_images 表
        manager
            .create_table(
                Table::create()
                    .table(PlaceImage::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlaceImage::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PlaceImage::PlaceId).big_integer().not_null())
                    .col(ColumnDef::new(PlaceImage::Image).text().not_null())
                    .col(
                        ColumnDef::new(PlaceImage::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_place_images_place")
                            .from(PlaceImage::Table, PlaceImage::PlaceId)
                            .to(Place::Table, Place::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_place_images_place")
                    .table(PlaceImage::Table)
                    .col(PlaceImage::PlaceId)
                    .to_owned(),
            )
            .await?;

        // 创建 place_comments 表（自引用，最多一层回复）
        manager
            .create_table(
                Table::create()
                    .table(PlaceComment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlaceComment::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PlaceComment::PlaceId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PlaceComment::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PlaceComment::ParentId).big_integer().null())
                    .col(
                        ColumnDef::new(PlaceComment::Depth)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(PlaceComment::Content).text().null())
                    .col(
                        ColumnDef::new(PlaceComment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PlaceComment::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_place_comments_place")
                            .from(PlaceComment::Table, PlaceComment::PlaceId)
                            .to(Place::Table, Place::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_place_comments_parent")
                            .from(PlaceComment::Table, PlaceComment::ParentId)
                            .to(PlaceComment::Table, PlaceComment::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_place_comments_place")
                    .table(PlaceComment::Table)
                    .col(PlaceComment::PlaceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_place_comments_parent")
                    .table(PlaceComment::Table)
                    .col(PlaceComment::ParentId)
                    .to_owned(),
            )
            .await?;

        // 创建 place_likes / place_bookmarks 表（成员关系，唯一约束保证幂等切换）
        for (table, fk_place, fk_user, uniq) in [
            (
                PlaceLike::Table.into_iden(),
                "fk_place_likes_place",
                "fk_place_likes_user",
                "uniq_place_likes_place_user",
            ),
            (
                PlaceBookmark::Table.into_iden(),
                "fk_place_bookmarks_place",
                "fk_place_bookmarks_user",
                "uniq_place_bookmarks_place_user",
            ),
        ] {
            manager
                .create_table(
                    Table::create()
                        .table(table.clone())
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Membership::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Membership::PlaceId).big_integer().not_null())
                        .col(ColumnDef::new(Membership::UserId).big_integer().not_null())
                        .col(
                            ColumnDef::new(Membership::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name(fk_place)
                                .from(table.clone(), Membership::PlaceId)
                                .to(Place::Table, Place::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name(fk_user)
                                .from(table.clone(), Membership::UserId)
                                .to(User::Table, User::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(uniq)
                        .table(table.clone())
                        .col(Membership::PlaceId)
                        .col(Membership::UserId)
                        .unique()
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PlaceBookmark::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PlaceLike::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PlaceComment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PlaceImage::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Place::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum User {
    #[sea_orm(iden = "users")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Place {
    #[sea_orm(iden = "places")]
    Table,
    Id,
    UserId,
    Title,
    Address,
    Category,
    Content,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PlaceImage {
    #[sea_orm(iden = "place_images")]
    Table,
    Id,
    PlaceId,
    Image,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PlaceComment {
    #[sea_orm(iden = "place_comments")]
    Table,
    Id,
    PlaceId,
    UserId,
    ParentId,
    Depth,
    Content,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PlaceLike {
    #[sea_orm(iden = "place_likes")]
    Table,
}

#[derive(DeriveIden)]
enum PlaceBookmark {
    #[sea_orm(iden = "place_bookmarks")]
    Table,
}

/// like/bookmark 两张表结构一致，列定义共用
#[derive(DeriveIden)]
enum Membership {
    Id,
    PlaceId,
    UserId,
    CreatedAt,
}
