use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 friend_requests 表
        manager
            .create_table(
                Table::create()
                    .table(FriendRequest::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FriendRequest::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FriendRequest::FromUserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FriendRequest::ToUserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FriendRequest::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(FriendRequest::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FriendRequest::RespondedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_friend_requests_from")
                            .from(FriendRequest::Table, FriendRequest::FromUserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_friend_requests_to")
                            .from(FriendRequest::Table, FriendRequest::ToUserId)
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
                    .name("idx_friend_requests_from")
                    .table(FriendRequest::Table)
                    .col(FriendRequest::FromUserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_friend_requests_to")
                    .table(FriendRequest::Table)
                    .col(FriendRequest::ToUserId)
                    .to_owned(),
            )
            .await?;

        // 创建 phone_verifications 表
        manager
            .create_table(
                Table::create()
                    .table(PhoneVerification::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PhoneVerification::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PhoneVerification::Phone)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PhoneVerification::Code).string().not_null())
                    .col(
                        ColumnDef::new(PhoneVerification::Purpose)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PhoneVerification::Verified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PhoneVerification::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PhoneVerification::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_phone_verifications_phone")
                    .table(PhoneVerification::Table)
                    .col(PhoneVerification::Phone)
                    .to_owned(),
            )
            .await?;

        // 创建 user_reports 表
        manager
            .create_table(
                Table::create()
                    .table(UserReport::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserReport::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserReport::ReporterId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserReport::ReportedId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserReport::Reason).text().not_null())
                    .col(
                        ColumnDef::new(UserReport::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_reports_reporter")
                            .from(UserReport::Table, UserReport::ReporterId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_reports_reported")
                            .from(UserReport::Table, UserReport::ReportedId)
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
                    .name("uniq_user_reports_pair")
                    .table(UserReport::Table)
                    .col(UserReport::ReporterId)
                    .col(UserReport::ReportedId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserReport::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PhoneVerification::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FriendRequest::Table).to_owned())
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
enum FriendRequest {
    #[sea_orm(iden = "friend_requests")]
    Table,
    Id,
    FromUserId,
    ToUserId,
    Status,
    CreatedAt,
    RespondedAt,
}

#[derive(DeriveIden)]
enum PhoneVerification {
    #[sea_orm(iden = "phone_verifications")]
    Table,
    Id,
    Phone,
    Code,
    Purpose,
    Verified,
    ExpiresAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UserReport {
    #[sea_orm(iden = "user_reports")]
    Table,
    Id,
    ReporterId,
    ReportedId,
    Reason,
    CreatedAt,
}
