use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 哈希；社交登录账号没有本地密码
    pub password: Option<String>,
    pub nickname: String,
    #[sea_orm(unique)]
    pub phone: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub created_at: DateTimeUtc,
    pub last_login: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::place::Entity")]
    Place,
    #[sea_orm(has_one = "super::profile::Entity")]
    Profile,
    #[sea_orm(has_many = "super::profile_image::Entity")]
    ProfileImage,
}

impl Related<super::place::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Place.def()
    }
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<super::profile_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProfileImage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
