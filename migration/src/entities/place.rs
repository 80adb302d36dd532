use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "places")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub address: String,
    pub category: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::place_image::Entity")]
    PlaceImage,
    #[sea_orm(has_many = "super::place_comment::Entity")]
    PlaceComment,
    #[sea_orm(has_many = "super::place_like::Entity")]
    PlaceLike,
    #[sea_orm(has_many = "super::place_bookmark::Entity")]
    PlaceBookmark,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::place_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlaceImage.def()
    }
}

impl Related<super::place_comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlaceComment.def()
    }
}

impl Related<super::place_like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlaceLike.def()
    }
}

impl Related<super::place_bookmark::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlaceBookmark.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
