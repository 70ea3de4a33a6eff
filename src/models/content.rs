use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "content")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub content_type: ContentType,
    /// Persona the item belongs to
    #[serde(rename = "character")]
    pub character_name: String,
    pub url: Option<String>,
    pub published_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::content_event::Entity")]
    ContentEvent,
}

impl Related<super::content_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContentEvent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    #[sea_orm(string_value = "VIDEO")]
    Video,
    #[sea_orm(string_value = "MUSIC")]
    Music,
    #[sea_orm(string_value = "ARTICLE")]
    Article,
    #[sea_orm(string_value = "STREAM")]
    Stream,
    #[sea_orm(string_value = "TOOL")]
    Tool,
    #[sea_orm(string_value = "TUTORIAL")]
    Tutorial,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Video => "VIDEO",
            ContentType::Music => "MUSIC",
            ContentType::Article => "ARTICLE",
            ContentType::Stream => "STREAM",
            ContentType::Tool => "TOOL",
            ContentType::Tutorial => "TUTORIAL",
        }
    }
}
