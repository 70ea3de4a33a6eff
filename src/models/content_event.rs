use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One tracked interaction with a content item, reported by a fan site
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "content_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub content_id: i32,
    pub event_type: String, // 'view', 'like', 'share', 'comment', 'click'
    pub source: String,     // traffic channel: 'youtube', 'twitter', 'direct', ...
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::content::Entity",
        from = "Column::ContentId",
        to = "super::content::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Content,
}

impl Related<super::content::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Content.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub const EVENT_VIEW: &str = "view";

pub const EVENT_TYPES: &[&str] = &["view", "like", "share", "comment", "click"];

pub fn is_known_event_type(event_type: &str) -> bool {
    EVENT_TYPES.contains(&event_type)
}
