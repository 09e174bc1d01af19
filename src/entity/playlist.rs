use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "playlist")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(skip_deserializing)]
    pub id: i32,
    pub name: String,
    /// externally managed user id; user lifecycle lives outside this crate
    pub owner: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::track::Entity> for Entity {
    fn to() -> RelationDef {
        super::playlist_track::Relation::Track.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::playlist_track::Relation::Playlist.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
