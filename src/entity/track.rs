use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "track")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(skip_deserializing)]
    pub id: i32,
    /// audio file path, relative to the upload root
    pub file: String,
    pub name: String,
    /// playback length in whole seconds, recomputed from `file` on every save
    pub duration: Option<u32>,
    /// set once when the upload is first persisted
    pub upload_date: DateTimeUtc,
    pub album_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::album::Entity",
        from = "Column::AlbumId",
        to = "super::album::Column::Id",
        on_delete = "Restrict"
    )]
    Album,
}

impl Related<super::album::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Album.def()
    }
}

impl Related<super::artist::Entity> for Entity {
    fn to() -> RelationDef {
        super::track_artist::Relation::Artist.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::track_artist::Relation::Track.def().rev())
    }
}

impl Related<super::gender::Entity> for Entity {
    fn to() -> RelationDef {
        super::track_gender::Relation::Gender.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::track_gender::Relation::Track.def().rev())
    }
}

impl Related<super::playlist::Entity> for Entity {
    fn to() -> RelationDef {
        super::playlist_track::Relation::Playlist.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::playlist_track::Relation::Track.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
