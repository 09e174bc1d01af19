use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gender")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(skip_deserializing)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::track::Entity> for Entity {
    fn to() -> RelationDef {
        super::track_gender::Relation::Track.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::track_gender::Relation::Gender.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
