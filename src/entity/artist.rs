use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "artist")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(skip_deserializing)]
    pub id: i32,
    pub alias: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Model {
    /// Name an artist goes by: the alias when there is one, the first name
    /// otherwise. Defined for every artist, though both may be absent.
    pub fn display_name(&self) -> Option<&str> {
        self.alias.as_deref().or(self.first_name.as_deref())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::track::Entity> for Entity {
    fn to() -> RelationDef {
        super::track_artist::Relation::Track.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::track_artist::Relation::Artist.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    fn artist(alias: Option<&str>, first_name: Option<&str>) -> Model {
        Model {
            id: 0,
            alias: alias.map(Into::into),
            first_name: first_name.map(Into::into),
            last_name: None,
        }
    }

    #[test]
    fn alias_wins_over_first_name() {
        let a = artist(Some("MF DOOM"), Some("Daniel"));
        assert_eq!(a.display_name(), Some("MF DOOM"));
    }

    #[test]
    fn falls_back_to_first_name() {
        assert_eq!(artist(None, Some("Daniel")).display_name(), Some("Daniel"));
        assert_eq!(artist(None, None).display_name(), None);
    }
}
