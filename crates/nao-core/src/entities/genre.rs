//! A genre media can be tagged with.

use crate::entity::Entity;
use crate::types::clean_infos;
use crate::{EntityKind, Id, Info, NaoError, Version};
use serde::{Deserialize, Serialize};

/// A single genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Genre {
    #[serde(rename = "ID", default)]
    pub id: Id,
    #[serde(default)]
    pub names: Vec<Info>,
    #[serde(default)]
    pub descriptions: Vec<Info>,
    #[serde(default)]
    pub version: Version,
}

impl Entity for Genre {
    const KIND: EntityKind = EntityKind::Genre;

    fn id(&self) -> Id {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_identity(&mut self, id: Id, version: Version) {
        self.id = id;
        self.version = version;
    }

    fn normalize(&mut self) -> Result<(), NaoError> {
        clean_infos(&mut self.names);
        clean_infos(&mut self.descriptions);
        Ok(())
    }
}
