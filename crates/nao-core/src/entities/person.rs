//! A real person: staff, cast, authors.

use crate::entity::Entity;
use crate::types::clean_infos;
use crate::{EntityKind, Id, Info, NaoError, Version};
use serde::{Deserialize, Serialize};

/// A single person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Person {
    #[serde(rename = "ID", default)]
    pub id: Id,
    #[serde(default)]
    pub names: Vec<Info>,
    #[serde(default)]
    pub information: Vec<Info>,
    #[serde(default)]
    pub version: Version,
}

impl Entity for Person {
    const KIND: EntityKind = EntityKind::Person;

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
        clean_infos(&mut self.information);
        Ok(())
    }
}
