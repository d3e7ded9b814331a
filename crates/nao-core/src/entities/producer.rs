//! A studio, publisher, licensor or other producing organisation.

use crate::entity::Entity;
use crate::types::{clean_infos, trim_in_place};
use crate::{EntityKind, Id, Info, NaoError, Version};
use serde::{Deserialize, Serialize};

/// A single producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Producer {
    #[serde(rename = "ID", default)]
    pub id: Id,
    #[serde(default)]
    pub titles: Vec<Info>,
    /// What the producer does, e.g. `Studio` or `Licensor`.
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub version: Version,
}

impl Entity for Producer {
    const KIND: EntityKind = EntityKind::Producer;

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
        clean_infos(&mut self.titles);
        for kind in &mut self.types {
            trim_in_place(kind);
        }
        self.types.retain(|kind| !kind.is_empty());
        let mut seen = Vec::with_capacity(self.types.len());
        self.types.retain(|kind| {
            if seen.contains(kind) {
                false
            } else {
                seen.push(kind.clone());
                true
            }
        });
        Ok(())
    }
}
