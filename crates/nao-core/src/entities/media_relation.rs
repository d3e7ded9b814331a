//! Directed relation between two media, e.g. a sequel or an adaptation.

use crate::entity::{Entity, ensure_exists};
use crate::service::Service;
use crate::storage::Snapshot;
use crate::types::trim_in_place;
use crate::{EntityKind, Id, NaoError, Version};
use serde::{Deserialize, Serialize};

/// `Owner` is `Relationship` of `Related`, e.g. Owner is "Sequel" of Related.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct MediaRelation {
    #[serde(rename = "ID", default)]
    pub id: Id,
    #[serde(rename = "OwnerID")]
    pub owner_id: Id,
    #[serde(rename = "RelatedID")]
    pub related_id: Id,
    pub relationship: String,
    #[serde(default)]
    pub version: Version,
}

impl Entity for MediaRelation {
    const KIND: EntityKind = EntityKind::MediaRelation;

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
        trim_in_place(&mut self.relationship);
        Ok(())
    }

    fn validate(&self, snapshot: &dyn Snapshot) -> Result<(), NaoError> {
        if self.relationship.is_empty() {
            return Err(Self::invalid("Relationship must not be empty"));
        }
        if self.owner_id == self.related_id {
            return Err(Self::invalid(format!(
                "media {} cannot be related to itself",
                self.owner_id
            )));
        }
        ensure_exists(snapshot, Self::KIND, "OwnerID", EntityKind::Media, self.owner_id)?;
        ensure_exists(
            snapshot,
            Self::KIND,
            "RelatedID",
            EntityKind::Media,
            self.related_id,
        )
    }
}

impl Service<MediaRelation> {
    /// Relations owned by the given media.
    pub fn get_by_owner(&self, media: Id) -> Result<Vec<MediaRelation>, NaoError> {
        self.get_filter(|mr| mr.owner_id == media)
    }

    /// Relations pointing at the given media.
    pub fn get_by_related(&self, media: Id) -> Result<Vec<MediaRelation>, NaoError> {
        self.get_filter(|mr| mr.related_id == media)
    }

    /// Relations of exactly this kind, e.g. every "Sequel".
    pub fn get_by_relationship(&self, relationship: &str) -> Result<Vec<MediaRelation>, NaoError> {
        self.get_filter(|mr| mr.relationship == relationship)
    }
}
