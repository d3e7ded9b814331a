//! Junction between a media and a producer that worked on it.

use crate::entity::{Entity, ensure_exists};
use crate::service::Service;
use crate::storage::Snapshot;
use crate::types::trim_in_place;
use crate::{EntityKind, Id, NaoError, Version};
use serde::{Deserialize, Serialize};

/// A producer's involvement in a media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct MediaProducer {
    #[serde(rename = "ID", default)]
    pub id: Id,
    #[serde(rename = "MediaID")]
    pub media_id: Id,
    #[serde(rename = "ProducerID")]
    pub producer_id: Id,
    /// What the producer did, e.g. `Studio`.
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub version: Version,
}

impl Entity for MediaProducer {
    const KIND: EntityKind = EntityKind::MediaProducer;

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
        trim_in_place(&mut self.role);
        Ok(())
    }

    fn validate(&self, snapshot: &dyn Snapshot) -> Result<(), NaoError> {
        ensure_exists(snapshot, Self::KIND, "MediaID", EntityKind::Media, self.media_id)?;
        ensure_exists(
            snapshot,
            Self::KIND,
            "ProducerID",
            EntityKind::Producer,
            self.producer_id,
        )
    }
}

impl Service<MediaProducer> {
    /// Producers credited on the given media.
    pub fn get_by_media(&self, media: Id) -> Result<Vec<MediaProducer>, NaoError> {
        self.get_filter(|mp| mp.media_id == media)
    }

    /// Media the given producer is credited on.
    pub fn get_by_producer(&self, producer: Id) -> Result<Vec<MediaProducer>, NaoError> {
        self.get_filter(|mp| mp.producer_id == producer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::tests::Present;

    #[test]
    fn both_sides_must_exist() {
        let mp = MediaProducer {
            media_id: Id(1),
            producer_id: Id(99),
            ..MediaProducer::default()
        };

        let only_media = Present(vec![(EntityKind::Media, Id(1))]);
        assert!(matches!(
            mp.validate(&only_media),
            Err(NaoError::MissingReference {
                field: "ProducerID",
                id: Id(99),
                ..
            })
        ));

        let only_producer = Present(vec![(EntityKind::Producer, Id(99))]);
        assert!(matches!(
            mp.validate(&only_producer),
            Err(NaoError::MissingReference {
                field: "MediaID",
                ..
            })
        ));

        let both = Present(vec![
            (EntityKind::Media, Id(1)),
            (EntityKind::Producer, Id(99)),
        ]);
        mp.validate(&both).expect("both present");
    }

    #[test]
    fn json_matches_record_layout() {
        let mp = MediaProducer {
            id: Id(2),
            media_id: Id(1),
            producer_id: Id(3),
            role: "Studio".to_string(),
            version: Version(4),
        };
        let value: serde_json::Value =
            serde_json::from_slice(&mp.encode().expect("encode")).expect("json");
        assert_eq!(
            value,
            serde_json::json!({
                "ID": 2,
                "MediaID": 1,
                "ProducerID": 3,
                "Role": "Studio",
                "Version": 4
            })
        );
    }
}
