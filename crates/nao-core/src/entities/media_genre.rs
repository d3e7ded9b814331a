//! Junction tagging a media with a genre.

use crate::entity::{Entity, ensure_exists};
use crate::service::Service;
use crate::storage::Snapshot;
use crate::{EntityKind, Id, NaoError, Version};
use serde::{Deserialize, Serialize};

/// A genre tag on a media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct MediaGenre {
    #[serde(rename = "ID", default)]
    pub id: Id,
    #[serde(rename = "MediaID")]
    pub media_id: Id,
    #[serde(rename = "GenreID")]
    pub genre_id: Id,
    #[serde(default)]
    pub version: Version,
}

impl Entity for MediaGenre {
    const KIND: EntityKind = EntityKind::MediaGenre;

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

    fn validate(&self, snapshot: &dyn Snapshot) -> Result<(), NaoError> {
        ensure_exists(snapshot, Self::KIND, "MediaID", EntityKind::Media, self.media_id)?;
        ensure_exists(snapshot, Self::KIND, "GenreID", EntityKind::Genre, self.genre_id)
    }
}

impl Service<MediaGenre> {
    /// Genre tags on the given media.
    pub fn get_by_media(&self, media: Id) -> Result<Vec<MediaGenre>, NaoError> {
        self.get_filter(|mg| mg.media_id == media)
    }

    /// Media tagged with the given genre.
    pub fn get_by_genre(&self, genre: Id) -> Result<Vec<MediaGenre>, NaoError> {
        self.get_filter(|mg| mg.genre_id == genre)
    }
}
