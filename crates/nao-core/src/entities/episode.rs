//! A single episode or chapter of a media.

use crate::entity::{Entity, ensure_exists};
use crate::service::Service;
use crate::storage::Snapshot;
use crate::types::{clean_infos, clean_optional, is_date};
use crate::{EntityKind, Id, Info, NaoError, Version};
use serde::{Deserialize, Serialize};

/// A single episode or chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Episode {
    #[serde(rename = "ID", default)]
    pub id: Id,
    /// The media this episode belongs to; fixed once created.
    #[serde(rename = "MediaID")]
    pub media_id: Id,
    #[serde(default)]
    pub titles: Vec<Info>,
    /// Air or release date, `YYYY-MM-DD`.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub synopses: Vec<Info>,
    /// Running time in seconds.
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub filler: bool,
    #[serde(default)]
    pub recap: bool,
    #[serde(default)]
    pub version: Version,
}

impl Entity for Episode {
    const KIND: EntityKind = EntityKind::Episode;

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
        clean_infos(&mut self.synopses);
        clean_optional(&mut self.date);
        Ok(())
    }

    fn validate(&self, snapshot: &dyn Snapshot) -> Result<(), NaoError> {
        if let Some(date) = &self.date
            && !is_date(date)
        {
            return Err(Self::invalid(format!("'{}' is not a YYYY-MM-DD date", date)));
        }
        ensure_exists(snapshot, Self::KIND, "MediaID", EntityKind::Media, self.media_id)
    }

    fn carry_forward(&mut self, old: &Self) -> Result<(), NaoError> {
        self.set_identity(old.id, old.version.next());
        self.media_id = old.media_id;
        Ok(())
    }
}

impl Service<Episode> {
    /// Episodes of the given media.
    pub fn get_by_media(&self, media: Id) -> Result<Vec<Episode>, NaoError> {
        self.get_filter(|e| e.media_id == media)
    }
}
