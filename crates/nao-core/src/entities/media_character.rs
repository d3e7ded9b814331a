//! Junction placing a character, the person voicing or playing them, or
//! both, in a media.

use crate::entity::{Entity, ensure_exists};
use crate::service::Service;
use crate::storage::Snapshot;
use crate::types::clean_optional;
use crate::{EntityKind, Id, NaoError, Version};
use serde::{Deserialize, Serialize};

/// A character and/or performer appearing in a media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct MediaCharacter {
    #[serde(rename = "ID", default)]
    pub id: Id,
    #[serde(rename = "MediaID")]
    pub media_id: Id,
    #[serde(rename = "CharacterID", default)]
    pub character_id: Option<Id>,
    /// e.g. `Main` or `Supporting`.
    #[serde(default)]
    pub character_role: Option<String>,
    #[serde(rename = "PersonID", default)]
    pub person_id: Option<Id>,
    /// e.g. `Voice Actor`.
    #[serde(default)]
    pub person_role: Option<String>,
    #[serde(default)]
    pub version: Version,
}

impl Entity for MediaCharacter {
    const KIND: EntityKind = EntityKind::MediaCharacter;

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
        clean_optional(&mut self.character_role);
        clean_optional(&mut self.person_role);
        Ok(())
    }

    fn validate(&self, snapshot: &dyn Snapshot) -> Result<(), NaoError> {
        if self.character_id.is_none() && self.person_id.is_none() {
            return Err(Self::invalid("CharacterID or PersonID must be set"));
        }
        ensure_exists(snapshot, Self::KIND, "MediaID", EntityKind::Media, self.media_id)?;
        if let Some(character) = self.character_id {
            ensure_exists(
                snapshot,
                Self::KIND,
                "CharacterID",
                EntityKind::Character,
                character,
            )?;
        }
        if let Some(person) = self.person_id {
            ensure_exists(snapshot, Self::KIND, "PersonID", EntityKind::Person, person)?;
        }
        Ok(())
    }
}

impl Service<MediaCharacter> {
    /// Cast of the given media.
    pub fn get_by_media(&self, media: Id) -> Result<Vec<MediaCharacter>, NaoError> {
        self.get_filter(|mc| mc.media_id == media)
    }

    /// Appearances of the given character.
    pub fn get_by_character(&self, character: Id) -> Result<Vec<MediaCharacter>, NaoError> {
        self.get_filter(|mc| mc.character_id == Some(character))
    }

    /// Roles of the given person.
    pub fn get_by_person(&self, person: Id) -> Result<Vec<MediaCharacter>, NaoError> {
        self.get_filter(|mc| mc.person_id == Some(person))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::tests::Present;

    #[test]
    fn needs_character_or_person() {
        let mc = MediaCharacter {
            media_id: Id(1),
            ..MediaCharacter::default()
        };
        let snapshot = Present(vec![(EntityKind::Media, Id(1))]);
        assert!(mc.validate(&snapshot).expect_err("empty").is_validation());
    }

    #[test]
    fn optional_references_checked_when_set() {
        let snapshot = Present(vec![
            (EntityKind::Media, Id(1)),
            (EntityKind::Character, Id(2)),
        ]);

        let voiced = MediaCharacter {
            media_id: Id(1),
            character_id: Some(Id(2)),
            person_id: Some(Id(3)),
            ..MediaCharacter::default()
        };
        assert!(matches!(
            voiced.validate(&snapshot),
            Err(NaoError::MissingReference {
                field: "PersonID",
                target: EntityKind::Person,
                ..
            })
        ));

        let unvoiced = MediaCharacter {
            person_id: None,
            ..voiced
        };
        unvoiced.validate(&snapshot).expect("character only");
    }
}
