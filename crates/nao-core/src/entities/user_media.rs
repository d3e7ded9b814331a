//! A user's personal record of one media: status, score, rewatches and the
//! lists it has been filed under.

use crate::entity::{Entity, ensure_exists};
use crate::service::Service;
use crate::storage::Snapshot;
use crate::types::{clean_infos, clean_optional, is_date};
use crate::{EntityKind, Id, Info, NaoError, Version};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

/// Allowed range for `Score` and `Priority`.
const RATING: RangeInclusive<i32> = 0..=10;

/// How far a user has got with a media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WatchStatus {
    /// Consumed in its entirety at least once.
    Completed,
    /// Planned for later.
    Planning,
    /// Abandoned partway through.
    Dropped,
    /// Started and put on hold.
    Hold,
}

/// One watch-through of a media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct WatchedInstance {
    /// Episodes seen in this watch-through.
    #[serde(default)]
    pub episodes: u32,
    #[serde(default)]
    pub ongoing: bool,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub comments: Vec<Info>,
}

/// A user's opinion of and progress through one media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct UserMedia {
    #[serde(rename = "ID", default)]
    pub id: Id,
    /// Fixed once created.
    #[serde(rename = "UserID")]
    pub user_id: Id,
    /// Fixed once created.
    #[serde(rename = "MediaID")]
    pub media_id: Id,
    #[serde(default)]
    pub status: Option<WatchStatus>,
    /// 0 to 10.
    #[serde(default)]
    pub priority: Option<i32>,
    /// 0 to 10.
    #[serde(default)]
    pub score: Option<i32>,
    #[serde(default)]
    pub recommended: Option<i32>,
    #[serde(default)]
    pub watched_instances: Vec<WatchedInstance>,
    #[serde(default)]
    pub comments: Vec<Info>,
    /// Lists this entry is filed under, in insertion order.
    #[serde(rename = "UserMediaListIDs", default)]
    pub user_media_list_ids: Vec<Id>,
    #[serde(default)]
    pub version: Version,
}

impl UserMedia {
    fn check_rating(name: &str, value: Option<i32>) -> Result<(), NaoError> {
        match value {
            Some(v) if !RATING.contains(&v) => Err(Self::invalid(format!(
                "{} {} is outside {}..={}",
                name,
                v,
                RATING.start(),
                RATING.end()
            ))),
            _ => Ok(()),
        }
    }
}

impl Entity for UserMedia {
    const KIND: EntityKind = EntityKind::UserMedia;

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
        clean_infos(&mut self.comments);
        for instance in &mut self.watched_instances {
            clean_optional(&mut instance.start_date);
            clean_optional(&mut instance.end_date);
            clean_infos(&mut instance.comments);
        }
        let mut seen = BTreeSet::new();
        self.user_media_list_ids.retain(|id| seen.insert(*id));
        Ok(())
    }

    fn validate(&self, snapshot: &dyn Snapshot) -> Result<(), NaoError> {
        Self::check_rating("Score", self.score)?;
        Self::check_rating("Priority", self.priority)?;
        for instance in &self.watched_instances {
            let dates = [&instance.start_date, &instance.end_date];
            if let Some(bad) = dates.into_iter().flatten().find(|d| !is_date(d)) {
                return Err(Self::invalid(format!("'{}' is not a YYYY-MM-DD date", bad)));
            }
        }

        ensure_exists(snapshot, Self::KIND, "UserID", EntityKind::User, self.user_id)?;
        ensure_exists(snapshot, Self::KIND, "MediaID", EntityKind::Media, self.media_id)?;
        for list in &self.user_media_list_ids {
            ensure_exists(
                snapshot,
                Self::KIND,
                "UserMediaListIDs",
                EntityKind::UserMediaList,
                *list,
            )?;
        }
        Ok(())
    }

    fn carry_forward(&mut self, old: &Self) -> Result<(), NaoError> {
        self.set_identity(old.id, old.version.next());
        self.user_id = old.user_id;
        self.media_id = old.media_id;
        Ok(())
    }
}

impl Service<UserMedia> {
    /// Every entry of the given user.
    pub fn get_by_user(&self, user: Id) -> Result<Vec<UserMedia>, NaoError> {
        self.get_filter(|um| um.user_id == user)
    }

    /// Every user's entry for the given media.
    pub fn get_by_media(&self, media: Id) -> Result<Vec<UserMedia>, NaoError> {
        self.get_filter(|um| um.media_id == media)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::tests::{EmptySnapshot, Present};

    fn world() -> Present {
        Present(vec![
            (EntityKind::User, Id(1)),
            (EntityKind::Media, Id(2)),
            (EntityKind::UserMediaList, Id(3)),
        ])
    }

    fn entry() -> UserMedia {
        UserMedia {
            user_id: Id(1),
            media_id: Id(2),
            status: Some(WatchStatus::Completed),
            score: Some(9),
            user_media_list_ids: vec![Id(3)],
            ..UserMedia::default()
        }
    }

    #[test]
    fn valid_entry_passes() {
        entry().validate(&world()).expect("valid");
    }

    #[test]
    fn score_and_priority_bounded() {
        let high = UserMedia {
            score: Some(11),
            ..entry()
        };
        assert!(high.validate(&EmptySnapshot).expect_err("score").is_validation());

        let negative = UserMedia {
            priority: Some(-1),
            ..entry()
        };
        assert!(matches!(
            negative.validate(&EmptySnapshot),
            Err(NaoError::Invalid { .. })
        ));
    }

    #[test]
    fn every_list_must_exist() {
        let um = UserMedia {
            user_media_list_ids: vec![Id(3), Id(8)],
            ..entry()
        };
        assert!(matches!(
            um.validate(&world()),
            Err(NaoError::MissingReference {
                field: "UserMediaListIDs",
                id: Id(8),
                ..
            })
        ));
    }

    #[test]
    fn normalize_dedups_lists_keeping_order() {
        let mut um = UserMedia {
            user_media_list_ids: vec![Id(5), Id(3), Id(5), Id(1), Id(3)],
            ..entry()
        };
        um.normalize().expect("normalize");
        assert_eq!(um.user_media_list_ids, vec![Id(5), Id(3), Id(1)]);
    }

    #[test]
    fn owner_and_media_frozen() {
        let old = UserMedia {
            id: Id(4),
            version: Version(1),
            ..entry()
        };
        let mut new = UserMedia {
            user_id: Id(7),
            media_id: Id(7),
            score: Some(3),
            ..entry()
        };
        new.carry_forward(&old).expect("carry");

        assert_eq!((new.user_id, new.media_id), (Id(1), Id(2)));
        assert_eq!(new.version, Version(2));
        assert_eq!(new.score, Some(3));
    }

    #[test]
    fn watch_status_is_a_name_on_disk() {
        let um = entry();
        let value: serde_json::Value =
            serde_json::from_slice(&um.encode().expect("encode")).expect("json");
        assert_eq!(value["Status"], "Completed");
        assert_eq!(value["UserMediaListIDs"], serde_json::json!([3]));

        let bad = r#"{"ID":1,"UserID":1,"MediaID":2,"Status":"Binging"}"#;
        assert!(UserMedia::decode(Id(1), bad.as_bytes()).is_err());
    }
}
