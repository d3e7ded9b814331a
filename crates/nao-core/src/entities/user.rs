//! Users and the named lists they sort their media into.
//!
//! Only what annotations need lives here; credentials and sessions belong to
//! whatever authenticates requests.

use crate::entity::{Entity, ensure_exists};
use crate::service::Service;
use crate::storage::Snapshot;
use crate::types::{clean_infos, clean_optional, trim_in_place};
use crate::{EntityKind, Id, Info, NaoError, Version};
use serde::{Deserialize, Serialize};

// =============================================================================
// USER
// =============================================================================

/// A user who annotates media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    #[serde(rename = "ID", default)]
    pub id: Id,
    /// Fixed once created.
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub version: Version,
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

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
        trim_in_place(&mut self.username);
        clean_optional(&mut self.email);
        Ok(())
    }

    fn validate(&self, _snapshot: &dyn Snapshot) -> Result<(), NaoError> {
        if self.username.is_empty() {
            return Err(Self::invalid("Username must not be empty"));
        }
        Ok(())
    }

    fn carry_forward(&mut self, old: &Self) -> Result<(), NaoError> {
        self.set_identity(old.id, old.version.next());
        self.username.clone_from(&old.username);
        Ok(())
    }
}

impl Service<User> {
    /// The user with exactly this username, if any.
    pub fn get_by_username(&self, username: &str) -> Result<Option<User>, NaoError> {
        Ok(self
            .get_filter(|u| u.username == username)?
            .into_iter()
            .next())
    }
}

// =============================================================================
// USER MEDIA LIST
// =============================================================================

/// A named list owned by one user, e.g. "Favourites".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct UserMediaList {
    #[serde(rename = "ID", default)]
    pub id: Id,
    /// Owner; fixed once created.
    #[serde(rename = "UserID")]
    pub user_id: Id,
    #[serde(default)]
    pub names: Vec<Info>,
    #[serde(default)]
    pub descriptions: Vec<Info>,
    #[serde(default)]
    pub version: Version,
}

impl Entity for UserMediaList {
    const KIND: EntityKind = EntityKind::UserMediaList;

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

    fn validate(&self, snapshot: &dyn Snapshot) -> Result<(), NaoError> {
        ensure_exists(snapshot, Self::KIND, "UserID", EntityKind::User, self.user_id)
    }

    fn carry_forward(&mut self, old: &Self) -> Result<(), NaoError> {
        self.set_identity(old.id, old.version.next());
        self.user_id = old.user_id;
        Ok(())
    }
}

impl Service<UserMediaList> {
    /// Lists owned by the given user.
    pub fn get_by_user(&self, user: Id) -> Result<Vec<UserMediaList>, NaoError> {
        self.get_filter(|l| l.user_id == user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::tests::{EmptySnapshot, Present};

    #[test]
    fn username_is_required() {
        let mut user = User {
            username: "   ".to_string(),
            ..User::default()
        };
        user.normalize().expect("normalize");
        assert!(user.validate(&EmptySnapshot).expect_err("empty").is_validation());
    }

    #[test]
    fn username_survives_update() {
        let old = User {
            id: Id(1),
            username: "spike".to_string(),
            version: Version(2),
            ..User::default()
        };
        let mut new = User {
            id: Id(1),
            username: "jet".to_string(),
            email: Some("jet@bebop.example".to_string()),
            ..User::default()
        };
        new.carry_forward(&old).expect("carry");

        assert_eq!(new.username, "spike");
        assert_eq!(new.version, Version(3));
        assert!(new.email.is_some());
    }

    #[test]
    fn list_requires_owner() {
        let list = UserMediaList {
            user_id: Id(4),
            ..UserMediaList::default()
        };
        assert!(list.validate(&EmptySnapshot).is_err());
        list.validate(&Present(vec![(EntityKind::User, Id(4))]))
            .expect("owner present");
    }
}
