//! # Entities
//!
//! Every stored record type, plus [`EntityKind`], the closed set of buckets.
//!
//! Plain records: `Media`, `Episode`, `Person`, `Character`, `Genre`,
//! `Producer`, `User`, `UserMediaList`.
//! Junctions: `MediaProducer`, `MediaRelation`, `MediaCharacter`,
//! `MediaGenre`, and the per-user `UserMedia`.

mod character;
mod episode;
mod genre;
mod media;
mod media_character;
mod media_genre;
mod media_producer;
mod media_relation;
mod person;
mod producer;
mod user;
mod user_media;

pub use character::Character;
pub use episode::Episode;
pub use genre::Genre;
pub use media::{Media, Quarter, Season};
pub use media_character::MediaCharacter;
pub use media_genre::MediaGenre;
pub use media_producer::MediaProducer;
pub use media_relation::MediaRelation;
pub use person::Person;
pub use producer::Producer;
pub use user::{User, UserMediaList};
pub use user_media::{UserMedia, WatchStatus, WatchedInstance};

use crate::entity::Entity;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// ENTITY KIND
// =============================================================================

/// One variant per bucket.
///
/// Lets code that only knows a bucket name at runtime (the CLI, error
/// messages, bootstrap) reach the statically typed services through
/// [`EntityKind::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    Media,
    Producer,
    Genre,
    Episode,
    Character,
    Person,
    User,
    MediaProducer,
    MediaRelation,
    MediaGenre,
    MediaCharacter,
    UserMedia,
    UserMediaList,
}

impl EntityKind {
    /// Every bucket, in bootstrap order.
    pub const ALL: [Self; 13] = [
        Self::Media,
        Self::Producer,
        Self::Genre,
        Self::Episode,
        Self::Character,
        Self::Person,
        Self::User,
        Self::MediaProducer,
        Self::MediaRelation,
        Self::MediaGenre,
        Self::MediaCharacter,
        Self::UserMedia,
        Self::UserMediaList,
    ];

    /// Name of the bucket. Also the table name on disk.
    #[must_use]
    pub const fn bucket(self) -> &'static str {
        match self {
            Self::Media => "Media",
            Self::Producer => "Producer",
            Self::Genre => "Genre",
            Self::Episode => "Episode",
            Self::Character => "Character",
            Self::Person => "Person",
            Self::User => "User",
            Self::MediaProducer => "MediaProducer",
            Self::MediaRelation => "MediaRelation",
            Self::MediaGenre => "MediaGenre",
            Self::MediaCharacter => "MediaCharacter",
            Self::UserMedia => "UserMedia",
            Self::UserMediaList => "UserMediaList",
        }
    }

    /// Call `visitor` with the entity type behind this kind.
    pub fn dispatch<V: KindVisitor>(self, visitor: V) -> V::Output {
        match self {
            Self::Media => visitor.visit::<Media>(),
            Self::Producer => visitor.visit::<Producer>(),
            Self::Genre => visitor.visit::<Genre>(),
            Self::Episode => visitor.visit::<Episode>(),
            Self::Character => visitor.visit::<Character>(),
            Self::Person => visitor.visit::<Person>(),
            Self::User => visitor.visit::<User>(),
            Self::MediaProducer => visitor.visit::<MediaProducer>(),
            Self::MediaRelation => visitor.visit::<MediaRelation>(),
            Self::MediaGenre => visitor.visit::<MediaGenre>(),
            Self::MediaCharacter => visitor.visit::<MediaCharacter>(),
            Self::UserMedia => visitor.visit::<UserMedia>(),
            Self::UserMediaList => visitor.visit::<UserMediaList>(),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.bucket())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    /// Bucket names match case-insensitively; `-` and `_` are ignored so
    /// `media-producer` and `media_producer` both work.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.bucket().to_ascii_lowercase() == wanted)
            .ok_or_else(|| format!("unknown entity kind '{}'", s))
    }
}

/// Operation generic over the entity type, run through
/// [`EntityKind::dispatch`].
pub trait KindVisitor {
    /// What the operation produces.
    type Output;

    /// Run the operation for entity type `E`.
    fn visit<E: Entity>(self) -> Self::Output;
}
