//! A single media title: a series, film, book or anything else episodes and
//! relations hang off.

use crate::entity::Entity;
use crate::storage::Snapshot;
use crate::types::{clean_optional, is_date, trim_in_place};
use crate::{EntityKind, Id, NaoError, Version};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single media title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Media {
    #[serde(rename = "ID", default)]
    pub id: Id,
    /// Title per language tag.
    #[serde(default)]
    pub titles: BTreeMap<String, String>,
    /// Synopsis per language tag.
    #[serde(default)]
    pub synopses: BTreeMap<String, String>,
    /// Background notes per language tag.
    #[serde(default)]
    pub background: BTreeMap<String, String>,
    /// First release, `YYYY-MM-DD`.
    #[serde(default)]
    pub start_date: Option<String>,
    /// Last release, `YYYY-MM-DD`.
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub season_premiered: Season,
    /// Format, e.g. `TV` or `Movie`.
    #[serde(rename = "Type", default)]
    pub media_type: Option<String>,
    /// Origin material, e.g. `Manga`.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub version: Version,
}

/// The broadcast season a media premiered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Season {
    #[serde(default)]
    pub quarter: Option<Quarter>,
    #[serde(default)]
    pub year: Option<i32>,
}

/// Quarter of the year.
///
/// Any unrecognised value decodes as `Unknown`, which normalization clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quarter {
    /// January to March.
    Winter,
    /// April to June.
    Spring,
    /// July to September.
    Summer,
    /// October to December.
    Fall,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Winter => "Winter",
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Fall => "Fall",
            Self::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// Trim every value of a per-language map and drop blank entries.
fn clean_map(map: &mut BTreeMap<String, String>) {
    for text in map.values_mut() {
        trim_in_place(text);
    }
    map.retain(|lang, text| !lang.trim().is_empty() && !text.is_empty());
}

impl Entity for Media {
    const KIND: EntityKind = EntityKind::Media;

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
        clean_map(&mut self.titles);
        clean_map(&mut self.synopses);
        clean_map(&mut self.background);
        clean_optional(&mut self.media_type);
        clean_optional(&mut self.source);
        clean_optional(&mut self.start_date);
        clean_optional(&mut self.end_date);
        if self.season_premiered.quarter == Some(Quarter::Unknown) {
            self.season_premiered.quarter = None;
        }
        Ok(())
    }

    fn validate(&self, _snapshot: &dyn Snapshot) -> Result<(), NaoError> {
        for date in [&self.start_date, &self.end_date].into_iter().flatten() {
            if !is_date(date) {
                return Err(Self::invalid(format!("'{}' is not a YYYY-MM-DD date", date)));
            }
        }
        if let (Some(start), Some(end)) = (&self.start_date, &self.end_date) {
            // ISO dates order lexicographically
            if end < start {
                return Err(Self::invalid(format!(
                    "EndDate {} is before StartDate {}",
                    end, start
                )));
            }
        }
        Ok(())
    }
}
