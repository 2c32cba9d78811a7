//! Query levels and the attributes each level can filter on

use crate::tag::Tag;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Default upper bound for the `limit` parameter.
pub const MAX_QUERY_RESULT_COUNT: usize = 100;

/// QIDO-RS search level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Study,
    Series,
    Instance,
}

const STUDY_TAGS: &[Tag] = &[
    Tag::STUDY_DATE,
    Tag::STUDY_INSTANCE_UID,
    Tag::STUDY_DESCRIPTION,
    Tag::ACCESSION_NUMBER,
    Tag::PATIENT_ID,
    Tag::PATIENT_NAME,
    Tag::REFERRING_PHYSICIAN_NAME,
    Tag::MODALITIES_IN_STUDY,
];

const SERIES_TAGS: &[Tag] = &[
    Tag::SERIES_INSTANCE_UID,
    Tag::MODALITY,
    Tag::PERFORMED_PROCEDURE_STEP_START_DATE,
];

const INSTANCE_TAGS: &[Tag] = &[Tag::SOP_INSTANCE_UID];

static STUDY_QUERY_TAGS: Lazy<HashSet<Tag>> =
    Lazy::new(|| STUDY_TAGS.iter().copied().collect());

static SERIES_QUERY_TAGS: Lazy<HashSet<Tag>> =
    Lazy::new(|| STUDY_TAGS.iter().chain(SERIES_TAGS).copied().collect());

static INSTANCE_QUERY_TAGS: Lazy<HashSet<Tag>> = Lazy::new(|| {
    STUDY_TAGS
        .iter()
        .chain(SERIES_TAGS)
        .chain(INSTANCE_TAGS)
        .copied()
        .collect()
});

/// Date attributes that accept `min-max` range values.
static RANGE_QUERY_TAGS: Lazy<HashSet<Tag>> = Lazy::new(|| {
    [Tag::STUDY_DATE, Tag::PERFORMED_PROCEDURE_STEP_START_DATE]
        .into_iter()
        .collect()
});

impl ResourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Study => "study",
            Self::Series => "series",
            Self::Instance => "instance",
        }
    }

    /// Attributes that may be used as filters at this level.
    ///
    /// Lower levels inherit the filters of the levels above them.
    pub fn supported_tags(self) -> &'static HashSet<Tag> {
        match self {
            Self::Study => &*STUDY_QUERY_TAGS,
            Self::Series => &*SERIES_QUERY_TAGS,
            Self::Instance => &*INSTANCE_QUERY_TAGS,
        }
    }

    pub fn supports(self, tag: Tag) -> bool {
        self.supported_tags().contains(&tag)
    }
}

impl FromStr for ResourceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "study" | "studies" => Ok(Self::Study),
            "series" => Ok(Self::Series),
            "instance" | "instances" => Ok(Self::Instance),
            _ => Err(Error::InvalidResourceLevel(s.to_string())),
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `tag` accepts a `min-max` date range.
pub fn is_range_query_tag(tag: Tag) -> bool {
    RANGE_QUERY_TAGS.contains(&tag)
}

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    /// Largest accepted `limit` value.
    pub max_result_count: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            max_result_count: MAX_QUERY_RESULT_COUNT,
        }
    }
}
