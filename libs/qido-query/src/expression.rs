//! Parsed query expressions

use crate::filter::FilterCondition;
use crate::tag::Tag;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;

/// Attributes requested in the response (`includefield`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncludeFields {
    /// `includefield=all`
    All,
    /// Explicitly listed attributes (possibly none).
    Only(BTreeSet<Tag>),
}

impl Default for IncludeFields {
    fn default() -> Self {
        Self::Only(BTreeSet::new())
    }
}

impl IncludeFields {
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Whether `tag` was requested, either explicitly or through `all`.
    pub fn includes(&self, tag: Tag) -> bool {
        match self {
            Self::All => true,
            Self::Only(tags) => tags.contains(&tag),
        }
    }

    /// Explicitly requested attributes; empty for [`IncludeFields::All`].
    pub fn explicit_tags(&self) -> impl Iterator<Item = Tag> + '_ {
        let tags = match self {
            Self::All => None,
            Self::Only(tags) => Some(tags),
        };
        tags.into_iter().flatten().copied()
    }
}

impl Serialize for IncludeFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_str("all"),
            Self::Only(tags) => {
                let mut seq = serializer.serialize_seq(Some(tags.len()))?;
                for tag in tags {
                    seq.serialize_element(tag)?;
                }
                seq.end()
            }
        }
    }
}

/// A validated QIDO-RS request, ready for a query executor.
///
/// A `limit` of zero means no limit was requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryExpression {
    include_fields: IncludeFields,
    fuzzy_matching: bool,
    limit: usize,
    offset: i64,
    filter_conditions: Vec<FilterCondition>,
}

impl QueryExpression {
    pub(crate) fn new(
        include_fields: IncludeFields,
        fuzzy_matching: bool,
        limit: usize,
        offset: i64,
        filter_conditions: Vec<FilterCondition>,
    ) -> Self {
        Self {
            include_fields,
            fuzzy_matching,
            limit,
            offset,
            filter_conditions,
        }
    }

    pub fn include_fields(&self) -> &IncludeFields {
        &self.include_fields
    }

    pub fn fuzzy_matching(&self) -> bool {
        self.fuzzy_matching
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Filter conditions in request order.
    pub fn filter_conditions(&self) -> &[FilterCondition] {
        &self.filter_conditions
    }

    pub fn filter_for(&self, tag: Tag) -> Option<&FilterCondition> {
        self.filter_conditions.iter().find(|c| c.tag() == tag)
    }

    pub fn has_filters(&self) -> bool {
        !self.filter_conditions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_expression_is_empty() {
        let expression = QueryExpression::default();
        assert!(!expression.has_filters());
        assert!(!expression.fuzzy_matching());
        assert_eq!(expression.limit(), 0);
        assert_eq!(expression.offset(), 0);
        assert_eq!(expression.include_fields(), &IncludeFields::default());
        assert!(!expression.include_fields().is_all());
    }

    #[test]
    fn include_all_covers_every_tag() {
        assert!(IncludeFields::All.includes(Tag::PATIENT_NAME));
        assert_eq!(IncludeFields::All.explicit_tags().count(), 0);

        let only = IncludeFields::Only([Tag::STUDY_DATE].into_iter().collect());
        assert!(only.includes(Tag::STUDY_DATE));
        assert!(!only.includes(Tag::PATIENT_NAME));
        assert_eq!(only.explicit_tags().collect::<Vec<_>>(), vec![Tag::STUDY_DATE]);
    }

    #[test]
    fn serializes_for_executors() {
        let expression = QueryExpression::new(
            IncludeFields::Only([Tag::PATIENT_NAME].into_iter().collect()),
            true,
            10,
            5,
            vec![FilterCondition::SingleValue {
                tag: Tag::MODALITY,
                vr: crate::vr::Vr::CS,
                value: "CT".into(),
            }],
        );

        assert_eq!(
            serde_json::to_value(&expression).unwrap(),
            json!({
                "includeFields": ["00100010"],
                "fuzzyMatching": true,
                "limit": 10,
                "offset": 5,
                "filterConditions": [
                    { "type": "singleValue", "tag": "00080060", "vr": "CS", "value": "CT" }
                ]
            })
        );

        let all = QueryExpression::new(IncludeFields::All, false, 0, 0, Vec::new());
        assert_eq!(serde_json::to_value(&all).unwrap()["includeFields"], json!("all"));
    }
}
