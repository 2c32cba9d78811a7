//! Filter conditions
//!
//! Turns one `attribute=value` query parameter into a typed condition.
//! Date attributes are validated and, for range-capable attributes, split
//! into `min-max` bounds. Dates stay in their `YYYYMMDD` text form.

use crate::limits::{is_range_query_tag, ResourceType};
use crate::tag::Tag;
use crate::tag_resolver::TagResolver;
use crate::values::parse_date;
use crate::vr::Vr;
use crate::{Error, Result};
use serde::Serialize;

/// A validated constraint on one attribute.
///
/// Carries the value representation the dictionary reported for the tag so
/// executors can pick a matching strategy without another lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FilterCondition {
    SingleValue {
        tag: Tag,
        vr: Vr,
        value: String,
    },
    Range {
        tag: Tag,
        vr: Vr,
        minimum: String,
        maximum: String,
    },
}

impl FilterCondition {
    pub fn tag(&self) -> Tag {
        match self {
            Self::SingleValue { tag, .. } | Self::Range { tag, .. } => *tag,
        }
    }

    pub fn vr(&self) -> Vr {
        match self {
            Self::SingleValue { vr, .. } | Self::Range { vr, .. } => *vr,
        }
    }
}

/// Outcome of interpreting a parameter as a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterParse {
    /// The key does not name a known attribute.
    NotAFilter,
    /// The key names a supported attribute but the parameter has no value.
    Empty,
    Condition(FilterCondition),
}

#[derive(Debug, Clone, Copy)]
pub struct FilterConditionBuilder<'a> {
    resolver: TagResolver<'a>,
}

impl<'a> FilterConditionBuilder<'a> {
    pub fn new(resolver: TagResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Interpret `attribute_id` with `values` as a filter for `resource_type`.
    ///
    /// Only the first value is used. An attribute that resolves but is not
    /// filterable at this level is an error; an attribute that does not
    /// resolve is [`FilterParse::NotAFilter`].
    pub fn build(
        &self,
        attribute_id: &str,
        resource_type: ResourceType,
        values: &[String],
    ) -> Result<FilterParse> {
        let Some(entry) = self.resolver.try_resolve(attribute_id) else {
            return Ok(FilterParse::NotAFilter);
        };

        if !resource_type.supports(entry.tag) {
            return Err(Error::UnsupportedSearchParameter(attribute_id.to_string()));
        }

        let Some(first) = values.first() else {
            return Ok(FilterParse::Empty);
        };
        let value = first.trim();

        let condition = if entry.vr == Vr::DA {
            date_condition(entry.tag, &entry.keyword, value)?
        } else {
            FilterCondition::SingleValue {
                tag: entry.tag,
                vr: entry.vr,
                value: value.to_string(),
            }
        };

        Ok(FilterParse::Condition(condition))
    }
}

fn date_condition(tag: Tag, keyword: &str, value: &str) -> Result<FilterCondition> {
    if is_range_query_tag(tag) {
        let bounds: Vec<&str> = value.split('-').collect();
        if let [minimum, maximum] = bounds.as_slice() {
            let (minimum, maximum) = (minimum.trim(), maximum.trim());
            parse_date(minimum, keyword)?;
            parse_date(maximum, keyword)?;
            return Ok(FilterCondition::Range {
                tag,
                vr: Vr::DA,
                minimum: minimum.to_string(),
                maximum: maximum.to_string(),
            });
        }
    }

    parse_date(value, keyword)?;
    Ok(FilterCondition::SingleValue {
        tag,
        vr: Vr::DA,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::StandardDictionary;

    fn build(attribute: &str, level: ResourceType, values: &[&str]) -> Result<FilterParse> {
        let dictionary = StandardDictionary::new();
        let builder = FilterConditionBuilder::new(TagResolver::new(&dictionary));
        let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        builder.build(attribute, level, &values)
    }

    #[test]
    fn string_values_pass_through_verbatim() {
        let parsed = build("PatientName", ResourceType::Study, &["Doe^J*"]).unwrap();
        assert_eq!(
            parsed,
            FilterParse::Condition(FilterCondition::SingleValue {
                tag: Tag::PATIENT_NAME,
                vr: Vr::PN,
                value: "Doe^J*".into()
            })
        );
    }

    #[test]
    fn only_first_value_is_used() {
        let parsed = build("Modality", ResourceType::Series, &["CT", "MR"]).unwrap();
        assert_eq!(
            parsed,
            FilterParse::Condition(FilterCondition::SingleValue {
                tag: Tag::MODALITY,
                vr: Vr::CS,
                value: "CT".into()
            })
        );
    }

    #[test]
    fn unknown_attribute_is_not_a_filter() {
        assert_eq!(
            build("NotAnAttribute", ResourceType::Study, &["x"]).unwrap(),
            FilterParse::NotAFilter
        );
    }

    #[test]
    fn unsupported_attribute_for_level_fails() {
        assert_eq!(
            build("Modality", ResourceType::Study, &["CT"]),
            Err(Error::UnsupportedSearchParameter("Modality".into()))
        );
        assert_eq!(
            build("PatientBirthDate", ResourceType::Instance, &["20000101"]),
            Err(Error::UnsupportedSearchParameter("PatientBirthDate".into()))
        );
    }

    #[test]
    fn missing_value_produces_no_condition() {
        assert_eq!(
            build("StudyDate", ResourceType::Study, &[]).unwrap(),
            FilterParse::Empty
        );
    }

    #[test]
    fn date_range_on_range_capable_tag() {
        let parsed = build("StudyDate", ResourceType::Study, &["20190101-20190105"]).unwrap();
        assert_eq!(
            parsed,
            FilterParse::Condition(FilterCondition::Range {
                tag: Tag::STUDY_DATE,
                vr: Vr::DA,
                minimum: "20190101".into(),
                maximum: "20190105".into()
            })
        );
    }

    #[test]
    fn range_bounds_are_validated() {
        assert_eq!(
            build("StudyDate", ResourceType::Study, &["20190101-2019015"]),
            Err(Error::InvalidDate {
                value: "2019015".into(),
                keyword: "StudyDate".into()
            })
        );
        assert_eq!(
            build("StudyDate", ResourceType::Study, &["20190101-"]),
            Err(Error::InvalidDate {
                value: "".into(),
                keyword: "StudyDate".into()
            })
        );
    }

    #[test]
    fn other_split_counts_fall_back_to_single_date() {
        assert_eq!(
            build("StudyDate", ResourceType::Study, &["2019-01-01"]),
            Err(Error::InvalidDate {
                value: "2019-01-01".into(),
                keyword: "StudyDate".into()
            })
        );
        assert_eq!(
            build("StudyDate", ResourceType::Study, &["20190101"]).unwrap(),
            FilterParse::Condition(FilterCondition::SingleValue {
                tag: Tag::STUDY_DATE,
                vr: Vr::DA,
                value: "20190101".into()
            })
        );
    }

    #[test]
    fn hex_form_reports_dictionary_keyword_in_date_errors() {
        assert_eq!(
            build("00080020", ResourceType::Study, &["yesterday"]),
            Err(Error::InvalidDate {
                value: "yesterday".into(),
                keyword: "StudyDate".into()
            })
        );
    }

    #[test]
    fn conditions_serialize_with_hex_tags() {
        let condition = FilterCondition::Range {
            tag: Tag::STUDY_DATE,
            vr: Vr::DA,
            minimum: "20190101".into(),
            maximum: "20190105".into(),
        };
        let json = serde_json::to_value(&condition).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "range",
                "tag": "00080020",
                "vr": "DA",
                "minimum": "20190101",
                "maximum": "20190105"
            })
        );
    }
}
