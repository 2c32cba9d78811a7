//! QIDO-RS query parsing
//!
//! Classifies each parameter of a search request:
//! - Reserved parameters (`includefield`, `fuzzymatching`, `limit`, `offset`),
//!   matched case-insensitively
//! - Anything else is an attribute filter (`PatientName=Doe*`, `00080020=20190101`)
//!
//! The first malformed parameter aborts the whole parse.

use crate::dictionary::{AttributeDictionary, StandardDictionary};
use crate::expression::{IncludeFields, QueryExpression};
use crate::filter::{FilterCondition, FilterConditionBuilder, FilterParse};
use crate::limits::{QueryOptions, ResourceType};
use crate::params::{QueryParameter, QueryParameters};
use crate::tag::Tag;
use crate::tag_resolver::TagResolver;
use crate::values::{parse_fuzzy_matching, parse_limit, parse_offset};
use crate::{Error, Result};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

const INCLUDE_FIELD_VALUE_ALL: &str = "all";

/// Reserved (non-filter) parameter names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReservedParameter {
    IncludeField,
    FuzzyMatching,
    Limit,
    Offset,
}

impl ReservedParameter {
    fn from_key(key: &str) -> Option<Self> {
        [
            ("includefield", Self::IncludeField),
            ("fuzzymatching", Self::FuzzyMatching),
            ("limit", Self::Limit),
            ("offset", Self::Offset),
        ]
        .into_iter()
        .find(|(name, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, reserved)| reserved)
    }
}

/// Parses query parameters into [`QueryExpression`]s.
///
/// Holds no per-request state; one parser can serve concurrent requests.
#[derive(Clone)]
pub struct QueryParser {
    dictionary: Arc<dyn AttributeDictionary>,
    options: QueryOptions,
}

impl QueryParser {
    /// Parser backed by the [`StandardDictionary`].
    pub fn new(options: QueryOptions) -> Self {
        Self::with_dictionary(Arc::new(StandardDictionary::new()), options)
    }

    pub fn with_dictionary(dictionary: Arc<dyn AttributeDictionary>, options: QueryOptions) -> Self {
        Self {
            dictionary,
            options,
        }
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    pub fn tag_resolver(&self) -> TagResolver<'_> {
        TagResolver::new(self.dictionary.as_ref())
    }

    /// Parse a raw query string (`PatientName=Doe*&limit=10`).
    pub fn parse_query_string(
        &self,
        query: &str,
        resource_type: ResourceType,
    ) -> Result<QueryExpression> {
        self.parse(&QueryParameters::from_query_string(query), resource_type)
    }

    /// Parse `parameters` for a search at `resource_type` level.
    pub fn parse(
        &self,
        parameters: &QueryParameters,
        resource_type: ResourceType,
    ) -> Result<QueryExpression> {
        if parameters.is_empty() {
            return Ok(QueryExpression::default());
        }

        let resolver = self.tag_resolver();
        let filters = FilterConditionBuilder::new(resolver);
        let mut builder = ExpressionBuilder::default();

        for parameter in parameters {
            let key = parameter.key.trim();
            match ReservedParameter::from_key(key) {
                Some(reserved) => {
                    tracing::trace!(parameter = key, kind = ?reserved, "Classified reserved parameter");
                    self.apply_reserved(reserved, parameter, &resolver, &mut builder)?;
                }
                None => match filters.build(key, resource_type, &parameter.values)? {
                    FilterParse::Condition(condition) => builder.add_filter(&parameter.key, condition)?,
                    FilterParse::Empty => {
                        tracing::trace!(parameter = key, "Ignoring filter without value");
                    }
                    FilterParse::NotAFilter => {
                        return Err(Error::UnknownParameter(parameter.key.clone()));
                    }
                },
            }
        }

        let expression = builder.build();
        tracing::debug!(
            resource_type = %resource_type,
            filters = expression.filter_conditions().len(),
            include_all = expression.include_fields().is_all(),
            limit = expression.limit(),
            offset = expression.offset(),
            "Parsed query expression"
        );
        Ok(expression)
    }

    fn apply_reserved(
        &self,
        reserved: ReservedParameter,
        parameter: &QueryParameter,
        resolver: &TagResolver<'_>,
        builder: &mut ExpressionBuilder,
    ) -> Result<()> {
        match reserved {
            ReservedParameter::IncludeField => {
                for value in &parameter.values {
                    let value = value.trim();
                    // Values after `all` are not looked at.
                    if value.eq_ignore_ascii_case(INCLUDE_FIELD_VALUE_ALL) {
                        builder.include_all = true;
                        break;
                    }

                    let tag = resolver
                        .resolve_tag(value)
                        .ok_or_else(|| Error::IncludeFieldUnknownAttribute(value.to_string()))?;
                    builder.include_fields.insert(tag);
                }
            }
            ReservedParameter::FuzzyMatching => {
                builder.fuzzy_matching = parse_fuzzy_matching(parameter.first_value())?;
            }
            ReservedParameter::Limit => {
                builder.limit = parse_limit(parameter.first_value(), self.options.max_result_count)?;
            }
            ReservedParameter::Offset => {
                builder.offset = parse_offset(parameter.first_value())?;
            }
        }
        Ok(())
    }
}

impl Default for QueryParser {
    fn default() -> Self {
        Self::new(QueryOptions::default())
    }
}

impl std::fmt::Debug for QueryParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryParser")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Accumulates one request's parse results.
#[derive(Debug, Default)]
struct ExpressionBuilder {
    include_all: bool,
    include_fields: BTreeSet<Tag>,
    fuzzy_matching: bool,
    limit: usize,
    offset: i64,
    filter_conditions: Vec<FilterCondition>,
    filter_tags: HashSet<Tag>,
}

impl ExpressionBuilder {
    fn add_filter(&mut self, raw_key: &str, condition: FilterCondition) -> Result<()> {
        if !self.filter_tags.insert(condition.tag()) {
            return Err(Error::DuplicateParameter(raw_key.to_string()));
        }
        self.filter_conditions.push(condition);
        Ok(())
    }

    fn build(self) -> QueryExpression {
        let include_fields = if self.include_all {
            IncludeFields::All
        } else {
            IncludeFields::Only(self.include_fields)
        };

        QueryExpression::new(
            include_fields,
            self.fuzzy_matching,
            self.limit,
            self.offset,
            self.filter_conditions,
        )
    }
}
