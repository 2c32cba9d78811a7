//! QIDO-RS query front-end
//!
//! Turns the flat parameter collection of a DICOMweb search request into a
//! validated [`QueryExpression`], and resolves dotted attribute paths against
//! hierarchical DICOM datasets.
//!
//! ```text
//! Query parameters
//!      |
//!   QueryParser (classify: includefield / fuzzymatching / limit / offset / filter)
//!      |
//!   TagResolver (keyword or GGGGEEEE) + value parsers
//!      |
//!   FilterConditionBuilder -> QueryExpression
//!
//! Dataset + AttributeId -> path::resolve -> matching values
//! ```

pub mod attribute_id;
pub mod dataset;
pub mod dictionary;
pub mod error;
pub mod expression;
pub mod filter;
pub mod limits;
pub mod params;
pub mod parser;
pub mod path;
pub mod tag;
pub mod tag_resolver;
pub mod values;
pub mod vr;

pub use attribute_id::AttributeId;
pub use dataset::{Attribute, Dataset, DatasetNode, Element, Value};
pub use dictionary::{AttributeDictionary, DictionaryEntry, EntryKind, StandardDictionary};
pub use error::{Error, Result};
pub use expression::{IncludeFields, QueryExpression};
pub use filter::{FilterCondition, FilterConditionBuilder, FilterParse};
pub use limits::{QueryOptions, ResourceType, MAX_QUERY_RESULT_COUNT};
pub use params::{QueryParameter, QueryParameters};
pub use parser::QueryParser;
pub use tag::Tag;
pub use tag_resolver::TagResolver;
pub use vr::Vr;
