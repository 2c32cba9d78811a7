//! Hierarchical DICOM datasets
//!
//! [`DatasetNode`] is the read-only view the path resolver needs from a
//! dataset tree. [`Dataset`] is the in-memory implementation, buildable by
//! hand or from the DICOM JSON model (PS3.18 Annex F.2).

use crate::attribute_id::AttributeId;
use crate::tag::Tag;
use crate::values::parse_date_value;
use crate::vr::Vr;
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Read-only access to one node of a dataset tree.
pub trait DatasetNode: Sized {
    type Value;

    /// The attribute stored under `tag`, if present.
    fn attribute(&self, tag: Tag) -> Option<Attribute<'_, Self>>;
}

/// An attribute as seen through [`DatasetNode`]: scalar values or a sequence
/// of child datasets.
pub enum Attribute<'a, N: DatasetNode> {
    Values(&'a [N::Value]),
    Sequence(&'a [N]),
}

impl<N: DatasetNode> Clone for Attribute<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: DatasetNode> Copy for Attribute<'_, N> {}

/// A scalar attribute value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Integer(i64),
    Decimal(f64),
    Date(NaiveDate),
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Decimal(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

/// A stored attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Values(Vec<Value>),
    Sequence(Vec<Dataset>),
}

/// In-memory dataset: attributes keyed by tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    elements: BTreeMap<Tag, Element>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a single-valued attribute.
    pub fn with_value(self, tag: Tag, value: impl Into<Value>) -> Self {
        self.with_values(tag, vec![value.into()])
    }

    pub fn with_values(mut self, tag: Tag, values: Vec<Value>) -> Self {
        self.insert(tag, Element::Values(values));
        self
    }

    /// Set a sequence attribute holding `items`.
    pub fn with_sequence<I>(mut self, tag: Tag, items: I) -> Self
    where
        I: IntoIterator<Item = Dataset>,
    {
        self.insert(tag, Element::Sequence(items.into_iter().collect()));
        self
    }

    /// Insert or replace an attribute, returning the previous one.
    pub fn insert(&mut self, tag: Tag, element: Element) -> Option<Element> {
        self.elements.insert(tag, element)
    }

    pub fn get(&self, tag: Tag) -> Option<&Element> {
        self.elements.get(&tag)
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.elements.contains_key(&tag)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Tag, &Element)> {
        self.elements.iter()
    }

    /// All values reachable through `path`, or `None` if the target attribute
    /// is not present anywhere along it. See [`crate::path::resolve`].
    pub fn values(&self, path: &AttributeId) -> Option<Vec<&Value>> {
        crate::path::resolve(self, path)
    }

    /// Build a dataset from the DICOM JSON model.
    ///
    /// `SQ` items become nested datasets, `PN` values are read from their
    /// `Alphabetic` component, and valid `DA` values become dates. Bulk data
    /// (`InlineBinary`, `BulkDataURI`) is skipped.
    pub fn from_dicom_json(json: &JsonValue) -> Result<Self> {
        let object = json
            .as_object()
            .ok_or_else(|| Error::InvalidDatasetJson("dataset must be a JSON object".into()))?;

        let mut dataset = Dataset::new();
        for (key, attribute) in object {
            let tag = Tag::from_hex(key).ok_or_else(|| {
                Error::InvalidDatasetJson(format!("'{}' is not a tag in GGGGEEEE form", key))
            })?;

            let vr: Vr = attribute
                .get("vr")
                .and_then(JsonValue::as_str)
                .ok_or_else(|| Error::InvalidDatasetJson(format!("attribute {} has no vr", key)))?
                .parse()
                .map_err(|e| Error::InvalidDatasetJson(format!("attribute {}: {}", key, e)))?;

            let raw_values = match attribute.get("Value") {
                None | Some(JsonValue::Null) => &[][..],
                Some(JsonValue::Array(values)) => values.as_slice(),
                Some(_) => {
                    return Err(Error::InvalidDatasetJson(format!(
                        "attribute {} Value must be an array",
                        key
                    )))
                }
            };

            let element = if vr == Vr::SQ {
                Element::Sequence(
                    raw_values
                        .iter()
                        .map(Dataset::from_dicom_json)
                        .collect::<Result<Vec<_>>>()?,
                )
            } else {
                let mut values = Vec::with_capacity(raw_values.len());
                for raw in raw_values {
                    if let Some(value) = value_from_json(tag, vr, raw)? {
                        values.push(value);
                    }
                }
                Element::Values(values)
            };

            dataset.insert(tag, element);
        }

        Ok(dataset)
    }
}

fn value_from_json(tag: Tag, vr: Vr, raw: &JsonValue) -> Result<Option<Value>> {
    let value = match raw {
        JsonValue::Null => return Ok(None),
        JsonValue::String(text) if vr == Vr::DA => match parse_date_value(text) {
            Some(date) => Value::Date(date),
            None => Value::Text(text.clone()),
        },
        JsonValue::String(text) => Value::Text(text.clone()),
        JsonValue::Number(number) => match number.as_i64() {
            Some(integer) => Value::Integer(integer),
            None => Value::Decimal(number.as_f64().unwrap_or(f64::NAN)),
        },
        JsonValue::Object(name) if vr == Vr::PN => match name.get("Alphabetic") {
            Some(JsonValue::String(alphabetic)) => Value::Text(alphabetic.clone()),
            _ => return Ok(None),
        },
        other => {
            return Err(Error::InvalidDatasetJson(format!(
                "unsupported {} value for attribute {}: {}",
                vr, tag, other
            )))
        }
    };
    Ok(Some(value))
}

impl DatasetNode for Dataset {
    type Value = Value;

    fn attribute(&self, tag: Tag) -> Option<Attribute<'_, Self>> {
        self.elements.get(&tag).map(|element| match element {
            Element::Values(values) => Attribute::Values(values.as_slice()),
            Element::Sequence(items) => Attribute::Sequence(items.as_slice()),
        })
    }
}
