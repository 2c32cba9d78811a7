//! Attribute identifiers (tag paths)

use crate::tag::Tag;
use crate::tag_resolver::TagResolver;
use crate::{Error, Result};
use smallvec::SmallVec;
use std::fmt;

/// Ordered, non-empty sequence of tags naming a route through nested
/// sequences. The last tag is the target attribute; the preceding tags are
/// the sequences to descend through.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeId {
    tags: SmallVec<[Tag; 4]>,
}

impl AttributeId {
    /// Build a path from `tags`. An empty path is an argument error.
    pub fn new<I>(tags: I) -> Result<Self>
    where
        I: IntoIterator<Item = Tag>,
    {
        let tags: SmallVec<[Tag; 4]> = tags.into_iter().collect();
        if tags.is_empty() {
            return Err(Error::InvalidArgument(
                "attribute path must contain at least one tag".to_string(),
            ));
        }
        Ok(Self { tags })
    }

    /// Parse a dotted path such as `ReferencedStudySequence.StudyDate` or
    /// `00081110.00080020`. Keyword and tag number segments may be mixed.
    pub fn parse(text: &str, resolver: &TagResolver<'_>) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidArgument(
                "attribute path must not be empty".to_string(),
            ));
        }

        let tags = text
            .split('.')
            .map(|segment| {
                let segment = segment.trim();
                resolver
                    .resolve_tag(segment)
                    .ok_or_else(|| Error::UnknownAttribute(segment.to_string()))
            })
            .collect::<Result<SmallVec<[Tag; 4]>>>()?;

        Self::new(tags)
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Number of tags in the path.
    pub fn depth(&self) -> usize {
        self.tags.len()
    }

    /// The attribute the path points at.
    pub fn target(&self) -> Tag {
        self.tags[self.tags.len() - 1]
    }

    /// Sequences traversed before reaching the target.
    pub fn containers(&self) -> &[Tag] {
        &self.tags[..self.tags.len() - 1]
    }
}

impl From<Tag> for AttributeId {
    fn from(tag: Tag) -> Self {
        let mut tags = SmallVec::new();
        tags.push(tag);
        Self { tags }
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, tag) in self.tags.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            f.write_str(&tag.to_hex())?;
        }
        Ok(())
    }
}
