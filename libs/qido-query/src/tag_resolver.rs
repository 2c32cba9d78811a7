//! Attribute identifier resolution
//!
//! Resolves the textual form of an attribute, either its keyword
//! (`PatientName`) or its compact tag number (`00100010`), to a registered
//! dictionary entry.

use crate::dictionary::{AttributeDictionary, DictionaryEntry};
use crate::tag::Tag;

/// Resolves attribute text against an [`AttributeDictionary`].
///
/// Failures raised by the dictionary during keyword lookup are logged and
/// treated as "not found"; they never reach the caller.
#[derive(Clone, Copy)]
pub struct TagResolver<'a> {
    dictionary: &'a dyn AttributeDictionary,
}

impl<'a> TagResolver<'a> {
    pub fn new(dictionary: &'a dyn AttributeDictionary) -> Self {
        Self { dictionary }
    }

    /// Resolve `text` to a registered attribute.
    ///
    /// Keyword lookup is attempted first, then the `GGGGEEEE` tag number form.
    /// Tag numbers the dictionary reports as unknown or as private creators
    /// are rejected.
    pub fn try_resolve(&self, text: &str) -> Option<DictionaryEntry> {
        match self.dictionary.lookup_keyword(text) {
            Ok(Some(entry)) if entry.is_standard() => return Some(entry),
            Ok(_) => {}
            Err(err) => {
                tracing::debug!(
                    attribute = text,
                    error = %err,
                    "Dictionary keyword lookup failed, treating attribute as unknown"
                );
            }
        }

        self.resolve_tag_number(text)
    }

    /// Resolve `text` and return only the tag.
    pub fn resolve_tag(&self, text: &str) -> Option<Tag> {
        self.try_resolve(text).map(|entry| entry.tag)
    }

    fn resolve_tag_number(&self, text: &str) -> Option<DictionaryEntry> {
        let tag = Tag::from_hex(text)?;
        match self.dictionary.lookup_tag(tag) {
            Some(entry) if entry.is_standard() => Some(entry),
            Some(entry) => {
                tracing::debug!(tag = %tag, kind = ?entry.kind, "Rejected non-standard tag number");
                None
            }
            None => {
                tracing::debug!(tag = %tag, "Tag number not present in dictionary");
                None
            }
        }
    }
}

impl std::fmt::Debug for TagResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagResolver").finish_non_exhaustive()
    }
}
