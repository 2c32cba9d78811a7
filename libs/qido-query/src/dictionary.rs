//! Attribute dictionary
//!
//! Maps attribute keywords and tag numbers to dictionary entries. The
//! dictionary is a collaborator: callers may plug in a full data dictionary
//! through [`AttributeDictionary`]; [`StandardDictionary`] ships the subset of
//! PS3.6 attributes a QIDO-RS service deals with.
//!
//! Uses a compile-time perfect hash map (phf) for keyword lookups.

use crate::tag::Tag;
use crate::vr::Vr;
use crate::Result;
use once_cell::sync::Lazy;
use phf::phf_map;
use std::borrow::Cow;
use std::collections::HashMap;

/// Classification of a dictionary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A registered attribute.
    Standard,
    /// Sentinel returned for tags the dictionary does not know.
    Unknown,
    /// Sentinel returned for private creator data elements.
    PrivateCreator,
}

/// Dictionary entry for a single attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub tag: Tag,
    pub keyword: Cow<'static, str>,
    pub vr: Vr,
    pub kind: EntryKind,
}

impl DictionaryEntry {
    pub fn standard(tag: Tag, keyword: impl Into<Cow<'static, str>>, vr: Vr) -> Self {
        Self {
            tag,
            keyword: keyword.into(),
            vr,
            kind: EntryKind::Standard,
        }
    }

    pub fn unknown(tag: Tag) -> Self {
        Self {
            tag,
            keyword: Cow::Borrowed("Unknown"),
            vr: Vr::UN,
            kind: EntryKind::Unknown,
        }
    }

    pub fn private_creator(tag: Tag) -> Self {
        Self {
            tag,
            keyword: Cow::Borrowed("PrivateCreator"),
            vr: Vr::LO,
            kind: EntryKind::PrivateCreator,
        }
    }

    pub fn is_standard(&self) -> bool {
        self.kind == EntryKind::Standard
    }
}

/// Keyword and tag-number lookups against a data dictionary.
///
/// Keyword lookups may fail inside the implementation; callers are expected to
/// go through [`crate::TagResolver`], which never lets such a failure escape.
pub trait AttributeDictionary: Send + Sync {
    /// Look up an attribute by its keyword (e.g. `PatientName`).
    fn lookup_keyword(&self, keyword: &str) -> Result<Option<DictionaryEntry>>;

    /// Look up an attribute by tag number.
    ///
    /// Implementations may answer with the [`EntryKind::Unknown`] or
    /// [`EntryKind::PrivateCreator`] sentinels instead of `None`.
    fn lookup_tag(&self, tag: Tag) -> Option<DictionaryEntry>;
}

#[derive(Debug, Clone, Copy)]
struct StaticEntry {
    tag: Tag,
    vr: Vr,
}

const fn entry(group: u16, element: u16, vr: Vr) -> StaticEntry {
    StaticEntry {
        tag: Tag::new(group, element),
        vr,
    }
}

static ATTRIBUTES_BY_KEYWORD: phf::Map<&'static str, StaticEntry> = phf_map! {
    // SOP common and general study
    "SpecificCharacterSet" => entry(0x0008, 0x0005, Vr::CS),
    "ImageType" => entry(0x0008, 0x0008, Vr::CS),
    "InstanceCreationDate" => entry(0x0008, 0x0012, Vr::DA),
    "SOPClassUID" => entry(0x0008, 0x0016, Vr::UI),
    "SOPInstanceUID" => entry(0x0008, 0x0018, Vr::UI),
    "StudyDate" => entry(0x0008, 0x0020, Vr::DA),
    "SeriesDate" => entry(0x0008, 0x0021, Vr::DA),
    "AcquisitionDate" => entry(0x0008, 0x0022, Vr::DA),
    "ContentDate" => entry(0x0008, 0x0023, Vr::DA),
    "StudyTime" => entry(0x0008, 0x0030, Vr::TM),
    "SeriesTime" => entry(0x0008, 0x0031, Vr::TM),
    "AccessionNumber" => entry(0x0008, 0x0050, Vr::SH),
    "QueryRetrieveLevel" => entry(0x0008, 0x0052, Vr::CS),
    "InstanceAvailability" => entry(0x0008, 0x0056, Vr::CS),
    "Modality" => entry(0x0008, 0x0060, Vr::CS),
    "ModalitiesInStudy" => entry(0x0008, 0x0061, Vr::CS),
    "Manufacturer" => entry(0x0008, 0x0070, Vr::LO),
    "InstitutionName" => entry(0x0008, 0x0080, Vr::LO),
    "ReferringPhysicianName" => entry(0x0008, 0x0090, Vr::PN),
    "TimezoneOffsetFromUTC" => entry(0x0008, 0x0201, Vr::SH),
    "StudyDescription" => entry(0x0008, 0x1030, Vr::LO),
    "SeriesDescription" => entry(0x0008, 0x103E, Vr::LO),
    "ReferencedStudySequence" => entry(0x0008, 0x1110, Vr::SQ),
    "ReferencedSeriesSequence" => entry(0x0008, 0x1115, Vr::SQ),
    "ReferencedPatientSequence" => entry(0x0008, 0x1120, Vr::SQ),
    "ReferencedSOPClassUID" => entry(0x0008, 0x1150, Vr::UI),
    "ReferencedSOPInstanceUID" => entry(0x0008, 0x1155, Vr::UI),
    "RetrieveURL" => entry(0x0008, 0x1190, Vr::UR),

    // Patient
    "PatientName" => entry(0x0010, 0x0010, Vr::PN),
    "PatientID" => entry(0x0010, 0x0020, Vr::LO),
    "IssuerOfPatientID" => entry(0x0010, 0x0021, Vr::LO),
    "PatientBirthDate" => entry(0x0010, 0x0030, Vr::DA),
    "PatientSex" => entry(0x0010, 0x0040, Vr::CS),
    "OtherPatientIDsSequence" => entry(0x0010, 0x1002, Vr::SQ),
    "PatientAge" => entry(0x0010, 0x1010, Vr::AS),
    "PatientWeight" => entry(0x0010, 0x1030, Vr::DS),

    // Study, series and instance identification
    "StudyInstanceUID" => entry(0x0020, 0x000D, Vr::UI),
    "SeriesInstanceUID" => entry(0x0020, 0x000E, Vr::UI),
    "StudyID" => entry(0x0020, 0x0010, Vr::SH),
    "SeriesNumber" => entry(0x0020, 0x0011, Vr::IS),
    "InstanceNumber" => entry(0x0020, 0x0013, Vr::IS),
    "NumberOfStudyRelatedSeries" => entry(0x0020, 0x1206, Vr::IS),
    "NumberOfStudyRelatedInstances" => entry(0x0020, 0x1208, Vr::IS),
    "NumberOfSeriesRelatedInstances" => entry(0x0020, 0x1209, Vr::IS),

    // Image pixel
    "Rows" => entry(0x0028, 0x0010, Vr::US),
    "Columns" => entry(0x0028, 0x0011, Vr::US),
    "BitsAllocated" => entry(0x0028, 0x0100, Vr::US),

    // Procedure step
    "ScheduledProcedureStepID" => entry(0x0040, 0x0009, Vr::SH),
    "PerformedProcedureStepStartDate" => entry(0x0040, 0x0244, Vr::DA),
    "PerformedProcedureStepStartTime" => entry(0x0040, 0x0245, Vr::TM),
    "RequestAttributesSequence" => entry(0x0040, 0x0275, Vr::SQ),
    "RequestedProcedureID" => entry(0x0040, 0x1001, Vr::SH),

    "PixelData" => entry(0x7FE0, 0x0010, Vr::OW),
};

static KEYWORDS_BY_TAG: Lazy<HashMap<Tag, (&'static str, Vr)>> = Lazy::new(|| {
    ATTRIBUTES_BY_KEYWORD
        .entries()
        .map(|(keyword, entry)| (entry.tag, (*keyword, entry.vr)))
        .collect()
});

/// Built-in dictionary of standard attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardDictionary;

impl StandardDictionary {
    pub fn new() -> Self {
        Self
    }

    /// Number of registered attributes.
    pub fn len(&self) -> usize {
        ATTRIBUTES_BY_KEYWORD.len()
    }

    pub fn is_empty(&self) -> bool {
        ATTRIBUTES_BY_KEYWORD.is_empty()
    }

    fn is_private_creator(tag: Tag) -> bool {
        tag.is_private() && (0x0010..=0x00FF).contains(&tag.element())
    }
}

impl AttributeDictionary for StandardDictionary {
    fn lookup_keyword(&self, keyword: &str) -> Result<Option<DictionaryEntry>> {
        Ok(ATTRIBUTES_BY_KEYWORD
            .get_entry(keyword)
            .map(|(keyword, entry)| DictionaryEntry::standard(entry.tag, *keyword, entry.vr)))
    }

    fn lookup_tag(&self, tag: Tag) -> Option<DictionaryEntry> {
        if let Some(&(keyword, vr)) = KEYWORDS_BY_TAG.get(&tag) {
            return Some(DictionaryEntry::standard(tag, keyword, vr));
        }

        if Self::is_private_creator(tag) {
            Some(DictionaryEntry::private_creator(tag))
        } else {
            Some(DictionaryEntry::unknown(tag))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_is_case_sensitive() {
        let dictionary = StandardDictionary::new();
        let entry = dictionary.lookup_keyword("PatientName").unwrap().unwrap();
        assert_eq!(entry.tag, Tag::PATIENT_NAME);
        assert_eq!(entry.vr, Vr::PN);
        assert!(entry.is_standard());

        assert_eq!(dictionary.lookup_keyword("patientname").unwrap(), None);
        assert_eq!(dictionary.lookup_keyword("").unwrap(), None);
    }

    #[test]
    fn tag_lookup_returns_keyword() {
        let dictionary = StandardDictionary::new();
        let entry = dictionary.lookup_tag(Tag::STUDY_DATE).unwrap();
        assert_eq!(entry.keyword, "StudyDate");
        assert_eq!(entry.vr, Vr::DA);
    }

    #[test]
    fn tag_lookup_reports_sentinels() {
        let dictionary = StandardDictionary::new();

        let private_creator = dictionary.lookup_tag(Tag::new(0x0009, 0x0010)).unwrap();
        assert_eq!(private_creator.kind, EntryKind::PrivateCreator);

        let private_data = dictionary.lookup_tag(Tag::new(0x0009, 0x1001)).unwrap();
        assert_eq!(private_data.kind, EntryKind::Unknown);

        let unregistered = dictionary.lookup_tag(Tag::new(0x0010, 0x9999)).unwrap();
        assert_eq!(unregistered.kind, EntryKind::Unknown);
    }

    #[test]
    fn every_keyword_is_indexed_by_tag() {
        let dictionary = StandardDictionary::new();
        for (keyword, entry) in ATTRIBUTES_BY_KEYWORD.entries() {
            let by_tag = dictionary.lookup_tag(entry.tag).unwrap();
            assert_eq!(by_tag.keyword, *keyword);
        }
        assert_eq!(KEYWORDS_BY_TAG.len(), dictionary.len());
    }
}
