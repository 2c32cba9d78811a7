//! DICOM attribute tags

use serde::{Serialize, Serializer};
use std::fmt;

/// A DICOM attribute tag: a (group, element) pair of 16-bit numbers.
///
/// Tags compare and hash by their numeric value only. The keyword and value
/// representation live in the [`crate::dictionary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    group: u16,
    element: u16,
}

impl Tag {
    pub const SPECIFIC_CHARACTER_SET: Tag = Tag::new(0x0008, 0x0005);
    pub const SOP_CLASS_UID: Tag = Tag::new(0x0008, 0x0016);
    pub const SOP_INSTANCE_UID: Tag = Tag::new(0x0008, 0x0018);
    pub const STUDY_DATE: Tag = Tag::new(0x0008, 0x0020);
    pub const SERIES_DATE: Tag = Tag::new(0x0008, 0x0021);
    pub const STUDY_TIME: Tag = Tag::new(0x0008, 0x0030);
    pub const ACCESSION_NUMBER: Tag = Tag::new(0x0008, 0x0050);
    pub const MODALITY: Tag = Tag::new(0x0008, 0x0060);
    pub const MODALITIES_IN_STUDY: Tag = Tag::new(0x0008, 0x0061);
    pub const REFERRING_PHYSICIAN_NAME: Tag = Tag::new(0x0008, 0x0090);
    pub const STUDY_DESCRIPTION: Tag = Tag::new(0x0008, 0x1030);
    pub const SERIES_DESCRIPTION: Tag = Tag::new(0x0008, 0x103E);
    pub const REFERENCED_STUDY_SEQUENCE: Tag = Tag::new(0x0008, 0x1110);
    pub const REFERENCED_SERIES_SEQUENCE: Tag = Tag::new(0x0008, 0x1115);
    pub const REFERENCED_PATIENT_SEQUENCE: Tag = Tag::new(0x0008, 0x1120);
    pub const PATIENT_NAME: Tag = Tag::new(0x0010, 0x0010);
    pub const PATIENT_ID: Tag = Tag::new(0x0010, 0x0020);
    pub const PATIENT_BIRTH_DATE: Tag = Tag::new(0x0010, 0x0030);
    pub const PATIENT_SEX: Tag = Tag::new(0x0010, 0x0040);
    pub const STUDY_INSTANCE_UID: Tag = Tag::new(0x0020, 0x000D);
    pub const SERIES_INSTANCE_UID: Tag = Tag::new(0x0020, 0x000E);
    pub const STUDY_ID: Tag = Tag::new(0x0020, 0x0010);
    pub const SERIES_NUMBER: Tag = Tag::new(0x0020, 0x0011);
    pub const INSTANCE_NUMBER: Tag = Tag::new(0x0020, 0x0013);
    pub const PERFORMED_PROCEDURE_STEP_START_DATE: Tag = Tag::new(0x0040, 0x0244);
    pub const REQUEST_ATTRIBUTES_SEQUENCE: Tag = Tag::new(0x0040, 0x0275);

    pub const fn new(group: u16, element: u16) -> Self {
        Self { group, element }
    }

    pub const fn group(self) -> u16 {
        self.group
    }

    pub const fn element(self) -> u16 {
        self.element
    }

    /// Tags in odd groups belong to private data elements.
    pub const fn is_private(self) -> bool {
        self.group & 1 == 1
    }

    pub const fn to_u32(self) -> u32 {
        ((self.group as u32) << 16) | self.element as u32
    }

    pub const fn from_u32(value: u32) -> Self {
        Self::new((value >> 16) as u16, (value & 0xFFFF) as u16)
    }

    /// Parse the compact `GGGGEEEE` form (exactly eight hexadecimal digits).
    pub fn from_hex(text: &str) -> Option<Self> {
        if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let group = u16::from_str_radix(&text[..4], 16).ok()?;
        let element = u16::from_str_radix(&text[4..], 16).ok()?;
        Some(Self::new(group, element))
    }

    /// Compact `GGGGEEEE` form, as used by DICOM JSON and QIDO-RS.
    pub fn to_hex(self) -> String {
        format!("{:04X}{:04X}", self.group, self.element)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:04X},{:04X})", self.group, self.element)
    }
}

impl From<(u16, u16)> for Tag {
    fn from((group, element): (u16, u16)) -> Self {
        Self::new(group, element)
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}
