//! Value representations

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// DICOM value representation (PS3.5 section 6.2).
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vr {
    AE,
    AS,
    AT,
    CS,
    DA,
    DS,
    DT,
    FD,
    FL,
    IS,
    LO,
    LT,
    OB,
    OD,
    OF,
    OL,
    OV,
    OW,
    PN,
    SH,
    SL,
    SQ,
    SS,
    ST,
    SV,
    TM,
    UC,
    UI,
    UL,
    UN,
    UR,
    US,
    UT,
    UV,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVrError(pub String);

impl fmt::Display for ParseVrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value representation '{}'", self.0)
    }
}

impl std::error::Error for ParseVrError {}

impl Vr {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AE => "AE",
            Self::AS => "AS",
            Self::AT => "AT",
            Self::CS => "CS",
            Self::DA => "DA",
            Self::DS => "DS",
            Self::DT => "DT",
            Self::FD => "FD",
            Self::FL => "FL",
            Self::IS => "IS",
            Self::LO => "LO",
            Self::LT => "LT",
            Self::OB => "OB",
            Self::OD => "OD",
            Self::OF => "OF",
            Self::OL => "OL",
            Self::OV => "OV",
            Self::OW => "OW",
            Self::PN => "PN",
            Self::SH => "SH",
            Self::SL => "SL",
            Self::SQ => "SQ",
            Self::SS => "SS",
            Self::ST => "ST",
            Self::SV => "SV",
            Self::TM => "TM",
            Self::UC => "UC",
            Self::UI => "UI",
            Self::UL => "UL",
            Self::UN => "UN",
            Self::UR => "UR",
            Self::US => "US",
            Self::UT => "UT",
            Self::UV => "UV",
        }
    }

    /// Numeric VRs whose DICOM JSON values are JSON numbers.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::DS
                | Self::FD
                | Self::FL
                | Self::IS
                | Self::SL
                | Self::SS
                | Self::SV
                | Self::UL
                | Self::US
                | Self::UV
        )
    }
}

impl FromStr for Vr {
    type Err = ParseVrError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let vr = match s {
            "AE" => Self::AE,
            "AS" => Self::AS,
            "AT" => Self::AT,
            "CS" => Self::CS,
            "DA" => Self::DA,
            "DS" => Self::DS,
            "DT" => Self::DT,
            "FD" => Self::FD,
            "FL" => Self::FL,
            "IS" => Self::IS,
            "LO" => Self::LO,
            "LT" => Self::LT,
            "OB" => Self::OB,
            "OD" => Self::OD,
            "OF" => Self::OF,
            "OL" => Self::OL,
            "OV" => Self::OV,
            "OW" => Self::OW,
            "PN" => Self::PN,
            "SH" => Self::SH,
            "SL" => Self::SL,
            "SQ" => Self::SQ,
            "SS" => Self::SS,
            "ST" => Self::ST,
            "SV" => Self::SV,
            "TM" => Self::TM,
            "UC" => Self::UC,
            "UI" => Self::UI,
            "UL" => Self::UL,
            "UN" => Self::UN,
            "UR" => Self::UR,
            "US" => Self::US,
            "UT" => Self::UT,
            "UV" => Self::UV,
            other => return Err(ParseVrError(other.to_string())),
        };
        Ok(vr)
    }
}

impl fmt::Display for Vr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Vr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes() {
        assert_eq!("DA".parse::<Vr>(), Ok(Vr::DA));
        assert_eq!("SQ".parse::<Vr>(), Ok(Vr::SQ));
        assert_eq!(Vr::PN.to_string(), "PN");
    }

    #[test]
    fn codes_are_case_sensitive() {
        assert!("da".parse::<Vr>().is_err());
        assert!("XX".parse::<Vr>().is_err());
    }
}
