//! Parameter value parsers
//!
//! Each parser receives the already-trimmed first value of a parameter (or
//! `None` when the parameter carried no value) and reports failures with the
//! offending text.

use crate::{Error, Result};
use chrono::NaiveDate;

/// `chrono` format of DICOM `DA` values.
pub const DATE_FORMAT: &str = "%Y%m%d";

pub fn parse_fuzzy_matching(value: Option<&str>) -> Result<bool> {
    let text = value.unwrap_or_default();
    if text.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if text.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(Error::InvalidFuzzyMatch(text.to_string()))
    }
}

/// Parse a `limit` value, rejecting anything above `maximum`.
pub fn parse_limit(value: Option<&str>, maximum: usize) -> Result<usize> {
    let text = value.unwrap_or_default();
    let requested: usize = text
        .parse()
        .map_err(|_| Error::InvalidLimit(text.to_string()))?;

    if requested > maximum {
        return Err(Error::LimitExceeded { requested, maximum });
    }

    Ok(requested)
}

/// Parse an `offset` value. Any integer is accepted, including negative ones.
pub fn parse_offset(value: Option<&str>) -> Result<i64> {
    let text = value.unwrap_or_default();
    text.parse()
        .map_err(|_| Error::InvalidOffset(text.to_string()))
}

/// Parse a `YYYYMMDD` date: exactly eight digits forming a real calendar date.
pub fn parse_date_value(text: &str) -> Option<NaiveDate> {
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

/// Validate a date filter value for the attribute named `keyword`.
pub fn parse_date(text: &str, keyword: &str) -> Result<NaiveDate> {
    parse_date_value(text).ok_or_else(|| Error::InvalidDate {
        value: text.to_string(),
        keyword: keyword.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuzzy_matching_accepts_boolean_literals_only() {
        assert!(parse_fuzzy_matching(Some("true")).unwrap());
        assert!(parse_fuzzy_matching(Some("True")).unwrap());
        assert!(!parse_fuzzy_matching(Some("false")).unwrap());
        assert_eq!(
            parse_fuzzy_matching(Some("yes")),
            Err(Error::InvalidFuzzyMatch("yes".into()))
        );
        assert_eq!(
            parse_fuzzy_matching(Some("1")),
            Err(Error::InvalidFuzzyMatch("1".into()))
        );
        assert_eq!(
            parse_fuzzy_matching(None),
            Err(Error::InvalidFuzzyMatch(String::new()))
        );
    }

    #[test]
    fn limit_is_bounded() {
        assert_eq!(parse_limit(Some("0"), 100), Ok(0));
        assert_eq!(parse_limit(Some("100"), 100), Ok(100));
        assert_eq!(
            parse_limit(Some("101"), 100),
            Err(Error::LimitExceeded {
                requested: 101,
                maximum: 100
            })
        );
    }

    #[test]
    fn limit_rejects_non_numeric_and_negative() {
        assert_eq!(parse_limit(Some("ten"), 100), Err(Error::InvalidLimit("ten".into())));
        assert_eq!(parse_limit(Some("-1"), 100), Err(Error::InvalidLimit("-1".into())));
        assert_eq!(parse_limit(None, 100), Err(Error::InvalidLimit(String::new())));
    }

    #[test]
    fn offset_parses_integers() {
        assert_eq!(parse_offset(Some("25")), Ok(25));
        assert_eq!(parse_offset(Some("abc")), Err(Error::InvalidOffset("abc".into())));
        assert_eq!(parse_offset(Some("-5")), Ok(-5));
        assert_eq!(parse_offset(Some("1.5")), Err(Error::InvalidOffset("1.5".into())));
        assert_eq!(parse_offset(None), Err(Error::InvalidOffset(String::new())));
    }

    #[test]
    fn dates_use_fixed_format() {
        assert_eq!(
            parse_date_value("20190105"),
            NaiveDate::from_ymd_opt(2019, 1, 5)
        );
        assert_eq!(parse_date_value("2019-01-05"), None);
        assert_eq!(parse_date_value("201901051"), None);
        assert_eq!(parse_date_value("20190230"), None);
        assert_eq!(parse_date_value("2019010a"), None);
        assert_eq!(parse_date_value(""), None);
    }

    #[test]
    fn invalid_date_names_value_and_keyword() {
        let err = parse_date("2019-01-01", "StudyDate").unwrap_err();
        assert_eq!(
            err,
            Error::InvalidDate {
                value: "2019-01-01".into(),
                keyword: "StudyDate".into()
            }
        );
        let message = err.to_string();
        assert!(message.contains("2019-01-01"));
        assert!(message.contains("StudyDate"));
    }
}
