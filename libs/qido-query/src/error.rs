//! Error types for QIDO query parsing

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Query front-end errors
///
/// Everything except [`Error::InvalidArgument`], [`Error::InvalidResourceLevel`],
/// [`Error::Dictionary`] and [`Error::InvalidDatasetJson`] is a parse error: the
/// request itself is malformed and the whole parse is abandoned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid query resource level: {0}")]
    InvalidResourceLevel(String),

    #[error("Unknown query parameter '{0}'")]
    UnknownParameter(String),

    #[error("Unknown attribute '{0}' in includefield")]
    IncludeFieldUnknownAttribute(String),

    #[error("Unknown attribute '{0}'")]
    UnknownAttribute(String),

    #[error("Invalid fuzzymatching value '{0}'. Expected 'true' or 'false'")]
    InvalidFuzzyMatch(String),

    #[error("Invalid limit value '{0}'. Expected a non-negative integer")]
    InvalidLimit(String),

    #[error("Requested limit {requested} exceeds the maximum result count of {maximum}")]
    LimitExceeded { requested: usize, maximum: usize },

    #[error("Invalid offset value '{0}'. Expected an integer")]
    InvalidOffset(String),

    #[error("Invalid date value '{value}' for attribute {keyword}. Expected format YYYYMMDD")]
    InvalidDate { value: String, keyword: String },

    #[error("Unsupported search parameter '{0}' for this query level")]
    UnsupportedSearchParameter(String),

    #[error("Duplicate query parameter '{0}'")]
    DuplicateParameter(String),

    #[error("Dictionary error: {0}")]
    Dictionary(String),

    #[error("Invalid DICOM JSON: {0}")]
    InvalidDatasetJson(String),
}

impl Error {
    /// Whether this error describes a malformed request rather than a caller bug.
    pub fn is_parse_error(&self) -> bool {
        !matches!(
            self,
            Error::InvalidArgument(_)
                | Error::InvalidResourceLevel(_)
                | Error::Dictionary(_)
                | Error::InvalidDatasetJson(_)
        )
    }
}
