use thiserror::Error;

/// Failure to turn a Horizons text blob into a [`Table`](crate::ephemeris::table::Table).
///
/// Every variant except [`ParseError::EmptyResult`] is a *format* error: the layout of the
/// text could not be recognized. `EmptyResult` means the layout was fine (or the provider
/// answered with a known fault) but there is no data to expose.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Missing data block marker: {0}")]
    MissingMarker(&'static str),

    #[error("No column header found above the data block")]
    MissingHeader,

    #[error("Duplicate column title: {0}")]
    DuplicateTitle(String),

    #[error("Line {line} of the data block has {found} fields, header has {expected}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Record-level error of the csv reader. Rows are read flexibly from UTF-8 text, so a bad
    /// field count surfaces as [`ParseError::FieldCount`] instead.
    #[error("Malformed data line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("No ephemeris rows available: {0}")]
    EmptyResult(String),

    #[error("Unreadable date at row {row}: {value}")]
    InvalidDate { row: usize, value: String },

    #[error("Dates are not strictly increasing at row {row}: {previous} then {current}")]
    NonChronological {
        row: usize,
        previous: String,
        current: String,
    },
}

impl ParseError {
    /// True when the text was understood but carried no rows.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, ParseError::EmptyResult(_))
    }

    /// True when the layout of the text could not be recognized.
    pub fn is_format_error(&self) -> bool {
        !self.is_empty_result()
    }
}

#[derive(Error, Debug)]
pub enum SunspotError {
    #[error("Invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("Ephemeris data error: {0}")]
    EphemerisData(#[from] ParseError),

    #[error("Unknown column title: {0}")]
    UnknownColumn(String),

    #[error("No ephemeris row is in the future (last row at {last_row})")]
    NoFutureEvent { last_row: String },

    #[error("Value `{value}` of column {title} cannot be converted")]
    InvalidValue { title: String, value: String },

    #[error("Unable to read the system clock: {0}")]
    Time(String),

    #[error("HTTP reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Unable to perform I/O operation: {0}")]
    IoError(#[from] std::io::Error),
}

impl SunspotError {
    pub(crate) fn invalid_parameter(field: &'static str, reason: impl Into<String>) -> Self {
        SunspotError::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }
}

impl From<hifitime::HifitimeError> for SunspotError {
    fn from(err: hifitime::HifitimeError) -> Self {
        SunspotError::Time(err.to_string())
    }
}

impl PartialEq for SunspotError {
    fn eq(&self, other: &Self) -> bool {
        use SunspotError::*;
        match (self, other) {
            (
                InvalidParameter {
                    field: f1,
                    reason: r1,
                },
                InvalidParameter {
                    field: f2,
                    reason: r2,
                },
            ) => f1 == f2 && r1 == r2,
            (EphemerisData(a), EphemerisData(b)) => a == b,
            (UnknownColumn(a), UnknownColumn(b)) => a == b,
            (NoFutureEvent { last_row: a }, NoFutureEvent { last_row: b }) => a == b,
            (
                InvalidValue {
                    title: t1,
                    value: v1,
                },
                InvalidValue {
                    title: t2,
                    value: v2,
                },
            ) => t1 == t2 && v1 == v2,
            (Time(a), Time(b)) => a == b,

            // foreign payloads are not comparable: same variant is enough
            (ReqwestError(_), ReqwestError(_)) => true,
            (IoError(_), IoError(_)) => true,

            _ => false,
        }
    }
}

#[cfg(test)]
mod sunspot_errors_test {
    use super::*;

    #[test]
    fn test_parse_error_kind() {
        assert!(ParseError::EmptyResult("nothing".into()).is_empty_result());
        assert!(ParseError::MissingHeader.is_format_error());
        assert!(ParseError::MissingMarker("$$SOE").is_format_error());

        let malformed = ParseError::Malformed {
            line: 49,
            reason: "invalid record".into(),
        };
        assert!(malformed.is_format_error());
        assert!(!malformed.is_empty_result());
        assert_eq!(
            malformed.to_string(),
            "Malformed data line 49: invalid record"
        );
    }

    #[test]
    fn test_error_from_parse_error() {
        let err: SunspotError = ParseError::MissingHeader.into();
        assert_eq!(err, SunspotError::EphemerisData(ParseError::MissingHeader));
        assert_ne!(err, SunspotError::UnknownColumn("foo".into()));
    }

    #[test]
    fn test_display_names_the_field() {
        let err = SunspotError::invalid_parameter("step_size", "unit `week` is not supported");
        assert_eq!(
            err.to_string(),
            "Invalid parameter `step_size`: unit `week` is not supported"
        );
    }
}
