//! Typed views over raw table values.
//!
//! Horizons columns are kept as text by the parser. The helpers below convert on demand so that
//! unknown or annotated formats are never lost: a value that does not convert is reported as
//! `None` (or an error, for the strict variants) instead of being rewritten.

use hifitime::Epoch;

use crate::sunspot_errors::SunspotError;
use crate::time::parse_horizons_date;

/// Placeholders Horizons prints when a quantity is not available for a row
const NOT_AVAILABLE: [&str; 3] = ["n.a.", "n.a", "NaN"];

/// Parse a numeric table value
///
/// Return
/// ------
/// * `None` for empty values, provider placeholders (`n.a.`) and any non numeric text
pub fn parse_f64(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() || NOT_AVAILABLE.contains(&value) {
        return None;
    }
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Convert a whole column to floats, keeping row positions
pub fn column_to_f64(values: &[String]) -> Vec<Option<f64>> {
    values.iter().map(|v| parse_f64(v)).collect()
}

/// Convert a date column to epochs; the first unreadable value is an error
pub fn column_to_epochs(title: &str, values: &[String]) -> Result<Vec<Epoch>, SunspotError> {
    values
        .iter()
        .map(|v| {
            parse_horizons_date(v).ok_or_else(|| SunspotError::InvalidValue {
                title: title.to_string(),
                value: v.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod conversion_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_f64() {
        assert_relative_eq!(parse_f64(" 90.128595258").unwrap(), 90.128595258);
        assert_relative_eq!(parse_f64("-12.5").unwrap(), -12.5);
        assert_eq!(parse_f64("n.a."), None);
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("*m"), None);
    }

    #[test]
    fn test_column_to_epochs() {
        let dates = vec![
            "2023-Jun-18 19:26:00".to_string(),
            "2023-Jun-18 19:27:00".to_string(),
        ];
        let epochs = column_to_epochs("Date", &dates).unwrap();
        assert_eq!((epochs[1] - epochs[0]).to_seconds(), 60.0);

        let bad = vec!["yesterday".to_string()];
        assert_eq!(
            column_to_epochs("Date", &bad),
            Err(SunspotError::InvalidValue {
                title: "Date".into(),
                value: "yesterday".into()
            })
        );
    }
}
