//! Parsing of a Horizons text response into a [`Table`].
//!
//! A response with `CSV_FORMAT='YES'` looks like
//!
//! ```text
//! *******************************************************************************************
//!  Date__(UT)__HR:MN:SS, , , R.A.__(ICRF)__DEC, R.A.__(a-app)__DEC, Azi____(a-app)___Elev,
//! *******************************************************************************************
//! $$SOE
//!  2023-Jun-18 19:26:00, *,m, 87.92418, 23.42871, 87.95421, 23.42594, 290.39, -10.23,
//!  ...
//! $$EOE
//! *******************************************************************************************
//! ```
//!
//! The header is the closest meaningful line above `$$SOE`. Fields are separated by
//! [`FIELD_DELIMITER`]; header positions without a title (solar and lunar presence flags,
//! trailing delimiter) are part of the layout but are not exposed as columns.

use csv::{ReaderBuilder, StringRecord, Trim};
use itertools::Itertools;
use log::debug;

use crate::constants::{END_OF_EPHEMERIS, FIELD_DELIMITER, START_OF_EPHEMERIS};
use crate::jpl_request::horizons_faults::detect_horizons_fault;
use crate::sunspot_errors::ParseError;

use super::table::Table;

/// Bounds of the data block: 0-based line indices of the `$$SOE` and `$$EOE` markers
fn find_data_block(lines: &[&str]) -> Result<(usize, usize), ParseError> {
    let soe = lines
        .iter()
        .position(|l| l.trim() == START_OF_EPHEMERIS)
        .ok_or(ParseError::MissingMarker(START_OF_EPHEMERIS))?;
    let eoe = lines[soe + 1..]
        .iter()
        .position(|l| l.trim() == END_OF_EPHEMERIS)
        .map(|offset| soe + 1 + offset)
        .ok_or(ParseError::MissingMarker(END_OF_EPHEMERIS))?;
    Ok((soe, eoe))
}

fn is_separator(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.chars().all(|c| c == '*')
}

fn fields_reader(text: &str) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(FIELD_DELIMITER)
        .from_reader(text.as_bytes())
}

/// Header fields in layout order, empty strings for untitled positions
fn parse_header(lines: &[&str], soe: usize) -> Result<Vec<String>, ParseError> {
    let header_line = lines[..soe]
        .iter()
        .rev()
        .find(|l| !is_separator(l))
        .ok_or(ParseError::MissingHeader)?;

    let record = fields_reader(header_line)
        .records()
        .next()
        .ok_or(ParseError::MissingHeader)?
        .map_err(|_| ParseError::MissingHeader)?;

    let fields: Vec<String> = record.iter().map(str::to_string).collect();
    if fields.iter().all(String::is_empty) {
        return Err(ParseError::MissingHeader);
    }
    Ok(fields)
}

fn keep_titled(record: &StringRecord, layout: &[String]) -> Vec<String> {
    record
        .iter()
        .zip(layout)
        .filter(|(_, title)| !title.is_empty())
        .map(|(value, _)| value.to_string())
        .collect()
}

/// Parse a Horizons text response into a [`Table`]
///
/// Argument
/// --------
/// * `raw`: the complete text returned by the provider
///
/// Return
/// ------
/// * the table of every titled column, rows in the order of the response
/// * [`ParseError::EmptyResult`] if the block has no row, or if the provider answered with a
///   known fault instead of data
/// * any other [`ParseError`] if the header or data block layout is not recognized
pub fn parse_table(raw: &str) -> Result<Table, ParseError> {
    let lines: Vec<&str> = raw.lines().collect();

    let (soe, eoe) = match find_data_block(&lines) {
        Ok(bounds) => bounds,
        Err(err) => {
            return Err(match detect_horizons_fault(raw) {
                Some(fault) => ParseError::EmptyResult(fault),
                None => err,
            })
        }
    };

    let layout = parse_header(&lines, soe)?;
    let titles: Vec<String> = layout.iter().filter(|t| !t.is_empty()).cloned().collect();

    let block = lines[soe + 1..eoe].join("\n");
    let mut rows = Vec::with_capacity(eoe - soe - 1);
    for record in fields_reader(&block).records() {
        let record = record.map_err(|err| ParseError::Malformed {
            line: soe + 1 + err.position().map_or(0, |p| p.line() as usize),
            reason: err.to_string(),
        })?;
        let line = soe + 1 + record.position().map_or(0, |p| p.line() as usize);

        if record.len() != layout.len() {
            return Err(ParseError::FieldCount {
                line,
                expected: layout.len(),
                found: record.len(),
            });
        }
        rows.push(keep_titled(&record, &layout));
    }

    if rows.is_empty() {
        return Err(ParseError::EmptyResult(
            detect_horizons_fault(raw)
                .unwrap_or_else(|| "the data block contains no row".to_string()),
        ));
    }

    debug!(
        "parsed ephemeris table: {} rows x {} columns [{}]",
        rows.len(),
        titles.len(),
        titles.iter().join(", ")
    );
    Table::from_rows(titles, rows)
}

#[cfg(test)]
mod parser_test {
    use super::*;

    const SAMPLE: &str = "
API VERSION: 1.2
*******************************************************************************
 Date__(UT)__HR:MN:SS, , , Azi____(a-app)___Elev, Elev_(a-app),
*******************************************************************************
$$SOE
 2023-Jun-18 19:26:00, *,m, 90.128595258, 12.000000000,
 2023-Jun-18 19:27:00, *,m, 90.500000000, 12.500000000,
 2023-Jun-18 19:28:00,  , , 91.000000000, 12.500000000,
$$EOE
*******************************************************************************
";

    #[test]
    fn test_parse_sample() {
        let table = parse_table(SAMPLE).unwrap();
        assert_eq!(
            table.titles(),
            ["Date__(UT)__HR:MN:SS", "Azi____(a-app)___Elev", "Elev_(a-app)"]
        );
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.row(0),
            Some(vec!["2023-Jun-18 19:26:00", "90.128595258", "12.000000000"])
        );
        assert_eq!(
            table.column_by_title("Elev_(a-app)").unwrap()[2],
            "12.500000000"
        );
    }

    #[test]
    fn test_missing_markers() {
        assert_eq!(
            parse_table("Date, Azi,\n 2023-Jun-18 19:26:00, 1,\n"),
            Err(ParseError::MissingMarker("$$SOE"))
        );
        assert_eq!(
            parse_table("Date, Azi,\n$$SOE\n 2023-Jun-18 19:26:00, 1,\n"),
            Err(ParseError::MissingMarker("$$EOE"))
        );
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(
            parse_table("*****\n$$SOE\n 2023-Jun-18 19:26:00, 1,\n$$EOE\n"),
            Err(ParseError::MissingHeader)
        );
    }

    #[test]
    fn test_field_count_mismatch() {
        let raw = "Date, Azi,\n$$SOE\n 2023-Jun-18 19:26:00, 1,\n 2023-Jun-18 19:27:00, 1, 2,\n$$EOE\n";
        assert_eq!(
            parse_table(raw),
            Err(ParseError::FieldCount {
                line: 4,
                expected: 3,
                found: 4
            })
        );
    }

    #[test]
    fn test_empty_block() {
        let err = parse_table("Date, Azi,\n$$SOE\n$$EOE\n").unwrap_err();
        assert!(err.is_empty_result());
    }

    #[test]
    fn test_provider_fault_is_empty_result() {
        let raw = "API VERSION: 1.2\n Cannot use print-out interval <= zero\n";
        let err = parse_table(raw).unwrap_err();
        assert!(err.is_empty_result());
        assert!(err.to_string().contains("print-out interval"));
    }

    #[test]
    fn test_duplicate_titles() {
        let raw = "Date, Azi, Azi,\n$$SOE\n 2023-Jun-18 19:26:00, 1, 2,\n$$EOE\n";
        assert_eq!(
            parse_table(raw),
            Err(ParseError::DuplicateTitle("Azi".into()))
        );
    }
}
