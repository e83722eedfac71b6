//! # Ephemeris: validated request, parsed table, data access
//!
//! An [`Ephemeris`] is the time-ordered table of observer quantities computed by the provider
//! for one target, one observer site and one time range. It is built once per request and is
//! immutable afterwards, so it can be shared (`Arc<Ephemeris>`) with any number of
//! [`Tracker`](crate::tracker::Tracker)s.
//!
//! ## Building
//!
//! 1. [`EphemerisRequest::new`] validates the textual parameters (times, step, site,
//!    target, quantities) before any external call.
//! 2. A [`RawTextSource`] turns the request into the provider text
//!    ([`HorizonsApi`] for the real service).
//! 3. [`parse_table`] turns the text into a [`Table`]; the dates are then checked to be
//!    strictly increasing.
//!
//! ```rust, no_run
//! use sunspot::ephemeris::Ephemeris;
//!
//! let ephemeris = Ephemeris::from_horizons(
//!     "2023-06-18 19:26:00",
//!     "2023-06-18 20:26:00",
//!     "-71.332597,42.458790,0.041",
//!     "1 m",
//!     "10",
//!     None,
//! )
//! .unwrap();
//!
//! let first = &ephemeris.dates().unwrap()[0];
//! let azimuth = ephemeris.find_corresponding("Azi____(a-app)___Elev", "Date__(UT)__HR:MN:SS", first);
//! ```
//!
//! ## Errors
//!
//! * [`SunspotError::InvalidParameter`] for a malformed request,
//! * [`SunspotError::EphemerisData`] when the text cannot be parsed or holds no row,
//! * [`SunspotError::UnknownColumn`] for a title absent from the table.

pub mod parser;
pub mod request;
pub mod table;

use hifitime::Epoch;
use log::info;

use crate::constants::DATE_TITLE;
use crate::conversion::{column_to_epochs, column_to_f64};
use crate::jpl_request::horizons_api::HorizonsApi;
use crate::jpl_request::RawTextSource;
use crate::sunspot_errors::{ParseError, SunspotError};
use crate::time::parse_horizons_date;

use parser::parse_table;
use request::EphemerisRequest;
use table::{Correspondence, Table};

#[derive(Debug, Clone, PartialEq)]
pub struct Ephemeris {
    request: EphemerisRequest,
    raw_data: String,
    table: Table,
    date_title: String,
}

/// Check that the date column is made of readable, strictly increasing dates
fn check_chronology(dates: &[String]) -> Result<(), ParseError> {
    let mut previous: Option<(Epoch, &String)> = None;
    for (row, value) in dates.iter().enumerate() {
        let epoch = parse_horizons_date(value).ok_or_else(|| ParseError::InvalidDate {
            row,
            value: value.clone(),
        })?;
        if let Some((prev_epoch, prev_value)) = previous {
            if epoch <= prev_epoch {
                return Err(ParseError::NonChronological {
                    row,
                    previous: prev_value.clone(),
                    current: value.clone(),
                });
            }
        }
        previous = Some((epoch, value));
    }
    Ok(())
}

impl Ephemeris {
    /// Acquire and parse the ephemeris of `request`
    ///
    /// Arguments
    /// ---------
    /// * `request`: the validated request
    /// * `source`: the provider of the raw text
    ///
    /// Return
    /// ------
    /// * the ephemeris, the error of the source, or [`SunspotError::EphemerisData`]
    pub fn new(request: EphemerisRequest, source: &impl RawTextSource) -> Result<Self, SunspotError> {
        let raw_data = source.fetch(&request)?;
        Ephemeris::from_text(request, raw_data)
    }

    /// Build the ephemeris of `request` from text that was already acquired
    pub fn from_text(request: EphemerisRequest, raw_data: String) -> Result<Self, SunspotError> {
        let table = parse_table(&raw_data)?;

        let date_title = if table.contains_title(DATE_TITLE) {
            DATE_TITLE.to_string()
        } else {
            table.titles()[0].clone()
        };
        check_chronology(table.column_by_title(&date_title)?)?;

        info!(
            "ephemeris of target {}: {} rows, columns {:?}",
            request.target,
            table.len(),
            table.titles()
        );

        Ok(Ephemeris {
            request,
            raw_data,
            table,
            date_title,
        })
    }

    /// Validate the parameters, query Horizons and parse the answer
    ///
    /// Arguments
    /// ---------
    /// * `start_time`, `stop_time`: `YYYY-MM-DD HH:MM:SS`
    /// * `observer_location`: `"longitude,latitude,elevation_km"`
    /// * `step_size`: `"n unit"`, e.g. `"1 minute"` or `"1 d"`
    /// * `target_body`: Horizons target identifier, e.g. `"10"` for the Sun
    /// * `quantities`: Horizons quantity codes, `None` for `"1,2,4"`
    pub fn from_horizons(
        start_time: &str,
        stop_time: &str,
        observer_location: &str,
        step_size: &str,
        target_body: &str,
        quantities: Option<&str>,
    ) -> Result<Self, SunspotError> {
        let request = EphemerisRequest::new(
            start_time,
            stop_time,
            observer_location,
            step_size,
            target_body,
            quantities,
        )?;
        Ephemeris::new(request, &HorizonsApi::with_default_config()?)
    }

    pub fn request(&self) -> &EphemerisRequest {
        &self.request
    }

    /// The unparsed provider text, kept for diagnostics
    pub fn raw_data(&self) -> &str {
        &self.raw_data
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Column titles, in provider order
    pub fn data_titles(&self) -> &[String] {
        self.table.titles()
    }

    pub fn date_title(&self) -> &str {
        &self.date_title
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Ephemeris dates, in chronological order
    pub fn dates(&self) -> Result<&[String], SunspotError> {
        self.table.column_by_title(&self.date_title)
    }

    /// Get the data of a column, in chronological order
    ///
    /// Argument
    /// --------
    /// * `title`: a column title, e.g. `"Date__(UT)__HR:MN:SS"`
    pub fn get_column_data(&self, title: &str) -> Result<&[String], SunspotError> {
        self.table.column_by_title(title)
    }

    /// Retrieve the value(s) of `target_title` on the rows where `source_title` holds `value`,
    /// see [`Table::correspond`]
    pub fn find_corresponding(
        &self,
        target_title: &str,
        source_title: &str,
        value: &str,
    ) -> Result<Correspondence<'_>, SunspotError> {
        self.table.correspond(target_title, source_title, value)
    }

    /// Dates as UTC epochs
    pub fn epochs(&self) -> Result<Vec<Epoch>, SunspotError> {
        column_to_epochs(&self.date_title, self.dates()?)
    }

    /// A column as floats, `None` where a value is not numeric (`n.a.`, flags...)
    pub fn numeric_column(&self, title: &str) -> Result<Vec<Option<f64>>, SunspotError> {
        Ok(column_to_f64(self.get_column_data(title)?))
    }
}
