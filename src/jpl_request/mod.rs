//! Acquisition of raw ephemeris text.
//!
//! The parser only needs one opaque text blob per request. [`RawTextSource`] is the seam
//! between the data model and whatever produces that blob: [`horizons_api::HorizonsApi`] for
//! the NASA/JPL Horizons service, a closure or a fixture in tests.

pub mod horizons_api;
pub mod horizons_faults;

use crate::ephemeris::request::EphemerisRequest;
use crate::sunspot_errors::SunspotError;

/// Provider of the raw text of an ephemeris request
pub trait RawTextSource {
    /// Fetch the complete text response for `request`
    fn fetch(&self, request: &EphemerisRequest) -> Result<String, SunspotError>;
}

impl<F> RawTextSource for F
where
    F: Fn(&EphemerisRequest) -> Result<String, SunspotError>,
{
    fn fetch(&self, request: &EphemerisRequest) -> Result<String, SunspotError> {
        self(request)
    }
}
