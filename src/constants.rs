//! # Constants for Sunspot
//!
//! This module centralizes the **provider constants** (Horizons block markers, field delimiter,
//! date column title), the **request limits** enforced before any network call, and the
//! **default values** shared by the acquisition and tracking layers.

use std::time::Duration;

// -------------------------------------------------------------------------------------------------
// Horizons text layout
// -------------------------------------------------------------------------------------------------

/// Marker line opening the data block of a Horizons text response ("Start Of Ephemeris")
pub const START_OF_EPHEMERIS: &str = "$$SOE";

/// Marker line closing the data block of a Horizons text response ("End Of Ephemeris")
pub const END_OF_EPHEMERIS: &str = "$$EOE";

/// Field delimiter used by Horizons when `CSV_FORMAT='YES'`
pub const FIELD_DELIMITER: u8 = b',';

/// Title of the date column in an observer table with `CAL_FORMAT='CAL'`
pub const DATE_TITLE: &str = "Date__(UT)__HR:MN:SS";

// -------------------------------------------------------------------------------------------------
// Request parameters
// -------------------------------------------------------------------------------------------------

/// Format of the start and stop times accepted by [`EphemerisRequest`](crate::ephemeris::request::EphemerisRequest)
pub const DATA_FORMAT: &str = "YYYY-MM-DD HH:MM:SS";

/// Observer quantities requested when none are given: astrometric RA/DEC, apparent RA/DEC,
/// apparent azimuth/elevation
pub const DEFAULT_EPHEMERIS_QUANTITIES: &str = "1,2,4";

/// Largest number of rows Horizons prints for a single request
pub const MAX_STEP_COUNT: u32 = 90_024;

/// Default endpoint of the Horizons HTTP API
pub const HORIZONS_API_URL: &str = "https://ssd.jpl.nasa.gov/api/horizons.api";

/// Default timeout of a Horizons request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// -------------------------------------------------------------------------------------------------
// Tracker
// -------------------------------------------------------------------------------------------------

/// Longest uninterrupted sleep of a tracker worker before it re-reads the wall clock
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Name given to tracker worker threads
pub const TRACKER_THREAD_NAME: &str = "sunspot-tracker";
