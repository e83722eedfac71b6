//! # Sunspot
//!
//! Light-weight ephemeris engine for automated telescope guidance and astronomical observation.
//!
//! * [`ephemeris`] – validated requests, parsing of the NASA/JPL Horizons observer table into
//!   chronological columns, column access and correspondence lookup.
//! * [`tracker`] – real-time scheduler invoking user callbacks before, at and after each row
//!   timestamp.
//! * [`jpl_request`] – acquisition of the raw text (Horizons HTTP API or any
//!   [`RawTextSource`](jpl_request::RawTextSource)).
//!
//! Horizons is operated by NASA/JPL, see <https://ssd.jpl.nasa.gov/horizons/manual.html>.

pub mod constants;
pub mod conversion;
pub mod env_state;
pub mod ephemeris;
pub mod jpl_request;
pub mod sunspot_errors;
pub mod time;
pub mod tracker;

pub use ephemeris::table::Correspondence;
pub use ephemeris::Ephemeris;
pub use sunspot_errors::{ParseError, SunspotError};
pub use tracker::{RowView, Tracker, TrackerCallbacks, TrackerOptions};
