//! Validated parameters of an ephemeris request.
//!
//! Every check runs before the request reaches the provider so that a malformed argument
//! fails fast with [`SunspotError::InvalidParameter`] naming the offending field.

use std::fmt;
use std::str::FromStr;

use hifitime::Epoch;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::constants::{DEFAULT_EPHEMERIS_QUANTITIES, MAX_STEP_COUNT};
use crate::sunspot_errors::SunspotError;
use crate::time::{format_request_date, parse_request_date};

static STEP_SIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\s+([A-Za-z]+)\s*$").expect("valid step regex"));

static QUANTITIES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(,\d+)*$").expect("valid quantities regex"));

/// Time unit of a step size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepUnit {
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl StepUnit {
    /// Name forwarded to the provider
    pub fn as_str(&self) -> &'static str {
        match self {
            StepUnit::Minute => "minute",
            StepUnit::Hour => "hour",
            StepUnit::Day => "day",
            StepUnit::Month => "month",
            StepUnit::Year => "year",
        }
    }
}

impl FromStr for StepUnit {
    type Err = SunspotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minute" | "minutes" | "min" | "m" => Ok(StepUnit::Minute),
            "hour" | "hours" | "h" => Ok(StepUnit::Hour),
            "day" | "days" | "d" => Ok(StepUnit::Day),
            "month" | "months" | "mo" => Ok(StepUnit::Month),
            "year" | "years" | "y" => Ok(StepUnit::Year),
            other => Err(SunspotError::invalid_parameter(
                "step_size",
                format!("unit `{other}` is not one of minute, hour, day, month, year"),
            )),
        }
    }
}

/// Step between two ephemeris rows: `"n unit"` with `1 <= n <= 90024`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSize {
    pub count: u32,
    pub unit: StepUnit,
}

impl FromStr for StepSize {
    type Err = SunspotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = STEP_SIZE.captures(s).ok_or_else(|| {
            SunspotError::invalid_parameter("step_size", format!("`{s}` is not of the form `n unit`"))
        })?;

        let count = caps[1]
            .parse::<u32>()
            .ok()
            .filter(|n| (1..=MAX_STEP_COUNT).contains(n))
            .ok_or_else(|| {
                SunspotError::invalid_parameter(
                    "step_size",
                    format!("count `{}` is not within [1, {MAX_STEP_COUNT}]", &caps[1]),
                )
            })?;

        Ok(StepSize {
            count,
            unit: caps[2].parse()?,
        })
    }
}

impl fmt::Display for StepSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.count, self.unit.as_str())
    }
}

/// Geodetic observer site on Earth
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObserverLocation {
    /// East longitude in fractional degrees
    pub longitude: f64,
    /// Latitude in fractional degrees
    pub latitude: f64,
    /// Elevation above the reference ellipsoid in kilometers
    pub elevation_km: f64,
}

impl FromStr for ObserverLocation {
    type Err = SunspotError;

    /// Parse `"longitude,latitude,elevation_km"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| SunspotError::invalid_parameter("observer_location", reason);

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(invalid(format!(
                "`{s}` is not a `longitude,latitude,elevation_km` triple"
            )));
        }

        let mut values = [0.0; 3];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| invalid(format!("`{part}` is not a decimal number")))?;
        }
        let [longitude, latitude, elevation_km] = values;

        if !(-360.0..=360.0).contains(&longitude) {
            return Err(invalid(format!("longitude {longitude} is out of range")));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(invalid(format!("latitude {latitude} is out of range")));
        }

        Ok(ObserverLocation {
            longitude,
            latitude,
            elevation_km,
        })
    }
}

impl fmt::Display for ObserverLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{}",
            self.longitude, self.latitude, self.elevation_km
        )
    }
}

/// A validated observer-table request
#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisRequest {
    pub start: Epoch,
    pub stop: Epoch,
    pub observer: ObserverLocation,
    pub step: StepSize,
    pub target: String,
    pub quantities: String,
}

impl EphemerisRequest {
    /// Validate the textual parameters of a request
    ///
    /// Arguments
    /// ---------
    /// * `start_time`, `stop_time`: `YYYY-MM-DD HH:MM:SS`, start strictly before stop
    /// * `observer_location`: `"longitude,latitude,elevation_km"`
    /// * `step_size`: `"n unit"`, `1 <= n <= 90024`, unit among minute, hour, day, month, year
    /// * `target_body`: Horizons target identifier, forwarded as is
    /// * `quantities`: comma separated Horizons quantity codes, `None` for `"1,2,4"`
    ///
    /// Return
    /// ------
    /// * the request, or [`SunspotError::InvalidParameter`] naming the first bad field
    pub fn new(
        start_time: &str,
        stop_time: &str,
        observer_location: &str,
        step_size: &str,
        target_body: &str,
        quantities: Option<&str>,
    ) -> Result<Self, SunspotError> {
        let start = parse_request_date(start_time).ok_or_else(|| {
            SunspotError::invalid_parameter(
                "start_time",
                format!("`{start_time}` is not a valid YYYY-MM-DD HH:MM:SS time"),
            )
        })?;
        let stop = parse_request_date(stop_time).ok_or_else(|| {
            SunspotError::invalid_parameter(
                "stop_time",
                format!("`{stop_time}` is not a valid YYYY-MM-DD HH:MM:SS time"),
            )
        })?;
        if start >= stop {
            return Err(SunspotError::invalid_parameter(
                "stop_time",
                format!("`{stop_time}` is not after `{start_time}`"),
            ));
        }

        let observer = observer_location.parse()?;
        let step = step_size.parse()?;

        let target = target_body.trim();
        if target.is_empty() {
            return Err(SunspotError::invalid_parameter(
                "target_body",
                "target identifier is empty",
            ));
        }

        let quantities = quantities.unwrap_or(DEFAULT_EPHEMERIS_QUANTITIES).replace(' ', "");
        if !QUANTITIES.is_match(&quantities) {
            return Err(SunspotError::invalid_parameter(
                "quantities",
                format!("`{quantities}` is not a comma separated list of integers"),
            ));
        }

        Ok(EphemerisRequest {
            start,
            stop,
            observer,
            step,
            target: target.to_string(),
            quantities,
        })
    }

    pub fn start_time(&self) -> String {
        format_request_date(&self.start)
    }

    pub fn stop_time(&self) -> String {
        format_request_date(&self.stop)
    }
}

#[cfg(test)]
mod request_test {
    use super::*;
    use rstest::rstest;

    fn field_of(err: SunspotError) -> &'static str {
        match err {
            SunspotError::InvalidParameter { field, .. } => field,
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_valid_request() {
        let request = EphemerisRequest::new(
            "1988-12-08 01:02:03",
            "1990-04-22 04:05:06",
            "-71.332597,42.458790,0.041",
            "1 d",
            "10",
            None,
        )
        .unwrap();
        assert_eq!(request.quantities, "1,2,4");
        assert_eq!(
            request.step,
            StepSize {
                count: 1,
                unit: StepUnit::Day
            }
        );
        assert_eq!(request.step.to_string(), "1 day");
        assert_eq!(request.start_time(), "1988-12-08 01:02:03");
        assert_eq!(request.observer.latitude, 42.458790);
    }

    #[rstest]
    #[case("1988-12-08", "1990-04-22 04:05:06", "start_time")]
    #[case("1988-12-08 01:02:03", "1990-04-22 4:05:06", "stop_time")]
    #[case("1988-13-08 01:02:03", "1990-04-22 04:05:06", "start_time")]
    #[case("1990-04-22 04:05:06", "1988-12-08 01:02:03", "stop_time")]
    #[case("1990-04-22 04:05:06", "1990-04-22 04:05:06", "stop_time")]
    fn test_invalid_times(#[case] start: &str, #[case] stop: &str, #[case] field: &str) {
        let err = EphemerisRequest::new(start, stop, "0,0,0", "1 d", "10", None).unwrap_err();
        assert_eq!(field_of(err), field);
    }

    #[rstest]
    #[case("0 minute")]
    #[case("90025 minute")]
    #[case("1 week")]
    #[case("minute")]
    #[case("1.5 hour")]
    fn test_invalid_step(#[case] step: &str) {
        let err = EphemerisRequest::new(
            "2023-06-18 19:26:00",
            "2023-06-18 19:27:00",
            "0,0,0",
            step,
            "10",
            None,
        )
        .unwrap_err();
        assert_eq!(field_of(err), "step_size");
    }

    #[rstest]
    #[case("1 m", StepUnit::Minute)]
    #[case("90024 minutes", StepUnit::Minute)]
    #[case("2 h", StepUnit::Hour)]
    #[case("1 Day", StepUnit::Day)]
    #[case("3 mo", StepUnit::Month)]
    #[case("1 year", StepUnit::Year)]
    fn test_step_aliases(#[case] step: &str, #[case] unit: StepUnit) {
        assert_eq!(step.parse::<StepSize>().unwrap().unit, unit);
    }

    #[rstest]
    #[case("0,0")]
    #[case("a,0,0")]
    #[case("0,91,0")]
    #[case("400,0,0")]
    #[case("0,0,inf")]
    fn test_invalid_observer(#[case] observer: &str) {
        assert_eq!(
            field_of(observer.parse::<ObserverLocation>().unwrap_err()),
            "observer_location"
        );
    }

    #[test]
    fn test_invalid_target_and_quantities() {
        let build = |target: &str, quantities: Option<&str>| {
            EphemerisRequest::new(
                "2023-06-18 19:26:00",
                "2023-06-18 19:27:00",
                "0,0,0",
                "1 m",
                target,
                quantities,
            )
        };
        assert_eq!(field_of(build(" ", None).unwrap_err()), "target_body");
        assert_eq!(field_of(build("10", Some("")).unwrap_err()), "quantities");
        assert_eq!(field_of(build("10", Some("1,a")).unwrap_err()), "quantities");
        assert_eq!(build("10", Some("4, 2")).unwrap().quantities, "4,2");
    }
}
