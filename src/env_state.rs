//! # Sunspot environment state
//!
//! This module defines [`crate::env_state::SunspotEnv`], the **shared environment object** used to
//! talk to the NASA/JPL Horizons API. It provides access to:
//!
//! - A persistent **HTTP client** ([`reqwest::Client`]) configured from [`HorizonsConfig`].
//! - A short-lived **tokio runtime** driving that client for the synchronous entry points
//!   ([`Ephemeris::from_horizons`](crate::ephemeris::Ephemeris::from_horizons)).
//! - The [`HorizonsConfig`] itself: endpoint, timeout and the fixed observer-table settings
//!   sent with every request.
//!
//! ## Structure
//!
//! ```text
//! SunspotEnv
//! ├── http_client (reqwest::Client, no idle connection kept)
//! └── config      (HorizonsConfig)
//! ```
//!
//! ## Usage
//!
//! ```rust, no_run
//! use sunspot::env_state::{HorizonsConfig, SunspotEnv};
//!
//! let env = SunspotEnv::new(HorizonsConfig::default()).unwrap();
//! assert!(env.config.api_url.starts_with("https://"));
//! ```
//!
//! ## Notes
//!
//! - The environment is cheaply cloneable; clones share the HTTP client.
//! - The synchronous path builds a current-thread runtime per request and blocks on it, so it
//!   must not be called from inside another tokio runtime. Idle connections are not pooled
//!   since they would outlive the runtime that opened them. Async callers use
//!   [`HorizonsApi::fetch_async`](crate::jpl_request::horizons_api::HorizonsApi::fetch_async).
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_REQUEST_TIMEOUT, HORIZONS_API_URL};
use crate::sunspot_errors::SunspotError;

/// Settings of the Horizons observer-table query.
///
/// `table_settings` are sent verbatim (values single-quoted) with every request, before the
/// per-request target, site, times, step and quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HorizonsConfig {
    pub api_url: String,
    pub timeout_secs: u64,
    pub table_settings: Vec<(String, String)>,
}

impl Default for HorizonsConfig {
    fn default() -> Self {
        let settings = [
            ("MAKE_EPHEM", "YES"),
            ("EPHEM_TYPE", "OBSERVER"),
            ("COORD_TYPE", "GEODETIC"),
            ("CENTER", "coord@399"),
            ("REF_SYSTEM", "ICRF"),
            ("CAL_FORMAT", "CAL"),
            ("CAL_TYPE", "M"),
            ("TIME_DIGITS", "SECONDS"),
            ("ANG_FORMAT", "DEG"),
            ("APPARENT", "AIRLESS"),
            ("RANGE_UNITS", "AU"),
            ("SUPPRESS_RANGE_RATE", "NO"),
            ("SKIP_DAYLT", "NO"),
            ("SOLAR_ELONG", "0,180"),
            ("EXTRA_PREC", "YES"),
            ("R_T_S_ONLY", "NO"),
            ("CSV_FORMAT", "YES"),
            ("OBJ_DATA", "YES"),
        ];

        HorizonsConfig {
            api_url: HORIZONS_API_URL.to_string(),
            timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            table_settings: settings
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl HorizonsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone)]
pub struct SunspotEnv {
    pub http_client: reqwest::Client,
    pub config: HorizonsConfig,
}

impl SunspotEnv {
    /// Create the environment: HTTP client with the configured timeout
    ///
    /// Return
    /// ------
    /// * the environment, or an error if the client cannot be built
    pub fn new(config: HorizonsConfig) -> Result<Self, SunspotError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(SunspotEnv {
            http_client,
            config,
        })
    }

    /// Run a future to completion on a new current-thread runtime
    pub(crate) fn block_on<F: std::future::Future>(&self, future: F) -> Result<F::Output, SunspotError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(runtime.block_on(future))
    }
}

#[cfg(test)]
mod env_state_test {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HorizonsConfig::default();
        assert_eq!(config.api_url, "https://ssd.jpl.nasa.gov/api/horizons.api");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config
            .table_settings
            .contains(&("CSV_FORMAT".to_string(), "YES".to_string())));
    }

    #[test]
    fn test_env_builds_offline() {
        let env = SunspotEnv::new(HorizonsConfig::default()).unwrap();
        assert_eq!(env.block_on(async { 1 + 1 }).unwrap(), 2);
    }
}
