use log::{debug, warn};

use crate::env_state::{HorizonsConfig, SunspotEnv};
use crate::ephemeris::request::EphemerisRequest;
use crate::sunspot_errors::SunspotError;

use super::horizons_faults::detect_horizons_fault;
use super::RawTextSource;

fn quoted(value: &str) -> String {
    format!("'{value}'")
}

/// Build the query parameters of a Horizons observer-table request
///
/// Arguments
/// ---------
/// * `config`: the fixed table settings
/// * `request`: the validated per-request parameters
///
/// Return
/// ------
/// * the `(key, value)` pairs, values single-quoted as Horizons expects them
pub fn query_parameters(config: &HorizonsConfig, request: &EphemerisRequest) -> Vec<(String, String)> {
    let mut params = vec![("format".to_string(), "text".to_string())];
    params.extend(
        config
            .table_settings
            .iter()
            .map(|(key, value)| (key.clone(), quoted(value))),
    );

    let per_request = [
        ("COMMAND", request.target.clone()),
        ("SITE_COORD", request.observer.to_string()),
        ("START_TIME", request.start_time()),
        ("STOP_TIME", request.stop_time()),
        ("STEP_SIZE", request.step.to_string()),
        ("QUANTITIES", request.quantities.clone()),
    ];
    params.extend(
        per_request
            .into_iter()
            .map(|(key, value)| (key.to_string(), quoted(&value))),
    );
    params
}

/// Client of the NASA/JPL Horizons API
#[derive(Debug, Clone)]
pub struct HorizonsApi {
    env: SunspotEnv,
}

impl HorizonsApi {
    pub fn new(env: SunspotEnv) -> Self {
        HorizonsApi { env }
    }

    /// A client with the default [`HorizonsConfig`]
    pub fn with_default_config() -> Result<Self, SunspotError> {
        Ok(HorizonsApi::new(SunspotEnv::new(HorizonsConfig::default())?))
    }

    pub fn env(&self) -> &SunspotEnv {
        &self.env
    }

    /// Request the observer table of `request` from Horizons
    ///
    /// Argument
    /// --------
    /// * `request`: the validated request
    ///
    /// Return
    /// ------
    /// * the raw text response, or the HTTP error
    pub async fn fetch_async(&self, request: &EphemerisRequest) -> Result<String, SunspotError> {
        let params = query_parameters(&self.env.config, request);
        debug!(
            "Horizons request: target {} from {} to {} every {}",
            request.target,
            request.start_time(),
            request.stop_time(),
            request.step
        );

        let response = self
            .env
            .http_client
            .get(&self.env.config.api_url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        if let Some(fault) = detect_horizons_fault(&response) {
            warn!("{fault}");
        }
        debug!("Horizons response: {} bytes", response.len());
        Ok(response)
    }
}

impl RawTextSource for HorizonsApi {
    fn fetch(&self, request: &EphemerisRequest) -> Result<String, SunspotError> {
        self.env.block_on(self.fetch_async(request))?
    }
}

#[cfg(test)]
mod horizons_api_test {
    use super::*;

    fn request() -> EphemerisRequest {
        EphemerisRequest::new(
            "2023-06-18 19:26:00",
            "2023-06-18 19:27:00",
            "-71.332597,42.458790,0.041",
            "1 m",
            "10",
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_query_parameters() {
        let params = query_parameters(&HorizonsConfig::default(), &request());
        let get = |key: &str| {
            params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("format"), Some("text"));
        assert_eq!(get("EPHEM_TYPE"), Some("'OBSERVER'"));
        assert_eq!(get("SOLAR_ELONG"), Some("'0,180'"));
        assert_eq!(get("COMMAND"), Some("'10'"));
        assert_eq!(get("SITE_COORD"), Some("'-71.332597,42.45879,0.041'"));
        assert_eq!(get("START_TIME"), Some("'2023-06-18 19:26:00'"));
        assert_eq!(get("STOP_TIME"), Some("'2023-06-18 19:27:00'"));
        assert_eq!(get("STEP_SIZE"), Some("'1 minute'"));
        assert_eq!(get("QUANTITIES"), Some("'1,2,4'"));
    }

    #[test]
    #[ignore]
    fn test_horizons_request() {
        let api = HorizonsApi::with_default_config().unwrap();
        let response = api.fetch(&request()).unwrap();
        assert!(response.contains("$$SOE"));
        assert!(response.contains("$$EOE"));
    }
}
