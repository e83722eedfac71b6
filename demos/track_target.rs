use std::env;
use std::sync::Arc;

use hifitime::Duration;
use log::info;
use sunspot::sunspot_errors::SunspotError;
use sunspot::time::{format_request_date, now};
use sunspot::tracker::{Tracker, TrackerCallbacks, TrackerOptions};
use sunspot::Ephemeris;

const AZIMUTH: &str = "Azi____(a-app)";
const ELEVATION: &str = "Elev___(a-app)";

/// Fetch the next few minutes of a target's observer table and follow it in real time.
///
/// Usage: `cargo run --example track_target -- [target] [observer] [minutes]`
///
/// Arguments
/// -----------------
/// * `target`: Horizons target identifier, the Sun (`10`) by default
/// * `observer`: `"longitude,latitude,elevation_km"`, Lowell (MA) by default
/// * `minutes`: length of the tracked window, 3 by default
fn main() -> Result<(), SunspotError> {
    pretty_env_logger::init();

    let mut args = env::args().skip(1);
    let target = args.next().unwrap_or_else(|| "10".to_string());
    let observer = args
        .next()
        .unwrap_or_else(|| "-71.332597,42.458790,0.041".to_string());
    let minutes: f64 = args.next().and_then(|m| m.parse().ok()).unwrap_or(3.0);

    let start = now()? + Duration::from_seconds(60.0);
    let stop = start + Duration::from_seconds(60.0 * minutes);

    let ephemeris = Arc::new(Ephemeris::from_horizons(
        &format_request_date(&start),
        &format_request_date(&stop),
        &observer,
        "1 m",
        &target,
        None,
    )?);
    info!(
        "{} rows for target {} ({})",
        ephemeris.len(),
        target,
        ephemeris.data_titles().join(" | ")
    );

    let callbacks = TrackerCallbacks::new()
        .before(|row| {
            info!(
                "slewing to az {:?} el {:?} for {}",
                row.get_f64(AZIMUTH),
                row.get_f64(ELEVATION),
                row.epoch()
            )
        })
        .on_time(|row| info!("on target, row {}", row.index()))
        .after(|row| info!("row {} done", row.index()));

    let tracker = Tracker::new(ephemeris, callbacks, TrackerOptions::default().verbose(true))?;
    let report = tracker.join();
    info!("tracking finished: {report:?}");
    Ok(())
}
