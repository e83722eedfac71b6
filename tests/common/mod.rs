#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use hifitime::{Duration, Epoch};
use sunspot::ephemeris::request::EphemerisRequest;
use sunspot::time::format_request_date;
use sunspot::tracker::{Firing, TrackerCallbacks};
use sunspot::Ephemeris;

pub const SUN_FIXTURE: &str = "tests/data/horizons_sun.txt";

pub const AZIMUTH: &str = "Azi____(a-app)";
pub const ELEVATION: &str = "Elev___(a-app)";

pub fn read_fixture(path: &str) -> String {
    std::fs::read_to_string(path).expect("fixture file is readable")
}

pub fn sun_request() -> EphemerisRequest {
    EphemerisRequest::new(
        "2023-06-18 19:26:00",
        "2023-06-18 19:31:00",
        "-71.332597,42.458790,0.041",
        "1 m",
        "10",
        None,
    )
    .unwrap()
}

pub fn sun_ephemeris() -> Ephemeris {
    Ephemeris::from_text(sun_request(), read_fixture(SUN_FIXTURE)).unwrap()
}

/// Whole-second epochs starting `offset_secs` after the current second, `spacing_secs` apart
pub fn epochs_from_now(count: usize, offset_secs: f64, spacing_secs: f64) -> Vec<Epoch> {
    let (y, mo, d, h, mi, s, _) = Epoch::now().unwrap().to_gregorian_utc();
    let base = Epoch::from_gregorian_utc(y, mo, d, h, mi, s, 0);
    (0..count)
        .map(|i| base + Duration::from_seconds(offset_secs + i as f64 * spacing_secs))
        .collect()
}

/// Horizons-shaped text with one row per epoch: date, azimuth, elevation
pub fn horizons_text(epochs: &[Epoch]) -> String {
    let rows: Vec<String> = epochs
        .iter()
        .enumerate()
        .map(|(i, epoch)| {
            format!(
                " {},*,m, {:.9}, {:.9},",
                format_request_date(epoch),
                90.0 + i as f64,
                10.0 + i as f64 / 2.0
            )
        })
        .collect();

    format!(
        "*******\n Date__(UT)__HR:MN:SS, , , {AZIMUTH}, {ELEVATION},\n*******\n$$SOE\n{}\n$$EOE\n*******\n",
        rows.join("\n")
    )
}

/// Ephemeris whose rows are exactly `epochs`
pub fn ephemeris_at(epochs: &[Epoch]) -> Arc<Ephemeris> {
    let first = epochs.first().expect("at least one epoch");
    let last = epochs.last().expect("at least one epoch");
    let request = EphemerisRequest::new(
        &format_request_date(first),
        &format_request_date(&(*last + Duration::from_seconds(60.0))),
        "0,0,0",
        "1 m",
        "10",
        None,
    )
    .unwrap();
    Arc::new(Ephemeris::from_text(request, horizons_text(epochs)).unwrap())
}

/// One callback firing as observed by a test
#[derive(Debug, Clone, PartialEq)]
pub struct Fired {
    pub firing: Firing,
    pub row: usize,
    pub values: Vec<String>,
    pub at: Epoch,
}

pub type FiringLog = Arc<Mutex<Vec<Fired>>>;

fn recorder(log: &FiringLog, firing: Firing) -> impl FnMut(&sunspot::RowView<'_>) + Send + 'static {
    let log = Arc::clone(log);
    move |row| {
        log.lock().unwrap().push(Fired {
            firing,
            row: row.index(),
            values: row.to_vec(),
            at: Epoch::now().unwrap(),
        })
    }
}

/// Callbacks recording every firing in the returned log
pub fn recording_callbacks(before: bool, on_time: bool, after: bool) -> (TrackerCallbacks, FiringLog) {
    let log: FiringLog = Arc::new(Mutex::new(Vec::new()));
    let mut callbacks = TrackerCallbacks::new();
    if before {
        callbacks = callbacks.before(recorder(&log, Firing::Before));
    }
    if on_time {
        callbacks = callbacks.on_time(recorder(&log, Firing::OnTime));
    }
    if after {
        callbacks = callbacks.after(recorder(&log, Firing::After));
    }
    (callbacks, log)
}

pub fn firings(log: &FiringLog) -> Vec<(Firing, usize)> {
    log.lock()
        .unwrap()
        .iter()
        .map(|f| (f.firing, f.row))
        .collect()
}
