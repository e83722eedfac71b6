//! # Real-time tracking of ephemeris rows
//!
//! A [`Tracker`] walks the rows of an [`Ephemeris`] in wall-clock time and invokes up to three
//! user callbacks per row:
//!
//! 1. **before** – as soon as the row becomes the active target (or `lead_time` before it,
//!    see [`TrackerOptions::lead_time`]), leaving the whole lead time for setup work;
//! 2. **on_time** – when the wall clock reaches the row timestamp;
//! 3. **after** – immediately after `on_time`.
//!
//! Every callback of a row receives the same [`RowView`]. Rows already in the past are never
//! fired: the tracker starts at the first future row and, after each row, jumps to the next
//! row that is still in the future.
//!
//! ## Threading
//!
//! Each tracker owns one worker thread, started by [`Tracker::new`]; the caller gets control
//! back immediately. Callbacks of one tracker run on that thread, one at a time and in row
//! order. The wait before `on_time` is sliced by [`TrackerOptions::poll_interval`] and is
//! interrupted at once by [`Tracker::terminate`]. Dropping the tracker terminates and joins
//! the worker.
//!
//! A panicking callback is caught and logged; the tracker goes on with the next callback.
//!
//! ```rust, no_run
//! use std::sync::Arc;
//! use sunspot::ephemeris::Ephemeris;
//! use sunspot::tracker::{Tracker, TrackerCallbacks, TrackerOptions};
//!
//! let ephemeris = Arc::new(
//!     Ephemeris::from_horizons(
//!         "2030-01-01 00:00:00",
//!         "2030-01-01 01:00:00",
//!         "-71.332597,42.458790,0.041",
//!         "1 m",
//!         "10",
//!         None,
//!     )
//!     .unwrap(),
//! );
//!
//! let callbacks = TrackerCallbacks::new()
//!     .before(|row| println!("slew to {:?}", row.values()))
//!     .on_time(|row| println!("on target at {}", row.epoch()));
//!
//! let tracker = Tracker::new(ephemeris, callbacks, TrackerOptions::default()).unwrap();
//! // ... later
//! tracker.terminate();
//! ```

mod cancel;
pub mod row_view;
mod worker;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_POLL_INTERVAL, TRACKER_THREAD_NAME};
use crate::ephemeris::Ephemeris;
use crate::sunspot_errors::SunspotError;
use crate::time::now;

use cancel::CancelToken;
pub use row_view::RowView;
use worker::Worker;

/// A tracker callback: receives the row being tracked
pub type RowCallback = Box<dyn FnMut(&RowView<'_>) + Send + 'static>;

/// The three moments at which a callback fires for a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Firing {
    Before,
    OnTime,
    After,
}

impl fmt::Display for Firing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Firing::Before => "before",
            Firing::OnTime => "on_time",
            Firing::After => "after",
        };
        f.write_str(name)
    }
}

/// Optional callbacks of a tracker; any subset may be registered
#[derive(Default)]
pub struct TrackerCallbacks {
    before: Option<RowCallback>,
    on_time: Option<RowCallback>,
    after: Option<RowCallback>,
}

impl TrackerCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&RowView<'_>) + Send + 'static,
    {
        self.before = Some(Box::new(callback));
        self
    }

    pub fn on_time<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&RowView<'_>) + Send + 'static,
    {
        self.on_time = Some(Box::new(callback));
        self
    }

    pub fn after<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&RowView<'_>) + Send + 'static,
    {
        self.after = Some(Box::new(callback));
        self
    }

    fn slot_mut(&mut self, firing: Firing) -> Option<&mut RowCallback> {
        match firing {
            Firing::Before => self.before.as_mut(),
            Firing::OnTime => self.on_time.as_mut(),
            Firing::After => self.after.as_mut(),
        }
    }
}

impl fmt::Debug for TrackerCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerCallbacks")
            .field("before", &self.before.is_some())
            .field("on_time", &self.on_time.is_some())
            .field("after", &self.after.is_some())
            .finish()
    }
}

/// Tuning of a tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerOptions {
    /// Log every firing at `info` level instead of `debug`
    pub verbose: bool,
    /// Longest sleep before the wall clock is read again
    pub poll_interval: Duration,
    /// Fire `before` this long ahead of the row instead of as soon as the row is active
    pub lead_time: Option<Duration>,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        TrackerOptions {
            verbose: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
            lead_time: None,
        }
    }
}

impl TrackerOptions {
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn lead_time(mut self, lead_time: Duration) -> Self {
        self.lead_time = Some(lead_time);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Running,
    Terminated,
}

/// What a tracker worker did before it stopped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerReport {
    /// Rows whose whole before / on-time / after sequence ran
    pub rows_completed: usize,
    /// Callbacks that panicked
    pub callback_failures: usize,
    /// True if the tracker stopped on [`Tracker::terminate`]
    pub cancelled: bool,
}

/// Real-time scheduler of the callbacks of an ephemeris, see the [module documentation](self)
#[derive(Debug)]
pub struct Tracker {
    cancel: Arc<CancelToken>,
    finished: Arc<AtomicBool>,
    first_row: usize,
    handle: Option<JoinHandle<TrackerReport>>,
}

impl Tracker {
    /// Start tracking `ephemeris`
    ///
    /// Arguments
    /// ---------
    /// * `ephemeris`: the ephemeris to track, shared read-only with the worker
    /// * `callbacks`: the callbacks to invoke for each row
    /// * `options`: verbosity, clock polling interval, optional lead time for `before`
    ///
    /// Return
    /// ------
    /// * the running tracker
    /// * [`SunspotError::NoFutureEvent`] if every row is at or before the current time
    /// * [`SunspotError::InvalidValue`] if a date of the ephemeris cannot be read
    pub fn new(
        ephemeris: Arc<Ephemeris>,
        callbacks: TrackerCallbacks,
        options: TrackerOptions,
    ) -> Result<Self, SunspotError> {
        let epochs = ephemeris.epochs()?;
        let now = now()?;

        let first_row = epochs.iter().position(|epoch| *epoch > now).ok_or_else(|| {
            SunspotError::NoFutureEvent {
                last_row: ephemeris
                    .dates()
                    .ok()
                    .and_then(|dates| dates.last().cloned())
                    .unwrap_or_default(),
            }
        })?;

        info!(
            "tracker starts at row {first_row} of {} ({})",
            epochs.len(),
            epochs[first_row]
        );

        let cancel = Arc::new(CancelToken::default());
        let finished = Arc::new(AtomicBool::new(false));
        let worker = Worker {
            ephemeris,
            epochs,
            callbacks,
            options,
            cancel: Arc::clone(&cancel),
            finished: Arc::clone(&finished),
            report: TrackerReport::default(),
        };

        let handle = thread::Builder::new()
            .name(TRACKER_THREAD_NAME.to_string())
            .spawn(move || worker.run(first_row))?;

        Ok(Tracker {
            cancel,
            finished,
            first_row,
            handle: Some(handle),
        })
    }

    /// Stop the tracker: the callback currently running completes, no further callback fires.
    /// Calling it again has no effect.
    pub fn terminate(&self) {
        if self.cancel.cancel() {
            info!("tracker terminated");
        }
    }

    pub fn state(&self) -> TrackerState {
        if self.cancel.is_cancelled() || self.finished.load(Ordering::SeqCst) {
            TrackerState::Terminated
        } else {
            TrackerState::Running
        }
    }

    /// Index of the first row tracked: the earliest row in the future at construction
    pub fn first_row(&self) -> usize {
        self.first_row
    }

    /// Wait for the worker to stop, on its own or after [`Tracker::terminate`]
    pub fn join(mut self) -> TrackerReport {
        self.join_worker()
    }

    fn join_worker(&mut self) -> TrackerReport {
        match self.handle.take().map(JoinHandle::join) {
            Some(Ok(report)) => report,
            Some(Err(_)) => {
                error!("tracker worker panicked");
                TrackerReport::default()
            }
            None => TrackerReport::default(),
        }
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        if self.handle.is_some() {
            if !self.finished.load(Ordering::SeqCst) {
                self.terminate();
            }
            self.join_worker();
        }
    }
}
