use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hifitime::Epoch;
use log::{debug, error, info, log, Level};

use crate::ephemeris::Ephemeris;
use crate::sunspot_errors::SunspotError;
use crate::time::{duration_until, now};

use super::cancel::CancelToken;
use super::row_view::RowView;
use super::{Firing, TrackerCallbacks, TrackerOptions, TrackerReport};

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Background half of a tracker: owns the cursor and the callbacks
pub(super) struct Worker {
    pub(super) ephemeris: Arc<Ephemeris>,
    pub(super) epochs: Vec<Epoch>,
    pub(super) callbacks: TrackerCallbacks,
    pub(super) options: TrackerOptions,
    pub(super) cancel: Arc<CancelToken>,
    pub(super) finished: Arc<AtomicBool>,
    pub(super) report: TrackerReport,
}

impl Worker {
    /// Process rows from `first` until the last one or until cancellation
    pub(super) fn run(mut self, first: usize) -> TrackerReport {
        let mut cursor = Some(first);
        while let Some(index) = cursor {
            match self.track_row(index) {
                Ok(true) => self.report.rows_completed += 1,
                Ok(false) => {
                    self.report.cancelled = true;
                    break;
                }
                Err(err) => {
                    error!("tracker stopped on row {index}: {err}");
                    break;
                }
            }
            cursor = match self.next_row(index) {
                Ok(next) => next,
                Err(err) => {
                    error!("tracker stopped after row {index}: {err}");
                    None
                }
            };
        }

        if !self.report.cancelled && self.cancel.is_cancelled() {
            self.report.cancelled = true;
        }
        self.finished.store(true, Ordering::SeqCst);
        debug!("tracker finished: {:?}", self.report);
        self.report
    }

    /// Next row strictly after row `index` and still in the future; past rows are skipped
    fn next_row(&self, index: usize) -> Result<Option<usize>, SunspotError> {
        let current = self.epochs[index];
        let now = now()?;
        let next = self
            .epochs
            .iter()
            .enumerate()
            .skip(index + 1)
            .find(|(_, epoch)| **epoch > current && **epoch > now)
            .map(|(j, _)| j);

        if let Some(j) = next {
            if j > index + 1 {
                debug!("tracker skips rows {}..{} already in the past", index + 1, j);
            }
        }
        Ok(next)
    }

    /// Run the before / on-time / after sequence of one row
    ///
    /// Return
    /// ------
    /// * `Ok(true)` once the row is done, `Ok(false)` if the tracker was cancelled
    fn track_row(&mut self, index: usize) -> Result<bool, SunspotError> {
        let ephemeris = Arc::clone(&self.ephemeris);
        let target = self.epochs[index];
        let values = ephemeris.table().row(index).unwrap_or_default();
        let row = RowView::new(index, target, ephemeris.data_titles(), values);

        if let Some(lead) = self.options.lead_time {
            let lead = hifitime::Duration::from_seconds(lead.as_secs_f64());
            if !self.sleep_until(target - lead)? {
                return Ok(false);
            }
        }

        Ok(self.fire(Firing::Before, &row)?
            && self.sleep_until(target)?
            && self.fire(Firing::OnTime, &row)?
            && self.fire(Firing::After, &row)?)
    }

    /// Wait until the wall clock reaches `target`, re-reading the clock at every poll slice
    ///
    /// Return
    /// ------
    /// * `Ok(true)` when `target` is reached, `Ok(false)` if cancelled while waiting
    fn sleep_until(&self, target: Epoch) -> Result<bool, SunspotError> {
        loop {
            if self.cancel.is_cancelled() {
                return Ok(false);
            }
            let now = now()?;
            if now >= target {
                return Ok(true);
            }
            let slice = duration_until(now, target).min(self.options.poll_interval);
            if self.cancel.wait_timeout(slice) {
                return Ok(false);
            }
        }
    }

    /// Invoke the callback registered for `firing`, if any
    ///
    /// Return
    /// ------
    /// * `Ok(false)` if the tracker was cancelled before the callback could fire
    fn fire(&mut self, firing: Firing, row: &RowView<'_>) -> Result<bool, SunspotError> {
        if self.cancel.is_cancelled() {
            return Ok(false);
        }
        let Some(callback) = self.callbacks.slot_mut(firing) else {
            return Ok(true);
        };

        let level = if self.options.verbose {
            Level::Info
        } else {
            Level::Debug
        };
        log!(
            level,
            "[{}] {} row {} scheduled at {}",
            now()?,
            firing,
            row.index(),
            row.epoch()
        );

        if let Err(payload) = catch_unwind(AssertUnwindSafe(|| callback(row))) {
            self.report.callback_failures += 1;
            error!(
                "{} callback of row {} failed: {}",
                firing,
                row.index(),
                panic_message(payload.as_ref())
            );
        } else if self.options.verbose {
            info!("{} callback of row {} done", firing, row.index());
        }
        Ok(true)
    }
}
