use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Cancellation flag shared by a [`Tracker`](super::Tracker) and its worker.
///
/// The worker sleeps on the condition variable, so a cancellation wakes it at once instead
/// of at the end of its current wait slice.
#[derive(Debug, Default)]
pub(crate) struct CancelToken {
    cancelled: Mutex<bool>,
    wakeup: Condvar,
}

impl CancelToken {
    fn flag(&self) -> MutexGuard<'_, bool> {
        // a poisoned flag is still a valid bool
        self.cancelled.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Request cancellation; true the first time only
    pub(crate) fn cancel(&self) -> bool {
        let mut flag = self.flag();
        let first = !*flag;
        *flag = true;
        self.wakeup.notify_all();
        first
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        *self.flag()
    }

    /// Sleep for at most `timeout`
    ///
    /// Return
    /// ------
    /// * true if the token is cancelled (before or during the wait)
    pub(crate) fn wait_timeout(&self, timeout: Duration) -> bool {
        let flag = self.flag();
        if *flag {
            return true;
        }
        let (flag, _) = self
            .wakeup
            .wait_timeout_while(flag, timeout, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        *flag
    }
}

#[cfg(test)]
mod cancel_test {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    #[test]
    fn test_cancel_is_idempotent() {
        let token = CancelToken::default();
        assert!(!token.is_cancelled());
        assert!(token.cancel());
        assert!(!token.cancel());
        assert!(token.is_cancelled());
        assert!(token.wait_timeout(Duration::from_secs(10)));
    }

    #[test]
    fn test_wait_times_out() {
        let token = CancelToken::default();
        let start = Instant::now();
        assert!(!token.wait_timeout(Duration::from_millis(20)));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_cancel_wakes_waiter() {
        let token = Arc::new(CancelToken::default());
        let waiter = {
            let token = Arc::clone(&token);
            std::thread::spawn(move || {
                let start = Instant::now();
                let cancelled = token.wait_timeout(Duration::from_secs(30));
                (cancelled, start.elapsed())
            })
        };
        std::thread::sleep(Duration::from_millis(20));
        token.cancel();

        let (cancelled, elapsed) = waiter.join().unwrap();
        assert!(cancelled);
        assert!(elapsed < Duration::from_secs(5));
    }
}
