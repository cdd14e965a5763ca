//! Waits for the TinyMCE runtime script to publish `window.tinymce`.
//!
//! Polling is bounded. When the attempts run out the caller is told
//! [`PollStatus::TimedOut`] and is expected to render anyway.

use gloo_timers::callback::Timeout;
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollStatus {
    Pending,
    Ready,
    TimedOut,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadinessPoll {
    attempts: u32,
    max_attempts: u32,
}

impl ReadinessPoll {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            attempts: 0,
            max_attempts,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Record one timed probe.
    pub fn observe(&mut self, ready: bool) -> PollStatus {
        self.attempts += 1;
        if ready {
            PollStatus::Ready
        } else if self.attempts >= self.max_attempts {
            PollStatus::TimedOut
        } else {
            PollStatus::Pending
        }
    }
}

/// Probe once now, then every `interval_ms` until ready or out of attempts.
///
/// `probe` returns `None` once its owner is gone; polling then stops without
/// calling `on_done`.
pub fn watch_runtime<P, D>(max_attempts: u32, interval_ms: u32, probe: P, on_done: D)
where
    P: Fn() -> Option<bool> + 'static,
    D: FnOnce(PollStatus) + 'static,
{
    match probe() {
        Some(true) => on_done(PollStatus::Ready),
        Some(false) => schedule(ReadinessPoll::new(max_attempts), interval_ms, probe, on_done),
        None => {}
    }
}

fn schedule<P, D>(mut poll: ReadinessPoll, interval_ms: u32, probe: P, on_done: D)
where
    P: Fn() -> Option<bool> + 'static,
    D: FnOnce(PollStatus) + 'static,
{
    Timeout::new(interval_ms, move || {
        let Some(ready) = probe() else {
            debug!(attempts = poll.attempts(), "editor runtime watch abandoned");
            return;
        };
        match poll.observe(ready) {
            PollStatus::Pending => schedule(poll, interval_ms, probe, on_done),
            PollStatus::Ready => {
                debug!(attempts = poll.attempts(), "editor runtime ready");
                on_done(PollStatus::Ready);
            }
            PollStatus::TimedOut => {
                warn!(
                    attempts = poll.attempts(),
                    "editor runtime never reported ready; continuing without it"
                );
                on_done(PollStatus::TimedOut);
            }
        }
    })
    .forget();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_on_first_probe() {
        let mut poll = ReadinessPoll::new(50);
        assert_eq!(poll.observe(true), PollStatus::Ready);
        assert_eq!(poll.attempts(), 1);
    }

    #[test]
    fn times_out_after_max_attempts() {
        let mut poll = ReadinessPoll::new(50);
        for _ in 0..49 {
            assert_eq!(poll.observe(false), PollStatus::Pending);
        }
        assert_eq!(poll.observe(false), PollStatus::TimedOut);
        assert_eq!(poll.attempts(), 50);
    }

    #[test]
    fn late_readiness_wins_over_timeout() {
        let mut poll = ReadinessPoll::new(2);
        assert_eq!(poll.observe(false), PollStatus::Pending);
        assert_eq!(poll.observe(true), PollStatus::Ready);
    }
}
