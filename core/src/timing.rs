//! Timestamps recorded as a bootstrap crosses stage boundaries.

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::clock::Clock;

/// Boundary marks written by the sequencer. `bootstrap_start` is fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimingMark {
    BootstrapEnd,
    LoadingStart,
    LoadingEnd,
}

impl TimingMark {
    fn as_str(self) -> &'static str {
        match self {
            TimingMark::BootstrapEnd => "bootstrap_end",
            TimingMark::LoadingStart => "loading_start",
            TimingMark::LoadingEnd => "loading_end",
        }
    }
}

/// One record per application run, created before the sequencer exists.
///
/// Shared as `Arc<BootstrapTiming>`: observers read it freely, only the
/// sequencer writes, and every field after `bootstrap_start` is write-once.
#[derive(Debug)]
pub struct BootstrapTiming {
    bootstrap_start: Instant,
    bootstrap_end: OnceLock<Instant>,
    loading_start: OnceLock<Instant>,
    loading_end: OnceLock<Instant>,
}

impl BootstrapTiming {
    #[must_use]
    pub fn starting_at(bootstrap_start: Instant) -> Self {
        Self {
            bootstrap_start,
            bootstrap_end: OnceLock::new(),
            loading_start: OnceLock::new(),
            loading_end: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn start(clock: &dyn Clock) -> Self {
        Self::starting_at(clock.now())
    }

    #[must_use]
    pub fn bootstrap_start(&self) -> Instant {
        self.bootstrap_start
    }

    #[must_use]
    pub fn bootstrap_end(&self) -> Option<Instant> {
        self.bootstrap_end.get().copied()
    }

    #[must_use]
    pub fn loading_start(&self) -> Option<Instant> {
        self.loading_start.get().copied()
    }

    #[must_use]
    pub fn loading_end(&self) -> Option<Instant> {
        self.loading_end.get().copied()
    }

    /// How long the bootstrapping indicator was up, once it came down.
    #[must_use]
    pub fn bootstrap_duration(&self) -> Option<Duration> {
        self.bootstrap_end()
            .map(|end| end.saturating_duration_since(self.bootstrap_start))
    }

    #[must_use]
    pub fn loading_duration(&self) -> Option<Duration> {
        let start = self.loading_start()?;
        self.loading_end()
            .map(|end| end.saturating_duration_since(start))
    }

    /// Returns `false` if the mark was already recorded; the first value wins.
    pub(crate) fn record(&self, mark: TimingMark, at: Instant) -> bool {
        let cell = match mark {
            TimingMark::BootstrapEnd => &self.bootstrap_end,
            TimingMark::LoadingStart => &self.loading_start,
            TimingMark::LoadingEnd => &self.loading_end,
        };
        if cell.set(at).is_err() {
            warn!(mark = mark.as_str(), "Bootstrap timing mark already recorded");
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{BootstrapTiming, TimingMark};
    use std::time::{Duration, Instant};

    #[test]
    fn marks_are_write_once() {
        let start = Instant::now();
        let timing = BootstrapTiming::starting_at(start);
        let first = start + Duration::from_millis(10);

        assert!(timing.record(TimingMark::BootstrapEnd, first));
        assert!(!timing.record(TimingMark::BootstrapEnd, first + Duration::from_millis(5)));
        assert_eq!(timing.bootstrap_end(), Some(first));
        assert_eq!(timing.bootstrap_duration(), Some(Duration::from_millis(10)));
    }

    #[test]
    fn loading_duration_needs_both_marks() {
        let start = Instant::now();
        let timing = BootstrapTiming::starting_at(start);
        assert!(timing.loading_duration().is_none());

        timing.record(TimingMark::LoadingStart, start + Duration::from_millis(5));
        assert!(timing.loading_duration().is_none());

        timing.record(TimingMark::LoadingEnd, start + Duration::from_millis(45));
        assert_eq!(timing.loading_duration(), Some(Duration::from_millis(40)));
    }
}
