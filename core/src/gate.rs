//! Minimum-duration gates guarding stage transitions.

use std::time::{Duration, Instant};

use stagehand_types::TimerId;

use crate::timer::TimerQueue;

/// What a gate decided for a given start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// The minimum has already elapsed; continue now.
    Elapsed,
    /// Continue once `remaining` has passed.
    Wait { remaining: Duration },
}

/// Outcome of arming a gate against a timer queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Nothing was scheduled; the caller continues in the same turn.
    Elapsed,
    Armed { timer: TimerId, remaining: Duration },
}

/// Keeps an indicator up for at least `minimum` after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingGate {
    minimum: Duration,
}

impl TimingGate {
    #[must_use]
    pub const fn new(minimum: Duration) -> Self {
        Self { minimum }
    }

    #[must_use]
    pub const fn minimum(&self) -> Duration {
        self.minimum
    }

    /// `remaining = minimum - (now - start)`, or `Elapsed` when that is not positive.
    #[must_use]
    pub fn check(&self, start: Instant, now: Instant) -> GateDecision {
        let shown_for = now.saturating_duration_since(start);
        match self.minimum.checked_sub(shown_for) {
            Some(remaining) if !remaining.is_zero() => GateDecision::Wait { remaining },
            _ => GateDecision::Elapsed,
        }
    }

    /// Check the gate and, if it still has time to run, schedule `payload` on `timers`.
    pub fn arm<T>(
        &self,
        start: Instant,
        now: Instant,
        timers: &mut TimerQueue<T>,
        payload: T,
    ) -> GateOutcome {
        match self.check(start, now) {
            GateDecision::Elapsed => GateOutcome::Elapsed,
            GateDecision::Wait { remaining } => GateOutcome::Armed {
                timer: timers.schedule(now + remaining, payload),
                remaining,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GateDecision, GateOutcome, TimingGate};
    use crate::timer::TimerQueue;
    use std::time::{Duration, Instant};

    #[test]
    fn zero_minimum_is_always_elapsed() {
        let start = Instant::now();
        assert_eq!(
            TimingGate::new(Duration::ZERO).check(start, start),
            GateDecision::Elapsed
        );
    }

    #[test]
    fn remaining_delay_subtracts_time_already_shown() {
        let start = Instant::now();
        let now = start + Duration::from_millis(100);
        let gate = TimingGate::new(Duration::from_millis(300));

        assert_eq!(
            gate.check(start, now),
            GateDecision::Wait {
                remaining: Duration::from_millis(200)
            }
        );
    }

    #[test]
    fn exactly_elapsed_does_not_wait() {
        let start = Instant::now();
        let gate = TimingGate::new(Duration::from_millis(50));
        assert_eq!(
            gate.check(start, start + Duration::from_millis(50)),
            GateDecision::Elapsed
        );
        assert_eq!(
            gate.check(start, start + Duration::from_millis(80)),
            GateDecision::Elapsed
        );
    }

    #[test]
    fn arm_schedules_only_when_waiting() {
        let start = Instant::now();
        let mut timers = TimerQueue::new();

        let elapsed = TimingGate::new(Duration::ZERO).arm(start, start, &mut timers, ());
        assert_eq!(elapsed, GateOutcome::Elapsed);
        assert!(timers.is_empty());

        let armed = TimingGate::new(Duration::from_millis(40)).arm(
            start,
            start + Duration::from_millis(10),
            &mut timers,
            (),
        );
        match armed {
            GateOutcome::Armed { timer, remaining } => {
                assert_eq!(remaining, Duration::from_millis(30));
                assert!(timers.is_pending(timer));
                assert_eq!(
                    timers.next_deadline(),
                    Some(start + Duration::from_millis(40))
                );
            }
            GateOutcome::Elapsed => panic!("expected the gate to arm"),
        }
    }
}
