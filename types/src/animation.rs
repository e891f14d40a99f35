//! Transition animations for passages entering and leaving the top of a stack.

use std::time::Duration;

pub(crate) fn normalized_progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }

    let elapsed = elapsed.as_secs_f32();
    let total = duration.as_secs_f32();
    (elapsed / total).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimPhase {
    Running { progress: f32 },
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectTimer {
    elapsed: Duration,
    duration: Duration,
}

impl EffectTimer {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration,
        }
    }

    pub fn advance(&mut self, delta: Duration) {
        self.elapsed = self.elapsed.saturating_add(delta);
    }

    #[must_use]
    pub fn progress(&self) -> f32 {
        normalized_progress(self.elapsed, self.duration)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    #[must_use]
    pub fn phase(&self) -> AnimPhase {
        if self.is_finished() {
            AnimPhase::Completed
        } else {
            AnimPhase::Running {
                progress: self.progress(),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    Fade,
    SlideLeft,
    SlideRight,
    PopScale,
}

/// An animation a passage plays when it is built in or out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionAnimation {
    kind: TransitionKind,
    duration: Duration,
}

impl TransitionAnimation {
    #[must_use]
    pub const fn new(kind: TransitionKind, duration: Duration) -> Self {
        Self { kind, duration }
    }

    #[must_use]
    pub const fn fade(duration: Duration) -> Self {
        Self::new(TransitionKind::Fade, duration)
    }

    #[must_use]
    pub const fn slide_left(duration: Duration) -> Self {
        Self::new(TransitionKind::SlideLeft, duration)
    }

    #[must_use]
    pub const fn pop_scale(duration: Duration) -> Self {
        Self::new(TransitionKind::PopScale, duration)
    }

    #[must_use]
    pub const fn kind(&self) -> TransitionKind {
        self.kind
    }

    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }
}

/// Override slot for a build-in or build-out animation.
///
/// `Unset` defers to whatever the passage would do by default. `Disabled`
/// is an explicit request for no animation, which is not the same thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationOverride {
    #[default]
    Unset,
    Disabled,
    Animation(TransitionAnimation),
}

impl AnimationOverride {
    #[must_use]
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    #[must_use]
    pub fn animation(&self) -> Option<TransitionAnimation> {
        match self {
            Self::Animation(animation) => Some(*animation),
            Self::Unset | Self::Disabled => None,
        }
    }

    /// Write this override into `slot`, the way a stack imposes its policy on a passage.
    ///
    /// An unset override never clears the slot. Returns `true` if the slot changed.
    pub fn apply_onto(&self, slot: &mut AnimationOverride) -> bool {
        if self.is_unset() || slot == self {
            return false;
        }
        *slot = *self;
        true
    }
}

impl From<TransitionAnimation> for AnimationOverride {
    fn from(animation: TransitionAnimation) -> Self {
        Self::Animation(animation)
    }
}
