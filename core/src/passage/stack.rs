use std::mem;
use std::time::Duration;

use tracing::debug;

use stagehand_types::{
    AnimPhase, AnimationOverride, EffectTimer, PassageId, PlaceholderId, TransitionAnimation,
};

use super::Passage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDirection {
    Push,
    Pop,
    Replace,
}

/// One side of a transition: a passage and the animation it plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionLeg {
    pub passage: PassageId,
    pub animation: TransitionAnimation,
}

/// The swap in progress at the top of a stack.
///
/// `incoming` builds in the current top, `outgoing` builds out the passage
/// that just left it. A leg is absent when its override is unset or disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    direction: TransitionDirection,
    incoming: Option<TransitionLeg>,
    outgoing: Option<TransitionLeg>,
    timer: EffectTimer,
}

impl Transition {
    fn new(
        direction: TransitionDirection,
        incoming: Option<TransitionLeg>,
        outgoing: Option<TransitionLeg>,
    ) -> Option<Self> {
        let duration = [incoming, outgoing]
            .iter()
            .flatten()
            .map(|leg| leg.animation.duration())
            .max()?;

        Some(Self {
            direction,
            incoming,
            outgoing,
            timer: EffectTimer::new(duration),
        })
    }

    #[must_use]
    pub fn direction(&self) -> TransitionDirection {
        self.direction
    }

    #[must_use]
    pub fn incoming(&self) -> Option<TransitionLeg> {
        self.incoming
    }

    #[must_use]
    pub fn outgoing(&self) -> Option<TransitionLeg> {
        self.outgoing
    }

    #[must_use]
    pub fn progress(&self) -> f32 {
        self.timer.progress()
    }

    #[must_use]
    pub fn phase(&self) -> AnimPhase {
        self.timer.phase()
    }
}

/// An ordered stack of passages. Index 0 is the bottom.
///
/// Exactly one render placeholder is displayed at a time: the top's. Stack
/// level overrides, when set, win over each passage's own defaults and are
/// written onto passages as they are built in or out.
#[derive(Debug, Default)]
pub struct PassageStack {
    content: Vec<Passage>,
    build_in: AnimationOverride,
    build_out: AnimationOverride,
    mounted: bool,
    displayed: Option<PlaceholderId>,
    transition: Option<Transition>,
}

impl PassageStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_build_in(mut self, build_in: impl Into<AnimationOverride>) -> Self {
        self.build_in = build_in.into();
        self
    }

    #[must_use]
    pub fn with_build_out(mut self, build_out: impl Into<AnimationOverride>) -> Self {
        self.build_out = build_out.into();
        self
    }

    #[must_use]
    pub fn build_in(&self) -> AnimationOverride {
        self.build_in
    }

    #[must_use]
    pub fn build_out(&self) -> AnimationOverride {
        self.build_out
    }

    pub fn set_build_in(&mut self, build_in: impl Into<AnimationOverride>) {
        self.build_in = build_in.into();
    }

    pub fn set_build_out(&mut self, build_out: impl Into<AnimationOverride>) {
        self.build_out = build_out.into();
    }

    /// Enter a parent context. Only a mounted stack propagates on push.
    pub fn mount(&mut self) {
        self.mounted = true;
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    #[must_use]
    pub fn top(&self) -> Option<&Passage> {
        self.content.last()
    }

    #[must_use]
    pub fn previous(&self) -> Option<&Passage> {
        let len = self.content.len();
        if len < 2 {
            return None;
        }
        self.content.get(len - 2)
    }

    #[must_use]
    pub fn first(&self) -> Option<&Passage> {
        self.content.first()
    }

    #[must_use]
    pub fn passages(&self) -> &[Passage] {
        &self.content
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// The placeholder currently shown for this stack.
    #[must_use]
    pub fn displayed(&self) -> Option<&PlaceholderId> {
        self.displayed.as_ref()
    }

    #[must_use]
    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    /// Progress the running transition, dropping it once finished.
    pub fn advance(&mut self, delta: Duration) {
        let Some(transition) = self.transition.as_mut() else {
            return;
        };
        transition.timer.advance(delta);
        if transition.timer.is_finished() {
            self.transition = None;
        }
    }

    pub fn push(&mut self, mut passage: Passage) {
        if self.mounted {
            self.prepare_for_build(Some(&mut passage));
        }
        let outgoing = self.top().and_then(outgoing_leg);

        self.push_and_sync(passage);
        self.begin_transition(TransitionDirection::Push, outgoing);
    }

    pub fn pop(&mut self) -> Option<Passage> {
        if self.content.is_empty() {
            return None;
        }

        let (build_in, build_out) = (self.build_in, self.build_out);
        let len = self.content.len();
        if let Some(previous) = len.checked_sub(2).and_then(|index| self.content.get_mut(index)) {
            previous.propagate(build_in, build_out);
        }
        self.prepare_for_build(None);

        let popped = self.content.pop()?;
        debug!(passage = %popped.id(), remaining = self.content.len(), "Popped passage");
        self.sync_display();
        self.begin_transition(TransitionDirection::Pop, outgoing_leg(&popped));
        Some(popped)
    }

    /// Replace the whole stack. Returns the passages that were released.
    pub fn set_content(&mut self, passages: Vec<Passage>) -> Vec<Passage> {
        if self.displayed.is_some() {
            self.prepare_for_build(None);
        }
        let outgoing = self.top().and_then(outgoing_leg);

        let released = mem::take(&mut self.content);
        self.displayed = None;
        for mut passage in passages {
            if self.mounted {
                self.prepare_for_build(Some(&mut passage));
            }
            self.push_and_sync(passage);
        }

        self.begin_transition(TransitionDirection::Replace, outgoing);
        released
    }

    /// Write the stack's overrides onto the incoming passage, if any, and the current top.
    fn prepare_for_build(&mut self, incoming: Option<&mut Passage>) {
        let (build_in, build_out) = (self.build_in, self.build_out);
        if let Some(incoming) = incoming {
            incoming.propagate(build_in, build_out);
        }
        if let Some(top) = self.content.last_mut() {
            top.propagate(build_in, build_out);
        }
    }

    fn push_and_sync(&mut self, passage: Passage) {
        debug!(passage = %passage.id(), depth = self.content.len() + 1, "Pushed passage");
        self.content.push(passage);
        self.sync_display();
    }

    /// Point the displayed slot at the top's placeholder, creating it if needed.
    fn sync_display(&mut self) {
        let Some(top) = self.content.last_mut() else {
            self.displayed = None;
            return;
        };
        let placeholder = top.ensure_placeholder().clone();
        top.needs_draw = true;
        self.displayed = Some(placeholder);
    }

    fn begin_transition(&mut self, direction: TransitionDirection, outgoing: Option<TransitionLeg>) {
        let incoming = self.top().and_then(|top| {
            top.build_in_override()
                .animation()
                .map(|animation| TransitionLeg {
                    passage: top.id(),
                    animation,
                })
        });
        self.transition = Transition::new(direction, incoming, outgoing);
    }
}

fn outgoing_leg(passage: &Passage) -> Option<TransitionLeg> {
    passage
        .build_out_override()
        .animation()
        .map(|animation| TransitionLeg {
            passage: passage.id(),
            animation,
        })
}
