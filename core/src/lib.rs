//! Core logic for Stagehand.
//!
//! This crate holds the two state machines the rest of the workspace drives:
//! the staged bootstrap [`Sequencer`] and the [`PassageStack`] navigator,
//! plus the seams they run against (clock, module loader, views, the mount
//! surface model) and the [`Shell`] a host wraps around them. Nothing here
//! touches a terminal.

pub mod clock;
mod errors;
mod gate;
mod loader;
mod manifest;
mod notifications;
pub mod passage;
pub mod sequencer;
mod shell;
mod surface;
mod timer;
mod timing;
mod view;

pub use clock::{Clock, ManualClock, SystemClock};
pub use errors::{BootstrapError, ModuleLoadError};
pub use gate::{GateDecision, GateOutcome, TimingGate};
pub use loader::{Exports, LoadResult, ModuleLoader, StaticLoader, ViewFactory, resolve_main_unit};
pub use manifest::ModuleManifest;
pub use notifications::{ComponentLoaded, Notification, NotificationQueue};
pub use passage::{Passage, PassageStack, Transition, TransitionDirection, TransitionLeg};
pub use sequencer::{Attachment, Sequencer, SequencerOptions};
pub use shell::{Shell, ShellCommand};
pub use surface::{ContentRange, MountSurface, NodeRole, SurfaceKind, SurfaceNode};
pub use timer::TimerQueue;
pub use timing::BootstrapTiming;
pub use view::{MainView, Placement, View};

pub use stagehand_types::{
    AnimPhase, AnimationOverride, EffectTimer, NonEmptyStaticStr, NonEmptyString, PassageId,
    PlaceholderId, Stage, StageClass, TimerId, TransitionAnimation, TransitionKind, UiOptions,
};
