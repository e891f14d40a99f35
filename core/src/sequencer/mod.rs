//! Staged bootstrap sequencing.
//!
//! The [`Sequencer`] walks an application from its first paint to its main view:
//!
//! ```text
//! Bootstrapping --(bootstrap gate)--> Loading --(main unit entered + loading gate)--> Loaded
//! ```
//!
//! Two things drive it forward:
//!
//! 1. **The main-unit load**: spawned by [`Sequencer::on_render_surface_ready`],
//!    polled from [`Sequencer::tick`].
//! 2. **Two timing gates**: keep the bootstrapping and loading indicators up
//!    for a minimum duration so they never flash.
//!
//! Everything happens on the host's tick. Timers are entries in a
//! [`TimerQueue`] that the tick fires; the load is a tokio task the tick polls
//! with `now_or_never`. Render passes are coalesced behind `needs_draw`, so
//! several conditions flipping in one tick still produce one pass.
//!
//! After the final render pass the sequencer queues
//! [`Notification::ComponentLoaded`] (which hands the main view over) and
//! detaches. Every later tick is a no-op.

pub mod hook;
mod options;

pub use options::{DEFAULT_MAIN_EXPORT, DEFAULT_MAIN_MODULE, SequencerOptions};

use std::fmt;
use std::mem;
use std::sync::Arc;
use std::time::Instant;

use futures_util::FutureExt;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use stagehand_types::{Stage, StageClass, TimerId};

use crate::clock::Clock;
use crate::errors::BootstrapError;
use crate::gate::{GateOutcome, TimingGate};
use crate::loader::{ModuleLoader, ViewFactory, resolve_main_unit};
use crate::manifest::ModuleManifest;
use crate::notifications::{ComponentLoaded, Notification, NotificationQueue};
use crate::surface::{ContentRange, MountSurface, SurfaceNode};
use crate::timer::TimerQueue;
use crate::timing::{BootstrapTiming, TimingMark};
use crate::view::{EnterBookkeeping, MainView, Placement};

/// Which minimum-duration gate a timer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gate {
    Bootstrap,
    Loading,
}

enum MainUnitLoad {
    NotStarted,
    Pending(JoinHandle<Result<ViewFactory, BootstrapError>>),
    Settled,
}

impl MainUnitLoad {
    fn as_str(&self) -> &'static str {
        match self {
            MainUnitLoad::NotStarted => "not_started",
            MainUnitLoad::Pending(_) => "pending",
            MainUnitLoad::Settled => "settled",
        }
    }
}

/// Whether the sequencer still takes part in the live view tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    Attached,
    Detached,
}

pub struct Sequencer {
    options: SequencerOptions,
    loader: Arc<dyn ModuleLoader>,
    clock: Arc<dyn Clock>,
    timing: Arc<BootstrapTiming>,
    surface: Option<MountSurface>,

    stage: Stage,
    is_loading_main_unit: bool,
    ready_to_show_loader: bool,
    timers: TimerQueue<Gate>,
    pending_bootstrap_timer: Option<TimerId>,
    pending_loading_timer: Option<TimerId>,

    main_load: MainUnitLoad,
    main_view: Option<MainView>,
    content_pending_removal: Option<ContentRange>,
    force_removal_requested: bool,

    needs_draw: bool,
    render_passes: usize,
    attachment: Attachment,
    failure: Option<BootstrapError>,
    manifest: ModuleManifest,
    notifications: NotificationQueue,
}

impl Sequencer {
    #[must_use]
    pub fn new(
        options: SequencerOptions,
        loader: Arc<dyn ModuleLoader>,
        clock: Arc<dyn Clock>,
        timing: Arc<BootstrapTiming>,
    ) -> Self {
        Self {
            options,
            loader,
            clock,
            timing,
            surface: None,
            stage: Stage::Bootstrapping,
            is_loading_main_unit: false,
            ready_to_show_loader: false,
            timers: TimerQueue::new(),
            pending_bootstrap_timer: None,
            pending_loading_timer: None,
            main_load: MainUnitLoad::NotStarted,
            main_view: None,
            content_pending_removal: None,
            force_removal_requested: false,
            needs_draw: false,
            render_passes: 0,
            attachment: Attachment::Attached,
            failure: None,
            manifest: ModuleManifest::default(),
            notifications: NotificationQueue::new(),
        }
    }

    /// Mount on an existing surface instead of the document root.
    #[must_use]
    pub fn with_surface(mut self, surface: MountSurface) -> Self {
        self.surface = Some(surface);
        self
    }

    // ========================================================================
    // Observation
    // ========================================================================

    #[must_use]
    pub fn current_stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub fn options(&self) -> &SequencerOptions {
        &self.options
    }

    #[must_use]
    pub fn timing(&self) -> &Arc<BootstrapTiming> {
        &self.timing
    }

    #[must_use]
    pub fn is_loading_main_unit(&self) -> bool {
        self.is_loading_main_unit
    }

    #[must_use]
    pub fn ready_to_show_loader(&self) -> bool {
        self.ready_to_show_loader
    }

    #[must_use]
    pub fn ready_to_show_main_view(&self) -> bool {
        self.main_view.is_some()
    }

    #[must_use]
    pub fn main_view(&self) -> Option<&MainView> {
        self.main_view.as_ref()
    }

    #[must_use]
    pub fn surface(&self) -> Option<&MountSurface> {
        self.surface.as_ref()
    }

    /// Hand the surface to the host once the sequencer has detached.
    pub fn take_surface(&mut self) -> Option<MountSurface> {
        if self.attachment == Attachment::Attached {
            return None;
        }
        self.surface.take()
    }

    #[must_use]
    pub fn content_pending_removal(&self) -> Option<ContentRange> {
        self.content_pending_removal
    }

    #[must_use]
    pub fn has_pending_bootstrap_timer(&self) -> bool {
        self.pending_bootstrap_timer.is_some()
    }

    #[must_use]
    pub fn has_pending_loading_timer(&self) -> bool {
        self.pending_loading_timer.is_some()
    }

    /// When the next armed gate fires, so a host can sleep until then.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    #[must_use]
    pub fn attachment(&self) -> Attachment {
        self.attachment
    }

    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.attachment == Attachment::Detached
    }

    #[must_use]
    pub fn failure(&self) -> Option<&BootstrapError> {
        self.failure.as_ref()
    }

    #[must_use]
    pub fn needs_draw(&self) -> bool {
        self.needs_draw
    }

    /// Number of render passes run so far.
    #[must_use]
    pub fn render_passes(&self) -> usize {
        self.render_passes
    }

    #[must_use]
    pub fn required_modules(&self) -> Option<&[String]> {
        self.manifest
            .required_modules(self.options.include_framework_modules)
    }

    #[must_use]
    pub fn initialized_modules(&self) -> Option<&[String]> {
        self.manifest
            .initialized_modules(self.options.include_framework_modules)
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.take()
    }

    // ========================================================================
    // Driving
    // ========================================================================

    /// The sequencer's own surface is prepared. Call once.
    ///
    /// Must run inside a tokio runtime: the main-unit load is spawned here.
    pub fn on_render_surface_ready(&mut self) {
        if !matches!(self.main_load, MainUnitLoad::NotStarted) {
            warn!(
                load = self.main_load.as_str(),
                "Render surface reported ready more than once; ignoring"
            );
            return;
        }
        debug!("Render surface ready");

        self.load_main_unit();

        if self.surface.is_none() {
            self.surface = Some(MountSurface::document_root());
        }

        self.ready_to_show_loader = true;
        self.needs_draw = true;

        let now = self.clock.now();
        let gate = TimingGate::new(self.options.minimum_bootstrap_duration);
        match gate.arm(
            self.timing.bootstrap_start(),
            now,
            &mut self.timers,
            Gate::Bootstrap,
        ) {
            GateOutcome::Elapsed => {
                self.timing.record(TimingMark::BootstrapEnd, now);
                self.reveal_loader();
            }
            GateOutcome::Armed { timer, remaining } => {
                debug!(
                    remaining_ms = remaining.as_millis(),
                    "Still need to show bootstrapper"
                );
                self.pending_bootstrap_timer = Some(timer);
            }
        }
    }

    /// Ask for bootstrap content to be removed on the `Loaded` render pass even
    /// when `remove_content_on_load` is off. Returns `false` once detached.
    pub fn force_content_removal(&mut self) -> bool {
        if self.is_detached() {
            warn!("Content removal requested after the sequencer detached");
            return false;
        }
        self.force_removal_requested = true;
        self.needs_draw = true;
        true
    }

    /// Advance the sequencer: fire due gates, poll the main-unit load, run the
    /// main view's enter hook if it is due, then run at most one render pass.
    ///
    /// A load failure is returned once and kept in [`Sequencer::failure`]; the
    /// sequencer then stays where it is.
    pub fn tick(&mut self) -> Result<(), BootstrapError> {
        if self.is_detached() {
            return Ok(());
        }

        self.fire_due_timers();
        let polled = self.poll_main_unit();
        self.draw_cycle();
        polled
    }

    /// Move to `stage`. Equal stages are a no-op and backward moves are ignored.
    pub(crate) fn set_stage(&mut self, stage: Stage) {
        if stage == self.stage {
            return;
        }
        if stage < self.stage {
            debug!(current = %self.stage, requested = %stage, "Ignoring backward stage change");
            return;
        }

        debug!(stage = %stage, "Current stage");
        self.stage = stage;
        self.needs_draw = true;
    }

    // ========================================================================
    // Main unit
    // ========================================================================

    fn load_main_unit(&mut self) {
        debug!(
            module = %self.options.main_module,
            export = %self.options.main_export,
            "Loading main unit"
        );
        self.is_loading_main_unit = true;
        self.manifest = self.loader.manifest();

        let task = resolve_main_unit(
            self.loader.as_ref(),
            &self.options.main_module,
            &self.options.main_export,
        );
        self.main_load = MainUnitLoad::Pending(tokio::spawn(task));
    }

    fn poll_main_unit(&mut self) -> Result<(), BootstrapError> {
        let finished = match &self.main_load {
            MainUnitLoad::Pending(handle) => handle.is_finished(),
            MainUnitLoad::NotStarted | MainUnitLoad::Settled => return Ok(()),
        };
        if !finished {
            return Ok(());
        }

        let mut handle = match mem::replace(&mut self.main_load, MainUnitLoad::Settled) {
            MainUnitLoad::Pending(handle) => handle,
            other => {
                self.main_load = other;
                return Ok(());
            }
        };

        match (&mut handle).now_or_never() {
            Some(Ok(Ok(factory))) => {
                self.main_unit_loaded(&factory);
                Ok(())
            }
            Some(Ok(Err(err))) => Err(self.fail(err)),
            Some(Err(join_err)) => Err(self.fail(BootstrapError::TaskFailed(join_err.to_string()))),
            None => {
                self.main_load = MainUnitLoad::Pending(handle);
                Ok(())
            }
        }
    }

    fn main_unit_loaded(&mut self, factory: &ViewFactory) {
        debug!("Main unit loaded; attaching main view off-screen");
        self.manifest = self.loader.manifest();

        let main_view = MainView::off_screen(factory());
        self.main_view = Some(main_view);
    }

    fn fail(&mut self, err: BootstrapError) -> BootstrapError {
        warn!(error = %err, stage = %self.stage, "Bootstrap failed");
        self.failure = Some(err.clone());
        err
    }

    // ========================================================================
    // Gates and reveals
    // ========================================================================

    fn fire_due_timers(&mut self) {
        let now = self.clock.now();
        for (timer, gate) in self.timers.take_due(now) {
            match gate {
                Gate::Bootstrap => {
                    if self.pending_bootstrap_timer == Some(timer) {
                        self.pending_bootstrap_timer = None;
                    }
                    self.timing.record(TimingMark::BootstrapEnd, now);
                    self.reveal_loader();
                }
                Gate::Loading => {
                    if self.pending_loading_timer == Some(timer) {
                        self.pending_loading_timer = None;
                    }
                    debug!("Shown loader long enough");
                    self.timing.record(TimingMark::LoadingEnd, now);
                    self.reveal_main_view();
                }
            }
        }
    }

    fn reveal_loader(&mut self) {
        debug!("Revealing loader");
        self.timing.record(TimingMark::LoadingStart, self.clock.now());
        self.set_stage(Stage::Loading);
        self.maybe_reveal_main_view();

        if let Some(surface) = self.surface.as_mut() {
            let attached = surface.attach_loading_indicators();
            if attached > 0 {
                debug!(attached, "Attached loading indicators");
            }
        }
    }

    /// Reveal the main view once nothing is holding it back.
    fn maybe_reveal_main_view(&mut self) {
        if self.pending_loading_timer.is_some()
            || self.is_loading_main_unit
            || self.pending_bootstrap_timer.is_some()
        {
            return;
        }
        if self.stage != Stage::Loading {
            return;
        }

        let now = self.clock.now();
        let start = self.timing.loading_start().unwrap_or(now);
        let gate = TimingGate::new(self.options.minimum_loading_duration);
        match gate.arm(start, now, &mut self.timers, Gate::Loading) {
            GateOutcome::Elapsed => {
                self.timing.record(TimingMark::LoadingEnd, now);
                self.reveal_main_view();
            }
            GateOutcome::Armed { timer, remaining } => {
                debug!(
                    remaining_ms = remaining.as_millis(),
                    "Show loader for a while longer"
                );
                self.pending_loading_timer = Some(timer);
            }
        }
    }

    fn reveal_main_view(&mut self) {
        debug!("Revealing main view");
        self.set_stage(Stage::Loaded);
    }

    // ========================================================================
    // Draw cycle
    // ========================================================================

    fn draw_cycle(&mut self) {
        self.enter_main_view();

        if let Some(main_view) = self.main_view.as_mut() {
            main_view.draw();
        }
        if let Some(surface) = self.surface.as_mut() {
            surface.draw();
        }

        if self.needs_draw {
            self.needs_draw = false;
            self.draw();
        }
    }

    fn enter_main_view(&mut self) {
        let Some(main_view) = self.main_view.as_mut() else {
            return;
        };
        if main_view.placement() != Placement::OffScreen {
            return;
        }

        if let Some(bookkeeping) = main_view.begin_enter() {
            self.main_view_will_enter(bookkeeping);
            if let Some(main_view) = self.main_view.as_mut() {
                main_view.finish_enter();
            }
        }
    }

    /// Runs once, right before the main view first enters the live tree.
    fn main_view_will_enter(&mut self, _bookkeeping: EnterBookkeeping) {
        debug!("Main view preparing to draw");
        self.is_loading_main_unit = false;

        let surface = self.surface.get_or_insert_with(MountSurface::document_root);
        self.content_pending_removal = Some(surface.capture_contents());
        if let Some(main_view) = &self.main_view {
            surface.append(SurfaceNode::main_view(
                main_view.placeholder().clone(),
                main_view.identifier(),
            ));
        }

        self.maybe_reveal_main_view();

        if let Some(surface) = self.surface.as_mut() {
            surface.unregister_event_bindings();
        }
    }

    fn draw(&mut self) {
        self.render_passes += 1;
        let stage = self.stage;
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        match stage {
            Stage::Bootstrapping => {}
            Stage::Loading => {
                surface.remove_class(StageClass::Bootstrapping);
                surface.add_class(stage.class());
            }
            Stage::Loaded => {
                if self.content_pending_removal.is_none() {
                    return;
                }

                surface.remove_class(StageClass::Bootstrapping);
                surface.remove_class(StageClass::Loading);

                if self.options.remove_content_on_load || self.force_removal_requested {
                    if let Some(range) = self.content_pending_removal.take() {
                        let removed = surface.extract(range);
                        debug!(removed = removed.len(), "Removed bootstrap content");
                    }
                }

                surface.add_class(stage.class());
                self.detach();
            }
        }
    }

    /// Last act of the final render pass.
    fn detach(&mut self) {
        if let Some(main_view) = self.main_view.take() {
            self.notifications
                .push(Notification::ComponentLoaded(ComponentLoaded {
                    main_view,
                    retained_content: self.content_pending_removal.take(),
                }));
        }
        debug!("Sequencer detached");
        self.attachment = Attachment::Detached;
    }
}

impl fmt::Debug for Sequencer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequencer")
            .field("stage", &self.stage)
            .field("is_loading_main_unit", &self.is_loading_main_unit)
            .field("ready_to_show_loader", &self.ready_to_show_loader)
            .field("pending_bootstrap_timer", &self.pending_bootstrap_timer)
            .field("pending_loading_timer", &self.pending_loading_timer)
            .field("main_load", &self.main_load.as_str())
            .field("main_view", &self.main_view)
            .field("attachment", &self.attachment)
            .field("failure", &self.failure)
            .finish_non_exhaustive()
    }
}
