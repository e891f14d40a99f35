//! Views the sequencer constructs and hands over to the application.

use std::fmt;

use stagehand_types::PlaceholderId;

use crate::passage::PassageStack;
use crate::sequencer::hook::{Invocation, OnceAdapter};

/// A unit of UI produced by a loaded module.
pub trait View {
    fn identifier(&self) -> &str;

    /// Called each time the view enters the live tree. `first_time` is true once.
    fn enter_document(&mut self, _first_time: bool) {}

    fn draw(&mut self) {}

    /// The navigable region this view hosts, if any.
    fn navigator(&self) -> Option<&PassageStack> {
        None
    }

    fn navigator_mut(&mut self) -> Option<&mut PassageStack> {
        None
    }
}

/// Where the main view currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Attached to the sequencer but not inserted into the visible tree.
    OffScreen,
    Live,
}

/// Token carried by the enter-hook adapter until the sequencer consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EnterBookkeeping;

/// The application's main view plus the state the sequencer keeps about it.
pub struct MainView {
    view: Box<dyn View>,
    placeholder: PlaceholderId,
    placement: Placement,
    needs_draw: bool,
    entered: bool,
    enter_hook: OnceAdapter<EnterBookkeeping>,
}

impl MainView {
    pub(crate) fn off_screen(view: Box<dyn View>) -> Self {
        let placeholder = PlaceholderId::new(view.identifier());
        Self {
            view,
            placeholder,
            placement: Placement::OffScreen,
            needs_draw: true,
            entered: false,
            enter_hook: OnceAdapter::wrap(EnterBookkeeping),
        }
    }

    #[must_use]
    pub fn view(&self) -> &dyn View {
        self.view.as_ref()
    }

    pub fn view_mut(&mut self) -> &mut dyn View {
        self.view.as_mut()
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        self.view.identifier()
    }

    #[must_use]
    pub fn placeholder(&self) -> &PlaceholderId {
        &self.placeholder
    }

    #[must_use]
    pub fn placement(&self) -> Placement {
        self.placement
    }

    #[must_use]
    pub fn needs_draw(&self) -> bool {
        self.needs_draw
    }

    pub fn mark_needs_draw(&mut self) {
        self.needs_draw = true;
    }

    /// True while the sequencer's one-shot bookkeeping is still wrapped around the view.
    #[must_use]
    pub fn is_hook_wrapped(&self) -> bool {
        self.enter_hook.is_wrapped()
    }

    /// Run the enter hook. The first call yields the sequencer's bookkeeping
    /// token instead of entering; the caller does its work and then calls
    /// [`MainView::finish_enter`]. Every later call enters directly.
    pub(crate) fn begin_enter(&mut self) -> Option<EnterBookkeeping> {
        match self.enter_hook.invoke() {
            Invocation::First(token) => Some(token),
            Invocation::Passthrough => {
                self.finish_enter();
                None
            }
        }
    }

    pub(crate) fn finish_enter(&mut self) {
        self.placement = Placement::Live;
        let first_time = !self.entered;
        self.entered = true;
        self.view.enter_document(first_time);
    }

    /// Enter the live tree again after the sequencer has let go of the view.
    pub fn enter_document(&mut self) {
        if self.begin_enter().is_some() {
            self.finish_enter();
        }
    }

    pub fn draw(&mut self) {
        if !self.needs_draw {
            return;
        }
        self.needs_draw = false;
        self.view.draw();
    }
}

impl fmt::Debug for MainView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MainView")
            .field("identifier", &self.view.identifier())
            .field("placeholder", &self.placeholder)
            .field("placement", &self.placement)
            .field("needs_draw", &self.needs_draw)
            .field("hook_wrapped", &self.enter_hook.is_wrapped())
            .finish()
    }
}
