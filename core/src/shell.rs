//! Host-side state around a [`Sequencer`].
//!
//! A [`Shell`] boots the application through its sequencer, takes the main
//! view when `componentLoaded` arrives, and from then on routes navigation
//! commands to the passage stack the main view hosts.

use std::time::Duration;

use tracing::{debug, info};

use stagehand_types::Stage;

use crate::errors::BootstrapError;
use crate::notifications::{ComponentLoaded, Notification};
use crate::passage::{Passage, PassageStack};
use crate::sequencer::Sequencer;
use crate::surface::{ContentRange, MountSurface};
use crate::view::MainView;

/// Actions a host can ask the shell to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    PushPassage,
    PopPassage,
    ClearPassages,
    /// Remove bootstrap content that was kept on the surface.
    ForceContentRemoval,
    Quit,
}

enum Phase {
    Booting,
    Running(MainView),
    Failed(BootstrapError),
}

pub struct Shell {
    sequencer: Sequencer,
    phase: Phase,
    surface: Option<MountSurface>,
    retained_content: Option<ContentRange>,
    passages_created: usize,
    frame: usize,
    should_quit: bool,
}

impl Shell {
    #[must_use]
    pub fn new(sequencer: Sequencer) -> Self {
        Self {
            sequencer,
            phase: Phase::Booting,
            surface: None,
            retained_content: None,
            passages_created: 0,
            frame: 0,
            should_quit: false,
        }
    }

    /// Report the render surface ready. Must run inside a tokio runtime.
    pub fn start(&mut self) {
        self.sequencer.on_render_surface_ready();
    }

    /// Advance by one frame. `delta` is the time since the previous frame.
    pub fn tick(&mut self, delta: Duration) {
        self.frame = self.frame.wrapping_add(1);

        if matches!(self.phase, Phase::Booting) {
            self.tick_booting();
            return;
        }

        if let Phase::Running(main_view) = &mut self.phase {
            if let Some(stack) = main_view.view_mut().navigator_mut() {
                stack.advance(delta);
            }
            main_view.draw();
        }
    }

    fn tick_booting(&mut self) {
        if let Err(err) = self.sequencer.tick() {
            self.phase = Phase::Failed(err);
            return;
        }

        for notification in self.sequencer.take_notifications() {
            match notification {
                Notification::ComponentLoaded(loaded) => self.component_loaded(loaded),
            }
        }
    }

    fn component_loaded(&mut self, loaded: ComponentLoaded) {
        info!(
            view = loaded.main_view.identifier(),
            retained = loaded.retained_content.map_or(0, |range| range.len()),
            "Component loaded"
        );
        self.surface = self.sequencer.take_surface();
        self.retained_content = loaded.retained_content;
        self.phase = Phase::Running(loaded.main_view);
    }

    pub fn apply(&mut self, command: ShellCommand) {
        match command {
            ShellCommand::Quit => self.request_quit(),
            ShellCommand::ForceContentRemoval => self.force_content_removal(),
            ShellCommand::PushPassage => {
                self.passages_created += 1;
                let passage = Passage::new(format!("Passage {}", self.passages_created));
                if let Some(stack) = self.navigator_mut() {
                    stack.push(passage);
                } else {
                    debug!("No navigator yet; push ignored");
                }
            }
            ShellCommand::PopPassage => {
                if let Some(stack) = self.navigator_mut() {
                    stack.pop();
                }
            }
            ShellCommand::ClearPassages => {
                if let Some(stack) = self.navigator_mut() {
                    let released = stack.set_content(Vec::new());
                    debug!(released = released.len(), "Cleared passages");
                }
            }
        }
    }

    fn force_content_removal(&mut self) {
        if matches!(self.phase, Phase::Booting) {
            self.sequencer.force_content_removal();
            return;
        }

        if let (Some(range), Some(surface)) = (self.retained_content.take(), self.surface.as_mut()) {
            let removed = surface.extract(range);
            debug!(removed = removed.len(), "Removed retained bootstrap content");
        }
    }

    #[must_use]
    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// The stage shown to the user. Running implies `Loaded`.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.sequencer.current_stage()
    }

    #[must_use]
    pub fn is_booting(&self) -> bool {
        matches!(self.phase, Phase::Booting)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running(_))
    }

    #[must_use]
    pub fn failure(&self) -> Option<&BootstrapError> {
        match &self.phase {
            Phase::Failed(err) => Some(err),
            Phase::Booting | Phase::Running(_) => None,
        }
    }

    #[must_use]
    pub fn main_view(&self) -> Option<&MainView> {
        match &self.phase {
            Phase::Running(main_view) => Some(main_view),
            Phase::Booting | Phase::Failed(_) => None,
        }
    }

    #[must_use]
    pub fn navigator(&self) -> Option<&PassageStack> {
        self.main_view()
            .and_then(|main_view| main_view.view().navigator())
    }

    pub fn navigator_mut(&mut self) -> Option<&mut PassageStack> {
        match &mut self.phase {
            Phase::Running(main_view) => main_view.view_mut().navigator_mut(),
            Phase::Booting | Phase::Failed(_) => None,
        }
    }

    /// The mount surface, whether the sequencer still holds it or not.
    #[must_use]
    pub fn surface(&self) -> Option<&MountSurface> {
        self.surface.as_ref().or_else(|| self.sequencer.surface())
    }

    #[must_use]
    pub fn retained_content(&self) -> Option<ContentRange> {
        self.retained_content
    }

    /// Frames ticked so far; drives indicator animation.
    #[must_use]
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Leave the running navigator's parent context and flag the host to exit.
    pub fn request_quit(&mut self) {
        if let Some(stack) = self.navigator_mut() {
            stack.unmount();
        }
        self.should_quit = true;
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}
