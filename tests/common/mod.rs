//! Shared test utilities and fixtures

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use stagehand_core::{
    BootstrapTiming, Exports, ManualClock, MountSurface, Passage, PassageStack, Sequencer,
    SequencerOptions, Shell, StaticLoader, SurfaceNode, TransitionAnimation, View,
};

pub const FRAME: Duration = Duration::from_millis(16);
pub const SLIDE: Duration = Duration::from_millis(200);

/// Main view that hosts a navigator and opens on a "Home" passage.
pub struct Navigator {
    stack: PassageStack,
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            stack: PassageStack::new().with_build_in(TransitionAnimation::slide_left(SLIDE)),
        }
    }
}

impl View for Navigator {
    fn identifier(&self) -> &str {
        "navigator"
    }

    fn enter_document(&mut self, first_time: bool) {
        if first_time {
            self.stack.mount();
            self.stack.push(Passage::new("Home").with_identifier("home"));
        }
    }

    fn navigator(&self) -> Option<&PassageStack> {
        Some(&self.stack)
    }

    fn navigator_mut(&mut self) -> Option<&mut PassageStack> {
        Some(&mut self.stack)
    }
}

pub fn navigator_unit(module: &str, export: &str) -> StaticLoader {
    StaticLoader::new().with_unit(
        module,
        Exports::new().with(export, || Box::new(Navigator::new())),
    )
}

pub fn bootstrap_surface() -> MountSurface {
    MountSurface::element("app")
        .with_node(SurfaceNode::content("splash", "Starting up"))
        .with_node(SurfaceNode::loading_indicator("spinner", "Loading"))
}

pub struct TestShell {
    pub clock: Arc<ManualClock>,
    pub shell: Shell,
}

impl TestShell {
    pub fn new(options: SequencerOptions, loader: StaticLoader) -> Self {
        let clock = Arc::new(ManualClock::new());
        let timing = Arc::new(BootstrapTiming::start(clock.as_ref()));
        let sequencer = Sequencer::new(options, Arc::new(loader), clock.clone(), timing)
            .with_surface(bootstrap_surface());
        Self {
            clock,
            shell: Shell::new(sequencer),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(
            SequencerOptions::default(),
            navigator_unit("ui/main", "Main"),
        )
    }

    pub fn advance(&self, millis: u64) {
        self.clock.advance(Duration::from_millis(millis));
    }

    /// Tick frames, yielding so the spawned load can finish.
    pub async fn settle(&mut self) {
        for _ in 0..8 {
            self.shell.tick(FRAME);
            tokio::task::yield_now().await;
        }
    }

    pub async fn boot(&mut self) {
        self.shell.start();
        self.settle().await;
    }
}
