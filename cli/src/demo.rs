//! Built-in module registry the binary boots into.

use std::iter;
use std::time::Duration;

use stagehand_core::{
    Exports, ModuleManifest, MountSurface, Passage, PassageStack, SequencerOptions, StaticLoader,
    SurfaceNode, TransitionAnimation, View,
};

const LOAD_LATENCY: Duration = Duration::from_millis(400);
const SLIDE_DURATION: Duration = Duration::from_millis(220);
const FADE_DURATION: Duration = Duration::from_millis(140);

/// Main view of the demo unit: a navigator that starts on a home passage.
pub struct DemoMain {
    stack: PassageStack,
}

impl DemoMain {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stack: PassageStack::new()
                .with_build_in(TransitionAnimation::slide_left(SLIDE_DURATION))
                .with_build_out(TransitionAnimation::fade(FADE_DURATION)),
        }
    }
}

impl Default for DemoMain {
    fn default() -> Self {
        Self::new()
    }
}

impl View for DemoMain {
    fn identifier(&self) -> &str {
        "demo-main"
    }

    fn enter_document(&mut self, first_time: bool) {
        if first_time {
            // Pushed before mounting so Home keeps its own build-in.
            self.stack.push(
                Passage::new("Home")
                    .with_identifier("home")
                    .with_build_in(TransitionAnimation::pop_scale(SLIDE_DURATION)),
            );
            self.stack.mount();
        }
    }

    fn navigator(&self) -> Option<&PassageStack> {
        Some(&self.stack)
    }

    fn navigator_mut(&mut self) -> Option<&mut PassageStack> {
        Some(&mut self.stack)
    }
}

/// Registry holding the demo unit under the configured module and export.
#[must_use]
pub fn loader(options: &SequencerOptions) -> StaticLoader {
    let exports = Exports::new().with(options.main_export.as_str(), || Box::new(DemoMain::new()));
    StaticLoader::new()
        .with_unit(options.main_module.as_str(), exports)
        .with_latency(LOAD_LATENCY)
        .with_manifest(manifest(options))
}

fn manifest(options: &SequencerOptions) -> ModuleManifest {
    let modules: Vec<String> = ["stagehand/runtime", "stagehand/surface", "stagehand/passage"]
        .into_iter()
        .map(str::to_string)
        .chain(iter::once(options.main_module.to_string()))
        .collect();
    ModuleManifest::new(3)
        .with_required(modules.clone())
        .with_initialized(modules)
}

/// Mount surface with a splash line and a loading indicator.
#[must_use]
pub fn surface() -> MountSurface {
    MountSurface::element("stagehand-root")
        .with_node(SurfaceNode::content("splash", "Stagehand is starting"))
        .with_node(SurfaceNode::loading_indicator("spinner", "Loading main view"))
}
