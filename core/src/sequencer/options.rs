use std::time::Duration;

use stagehand_types::{NonEmptyStaticStr, NonEmptyString};

pub const DEFAULT_MAIN_MODULE: NonEmptyStaticStr = NonEmptyStaticStr::new("ui/main");
pub const DEFAULT_MAIN_EXPORT: NonEmptyStaticStr = NonEmptyStaticStr::new("Main");

/// Configuration the bootstrap sequencer runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencerOptions {
    /// Unit to load as the application's main view.
    pub main_module: NonEmptyString,
    /// Export to read from the main unit.
    pub main_export: NonEmptyString,
    /// Whether module lists keep the framework's own entries.
    pub include_framework_modules: bool,
    /// The bootstrapping indicator stays up at least this long.
    pub minimum_bootstrap_duration: Duration,
    /// The loading indicator stays up at least this long.
    pub minimum_loading_duration: Duration,
    /// Remove bootstrap content as soon as the main view is revealed.
    /// When false, removal waits for an explicit request.
    pub remove_content_on_load: bool,
}

impl Default for SequencerOptions {
    fn default() -> Self {
        Self {
            main_module: DEFAULT_MAIN_MODULE.into(),
            main_export: DEFAULT_MAIN_EXPORT.into(),
            include_framework_modules: false,
            minimum_bootstrap_duration: Duration::ZERO,
            minimum_loading_duration: Duration::ZERO,
            remove_content_on_load: true,
        }
    }
}
