//! Bootstrap stages and the state classes that mirror them on the mount surface.

use std::fmt;

/// Phase of the bootstrap sequence.
///
/// Ordinals are ordered: a sequencer only ever moves forward through
/// `Bootstrapping < Loading < Loaded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Stage {
    #[default]
    Bootstrapping = 0,
    Loading = 1,
    Loaded = 2,
}

impl Stage {
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn class(self) -> StageClass {
        match self {
            Stage::Bootstrapping => StageClass::Bootstrapping,
            Stage::Loading => StageClass::Loading,
            Stage::Loaded => StageClass::Loaded,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Stage::Bootstrapping => "bootstrapping",
            Stage::Loading => "loading",
            Stage::Loaded => "loaded",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.ordinal())
    }
}

/// State class applied to the mount surface.
///
/// At most one of these is present on a surface at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageClass {
    Bootstrapping,
    Loading,
    Loaded,
}

impl StageClass {
    pub const ALL: [StageClass; 3] = [
        StageClass::Bootstrapping,
        StageClass::Loading,
        StageClass::Loaded,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StageClass::Bootstrapping => "stagehand-app-bootstrapping",
            StageClass::Loading => "stagehand-app-loading",
            StageClass::Loaded => "stagehand-app-loaded",
        }
    }
}

impl fmt::Display for StageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
