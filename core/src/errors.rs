//! Failures that end a bootstrap attempt.
//!
//! None of these are retried. A sequencer that hits one stalls at its current
//! stage and never emits `componentLoaded`.

use thiserror::Error;

/// The module loader could not produce a unit's exports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModuleLoadError {
    #[error("module {module} not found")]
    NotFound { module: String },
    #[error("failed to parse module {module}: {reason}")]
    Parse { module: String, reason: String },
}

impl ModuleLoadError {
    #[must_use]
    pub fn module(&self) -> &str {
        match self {
            ModuleLoadError::NotFound { module } | ModuleLoadError::Parse { module, .. } => module,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BootstrapError {
    /// The unit loaded, but it does not export the requested name.
    #[error("{export} was not found in {module}")]
    MainUnitNotFound { export: String, module: String },
    #[error(transparent)]
    ModuleLoad(#[from] ModuleLoadError),
    /// The load task panicked or was cancelled before producing a result.
    #[error("main unit load task failed: {0}")]
    TaskFailed(String),
}
