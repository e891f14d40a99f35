//! Asynchronous resolution of the application's main unit.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tracing::debug;

use stagehand_types::NonEmptyString;

use crate::errors::{BootstrapError, ModuleLoadError};
use crate::manifest::ModuleManifest;
use crate::view::View;

/// Constructs a fresh instance of an exported view.
pub type ViewFactory = Arc<dyn Fn() -> Box<dyn View> + Send + Sync>;

/// Result of looking up an export by name in a loaded unit.
#[derive(Clone)]
pub enum LoadResult {
    Found(ViewFactory),
    NotFound,
}

impl fmt::Debug for LoadResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadResult::Found(_) => f.write_str("Found(<factory>)"),
            LoadResult::NotFound => f.write_str("NotFound"),
        }
    }
}

/// Named exports of a loaded unit.
#[derive(Clone, Default)]
pub struct Exports {
    entries: BTreeMap<String, ViewFactory>,
}

impl Exports {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn View> + Send + Sync + 'static,
    {
        self.insert(name, factory);
        self
    }

    pub fn insert<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn View> + Send + Sync + 'static,
    {
        self.entries.insert(name.into(), Arc::new(factory));
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> LoadResult {
        match self.entries.get(name) {
            Some(factory) => LoadResult::Found(Arc::clone(factory)),
            None => LoadResult::NotFound,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Exports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

/// Resolves named units of code into their exports.
pub trait ModuleLoader: Send + Sync {
    fn load(&self, unit_id: &str) -> BoxFuture<'static, Result<Exports, ModuleLoadError>>;

    /// Modules required and initialized so far.
    fn manifest(&self) -> ModuleManifest {
        ModuleManifest::default()
    }
}

/// Load `module` and pick `export` out of it.
///
/// The returned future owns everything it needs, so it can be spawned.
pub fn resolve_main_unit(
    loader: &dyn ModuleLoader,
    module: &NonEmptyString,
    export: &NonEmptyString,
) -> BoxFuture<'static, Result<ViewFactory, BootstrapError>> {
    let pending = loader.load(module.as_str());
    let module = module.clone();
    let export = export.clone();

    async move {
        let exports = pending.await?;
        match exports.lookup(export.as_str()) {
            LoadResult::Found(factory) => {
                debug!(module = %module, export = %export, "Main unit resolved");
                Ok(factory)
            }
            LoadResult::NotFound => Err(BootstrapError::MainUnitNotFound {
                export: export.into_inner(),
                module: module.into_inner(),
            }),
        }
    }
    .boxed()
}

/// In-memory registry of units, optionally with an artificial load latency.
#[derive(Debug, Clone, Default)]
pub struct StaticLoader {
    units: HashMap<String, Exports>,
    latency: Option<Duration>,
    manifest: ModuleManifest,
}

impl StaticLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_unit(mut self, unit_id: impl Into<String>, exports: Exports) -> Self {
        self.units.insert(unit_id.into(), exports);
        self
    }

    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    #[must_use]
    pub fn with_manifest(mut self, manifest: ModuleManifest) -> Self {
        self.manifest = manifest;
        self
    }
}

impl ModuleLoader for StaticLoader {
    fn load(&self, unit_id: &str) -> BoxFuture<'static, Result<Exports, ModuleLoadError>> {
        let found = self.units.get(unit_id).cloned();
        let latency = self.latency;
        let unit_id = unit_id.to_string();

        async move {
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            found.ok_or(ModuleLoadError::NotFound { module: unit_id })
        }
        .boxed()
    }

    fn manifest(&self) -> ModuleManifest {
        self.manifest.clone()
    }
}
