//! Modules the loader has required and initialized during this run.

/// Required and initialized module ids as reported by a [`ModuleLoader`](crate::ModuleLoader).
///
/// The first `framework_module_count` entries of each list belong to the
/// framework itself. When framework units are excluded, the lists are cut at
/// `framework_module_count - 1`, which keeps the last framework entry. That
/// cut point is the long-standing observed behaviour and is kept as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleManifest {
    required: Option<Vec<String>>,
    initialized: Option<Vec<String>>,
    framework_module_count: usize,
}

impl ModuleManifest {
    #[must_use]
    pub fn new(framework_module_count: usize) -> Self {
        Self {
            required: None,
            initialized: None,
            framework_module_count,
        }
    }

    #[must_use]
    pub fn with_required(mut self, modules: Vec<String>) -> Self {
        self.required = Some(modules);
        self
    }

    #[must_use]
    pub fn with_initialized(mut self, modules: Vec<String>) -> Self {
        self.initialized = Some(modules);
        self
    }

    #[must_use]
    pub fn framework_module_count(&self) -> usize {
        self.framework_module_count
    }

    #[must_use]
    pub fn required_modules(&self, include_framework: bool) -> Option<&[String]> {
        self.required
            .as_deref()
            .map(|modules| self.select(modules, include_framework))
    }

    #[must_use]
    pub fn initialized_modules(&self, include_framework: bool) -> Option<&[String]> {
        self.initialized
            .as_deref()
            .map(|modules| self.select(modules, include_framework))
    }

    fn select<'a>(&self, modules: &'a [String], include_framework: bool) -> &'a [String] {
        if include_framework {
            return modules;
        }
        let start = slice_start(modules.len(), self.framework_module_count as i64 - 1);
        &modules[start..]
    }
}

/// Resolve a slice start where negative values count back from the end.
fn slice_start(len: usize, start: i64) -> usize {
    if start < 0 {
        let back = usize::try_from(start.unsigned_abs()).unwrap_or(usize::MAX);
        len.saturating_sub(back)
    } else {
        usize::try_from(start).map_or(len, |start| start.min(len))
    }
}

#[cfg(test)]
mod tests {
    use super::ModuleManifest;

    fn modules(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    #[test]
    fn include_framework_returns_everything() {
        let manifest = ModuleManifest::new(2).with_required(modules(&["fw/a", "fw/b", "ui/main"]));
        assert_eq!(manifest.required_modules(true).unwrap().len(), 3);
    }

    #[test]
    fn exclusion_cuts_one_before_framework_count() {
        let manifest = ModuleManifest::new(2)
            .with_initialized(modules(&["fw/a", "fw/b", "ui/main", "ui/list"]));
        assert_eq!(
            manifest.initialized_modules(false).unwrap(),
            modules(&["fw/b", "ui/main", "ui/list"]).as_slice()
        );
    }

    #[test]
    fn zero_framework_count_counts_from_end() {
        let manifest = ModuleManifest::new(0).with_required(modules(&["ui/a", "ui/b", "ui/c"]));
        assert_eq!(
            manifest.required_modules(false).unwrap(),
            modules(&["ui/c"]).as_slice()
        );
    }

    #[test]
    fn count_past_end_yields_empty() {
        let manifest = ModuleManifest::new(10).with_required(modules(&["fw/a"]));
        assert!(manifest.required_modules(false).unwrap().is_empty());
    }

    #[test]
    fn unreported_lists_stay_absent() {
        let manifest = ModuleManifest::new(1);
        assert!(manifest.required_modules(false).is_none());
        assert!(manifest.initialized_modules(true).is_none());
    }
}
