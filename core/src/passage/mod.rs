//! Navigable passages and the stack that displays them.

mod stack;

pub use stack::{PassageStack, Transition, TransitionDirection, TransitionLeg};

use std::sync::atomic::{AtomicU64, Ordering};

use stagehand_types::{AnimationOverride, PassageId, PlaceholderId};

static NEXT_PASSAGE_ID: AtomicU64 = AtomicU64::new(1);

/// A displayable unit managed by a [`PassageStack`].
///
/// The render placeholder is created the first time the passage becomes the
/// top of a stack and is kept for the passage's lifetime after that.
#[derive(Debug, PartialEq, Eq)]
pub struct Passage {
    id: PassageId,
    identifier: Option<String>,
    title: String,
    build_in_override: AnimationOverride,
    build_out_override: AnimationOverride,
    placeholder: Option<PlaceholderId>,
    needs_draw: bool,
}

impl Passage {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: PassageId::new(NEXT_PASSAGE_ID.fetch_add(1, Ordering::Relaxed)),
            identifier: None,
            title: title.into(),
            build_in_override: AnimationOverride::Unset,
            build_out_override: AnimationOverride::Unset,
            placeholder: None,
            needs_draw: false,
        }
    }

    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// The passage's own build-in default. A stack-level override replaces it.
    #[must_use]
    pub fn with_build_in(mut self, build_in: impl Into<AnimationOverride>) -> Self {
        self.build_in_override = build_in.into();
        self
    }

    #[must_use]
    pub fn with_build_out(mut self, build_out: impl Into<AnimationOverride>) -> Self {
        self.build_out_override = build_out.into();
        self
    }

    #[must_use]
    pub fn id(&self) -> PassageId {
        self.id
    }

    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn build_in_override(&self) -> AnimationOverride {
        self.build_in_override
    }

    #[must_use]
    pub fn build_out_override(&self) -> AnimationOverride {
        self.build_out_override
    }

    #[must_use]
    pub fn placeholder(&self) -> Option<&PlaceholderId> {
        self.placeholder.as_ref()
    }

    #[must_use]
    pub fn needs_draw(&self) -> bool {
        self.needs_draw
    }

    /// Clear the dirty flag. Returns whether there was anything to draw.
    pub fn draw(&mut self) -> bool {
        let dirty = self.needs_draw;
        self.needs_draw = false;
        dirty
    }

    /// Impose stack-level overrides onto this passage's slots.
    fn propagate(&mut self, build_in: AnimationOverride, build_out: AnimationOverride) {
        build_in.apply_onto(&mut self.build_in_override);
        build_out.apply_onto(&mut self.build_out_override);
    }

    fn ensure_placeholder(&mut self) -> &PlaceholderId {
        let id = self.id;
        let identifier = self.identifier.as_deref();
        self.placeholder.get_or_insert_with(|| match identifier {
            Some(identifier) => PlaceholderId::new(identifier),
            None => PlaceholderId::new(format!("passage-{id}")),
        })
    }
}
