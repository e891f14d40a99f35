//! In-memory model of the element the sequencer is mounted on.
//!
//! Only the parts the bootstrap cares about are modelled: the stage class,
//! an ordered list of child nodes, and whether the sequencer's event
//! bindings are still registered on the element.

use stagehand_types::{PlaceholderId, StageClass};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceKind {
    /// The document root, used when no element was supplied.
    DocumentRoot,
    Element(PlaceholderId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// Static bootstrap markup.
    Content,
    /// A declared loading indicator, attached once loading is revealed.
    LoadingIndicator,
    MainView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceNode {
    id: PlaceholderId,
    role: NodeRole,
    label: String,
    attached: bool,
    needs_draw: bool,
}

impl SurfaceNode {
    #[must_use]
    pub fn content(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, NodeRole::Content, label, true)
    }

    /// Declared in the bootstrap markup but not attached until loading is revealed.
    #[must_use]
    pub fn loading_indicator(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, NodeRole::LoadingIndicator, label, false)
    }

    pub(crate) fn main_view(id: PlaceholderId, label: impl Into<String>) -> Self {
        Self {
            id,
            role: NodeRole::MainView,
            label: label.into(),
            attached: true,
            needs_draw: true,
        }
    }

    fn new(id: impl Into<String>, role: NodeRole, label: impl Into<String>, attached: bool) -> Self {
        Self {
            id: PlaceholderId::new(id),
            role,
            label: label.into(),
            attached,
            needs_draw: attached,
        }
    }

    #[must_use]
    pub fn id(&self) -> &PlaceholderId {
        &self.id
    }

    #[must_use]
    pub fn role(&self) -> NodeRole {
        self.role
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    #[must_use]
    pub fn needs_draw(&self) -> bool {
        self.needs_draw
    }
}

/// Children of the surface as they were when the range was captured.
///
/// The range is resolved against the surface only when it is extracted, so
/// nodes appended after capture (the main view) are never part of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRange {
    end: usize,
}

impl ContentRange {
    #[must_use]
    pub fn len(&self) -> usize {
        self.end
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountSurface {
    kind: SurfaceKind,
    classes: Vec<StageClass>,
    nodes: Vec<SurfaceNode>,
    event_bindings: bool,
}

impl MountSurface {
    /// A surface in its initial bootstrapping state.
    #[must_use]
    pub fn new(kind: SurfaceKind) -> Self {
        Self {
            kind,
            classes: vec![StageClass::Bootstrapping],
            nodes: Vec::new(),
            event_bindings: true,
        }
    }

    #[must_use]
    pub fn document_root() -> Self {
        Self::new(SurfaceKind::DocumentRoot)
    }

    #[must_use]
    pub fn element(id: impl Into<String>) -> Self {
        Self::new(SurfaceKind::Element(PlaceholderId::new(id)))
    }

    #[must_use]
    pub fn with_node(mut self, node: SurfaceNode) -> Self {
        self.nodes.push(node);
        self
    }

    #[must_use]
    pub fn kind(&self) -> &SurfaceKind {
        &self.kind
    }

    #[must_use]
    pub fn classes(&self) -> &[StageClass] {
        &self.classes
    }

    #[must_use]
    pub fn has_class(&self, class: StageClass) -> bool {
        self.classes.contains(&class)
    }

    /// The stage class currently applied, if any.
    #[must_use]
    pub fn stage_class(&self) -> Option<StageClass> {
        self.classes.last().copied()
    }

    pub fn add_class(&mut self, class: StageClass) {
        if !self.has_class(class) {
            self.classes.push(class);
        }
    }

    pub fn remove_class(&mut self, class: StageClass) {
        self.classes.retain(|existing| *existing != class);
    }

    #[must_use]
    pub fn nodes(&self) -> &[SurfaceNode] {
        &self.nodes
    }

    pub fn attached_nodes(&self) -> impl Iterator<Item = &SurfaceNode> {
        self.nodes.iter().filter(|node| node.attached)
    }

    #[must_use]
    pub fn has_event_bindings(&self) -> bool {
        self.event_bindings
    }

    pub fn unregister_event_bindings(&mut self) {
        self.event_bindings = false;
    }

    /// Attach every declared loading indicator and mark it for drawing.
    /// Returns how many were attached.
    pub fn attach_loading_indicators(&mut self) -> usize {
        let mut attached = 0;
        for node in &mut self.nodes {
            if node.role == NodeRole::LoadingIndicator && !node.attached {
                node.attached = true;
                node.needs_draw = true;
                attached += 1;
            }
        }
        attached
    }

    /// Mark the current children for later removal.
    #[must_use]
    pub fn capture_contents(&self) -> ContentRange {
        ContentRange {
            end: self.nodes.len(),
        }
    }

    pub fn append(&mut self, node: SurfaceNode) {
        self.nodes.push(node);
    }

    /// Remove the nodes covered by `range` and return them.
    pub fn extract(&mut self, range: ContentRange) -> Vec<SurfaceNode> {
        let end = range.end.min(self.nodes.len());
        self.nodes.drain(..end).collect()
    }

    /// Clear draw flags on every attached node; returns how many were drawn.
    pub fn draw(&mut self) -> usize {
        let mut drawn = 0;
        for node in self.nodes.iter_mut().filter(|node| node.attached) {
            if node.needs_draw {
                node.needs_draw = false;
                drawn += 1;
            }
        }
        drawn
    }
}
