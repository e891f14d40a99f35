//! Notifications the sequencer emits to whoever hosts it.
//!
//! Notifications are accumulated on the sequencer and drained by the host
//! after each tick, the same way every other state change is observed.

use std::mem;

use crate::surface::ContentRange;
use crate::view::MainView;

/// The main view has been swapped in and the sequencer has detached.
///
/// Carries ownership of the main view. If content removal was deferred,
/// the range of bootstrap content still on the surface comes along so the
/// host can remove it later.
#[derive(Debug)]
pub struct ComponentLoaded {
    pub main_view: MainView,
    pub retained_content: Option<ContentRange>,
}

#[derive(Debug)]
pub enum Notification {
    ComponentLoaded(ComponentLoaded),
}

impl Notification {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ComponentLoaded(_) => "componentLoaded",
        }
    }

    #[must_use]
    pub fn bubbles(&self) -> bool {
        match self {
            Self::ComponentLoaded(_) => true,
        }
    }

    #[must_use]
    pub fn cancelable(&self) -> bool {
        match self {
            Self::ComponentLoaded(_) => true,
        }
    }
}

/// Queue for notifications not yet taken by the host.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    pending: Vec<Notification>,
}

impl NotificationQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: Notification) {
        self.pending.push(notification);
    }

    /// Take all pending notifications in the order they were pushed.
    pub fn take(&mut self) -> Vec<Notification> {
        mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
