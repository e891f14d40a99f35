//! One-shot interception of a view's enter hook.
//!
//! The sequencer needs to run its own bookkeeping the first time the main
//! view enters the live tree, then get out of the way. Instead of swapping
//! the view's method, the view carries an adapter that yields the
//! bookkeeping exactly once and passes every later call straight through.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnceAdapter<B> {
    pending: Option<B>,
}

/// Result of invoking a hook through an [`OnceAdapter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation<B> {
    /// First call: the wrapped bookkeeping must run before the original hook.
    First(B),
    Passthrough,
}

impl<B> OnceAdapter<B> {
    #[must_use]
    pub fn wrap(bookkeeping: B) -> Self {
        Self {
            pending: Some(bookkeeping),
        }
    }

    pub fn invoke(&mut self) -> Invocation<B> {
        match self.pending.take() {
            Some(bookkeeping) => Invocation::First(bookkeeping),
            None => Invocation::Passthrough,
        }
    }

    #[must_use]
    pub fn is_wrapped(&self) -> bool {
        self.pending.is_some()
    }
}
