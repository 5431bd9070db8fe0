//! Cooperative cancellation between frames.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Flag checked by the builder before each frame.
///
/// Clones share the same flag, so one can be handed to a UI thread while the
/// bake runs elsewhere.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
