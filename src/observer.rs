//! Event sink the core reports progress and warnings to.
//!
//! The core never configures logging itself. Callers inject an
//! [`Observer`]; the CLI uses [`TracingObserver`], tests can use
//! [`NullObserver`] or a recording implementation.

/// Receives progress and status messages from long-running phases.
pub trait Observer {
    /// Informational message for the operator.
    fn on_event(&self, message: &str);

    /// Something unusual that does not abort the run.
    fn on_warning(&self, message: &str) {
        self.on_event(message);
    }

    /// `done` of `total` items processed in the current phase.
    ///
    /// `total` is 0 when the phase cannot know it in advance.
    fn on_progress(&self, _phase: &str, _done: usize, _total: usize) {}
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    /// Emit an info-level progress line every `progress_every` items
    progress_every: usize,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how often progress is logged at info level
    pub fn with_progress_every(mut self, every: usize) -> Self {
        self.progress_every = every.max(1);
        self
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self {
            progress_every: 1000,
        }
    }
}

impl Observer for TracingObserver {
    fn on_event(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn on_warning(&self, message: &str) {
        tracing::warn!("{}", message);
    }

    fn on_progress(&self, phase: &str, done: usize, total: usize) {
        if done == total || done % self.progress_every == 0 {
            tracing::info!(phase, done, total, "Progress");
        } else {
            tracing::trace!(phase, done, total, "Progress");
        }
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl Observer for NullObserver {
    fn on_event(&self, _message: &str) {}
}
