//! Failure reporting seam
//!
//! The comparator never panics or returns errors for routing discrepancies;
//! it reports each one through an [`AssertEngine`]. The default engine panics
//! like `assert!`, so a discrepancy fails the running test. The recording
//! engine collects messages instead, which is how the assertions themselves
//! are tested.

use once_cell::sync::Lazy;
use std::sync::{Arc, Mutex, RwLock};

/// Receives assertion failures
pub trait AssertEngine: Send + Sync {
    /// Reports an unconditional failure
    fn fail(&self, message: &str);

    /// Reports a failure when `expected` and `actual` differ
    fn are_equal(&self, expected: &str, actual: &str, message: &str);
}

/// Panics on the first failure
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicAssertEngine;

impl AssertEngine for PanicAssertEngine {
    fn fail(&self, message: &str) {
        panic!("{}", message);
    }

    fn are_equal(&self, expected: &str, actual: &str, message: &str) {
        if expected != actual {
            panic!("{}\n  expected: {}\n    actual: {}", message, expected, actual);
        }
    }
}

/// Records failures in order without panicking
#[derive(Debug, Default)]
pub struct RecordingAssertEngine {
    messages: Mutex<Vec<String>>,
}

impl RecordingAssertEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_count(&self) -> usize {
        self.lock().len()
    }

    /// Failure messages in the order they were reported
    pub fn messages(&self) -> Vec<String> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.messages.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AssertEngine for RecordingAssertEngine {
    fn fail(&self, message: &str) {
        self.lock().push(message.to_string());
    }

    fn are_equal(&self, expected: &str, actual: &str, message: &str) {
        if expected != actual {
            self.lock().push(message.to_string());
        }
    }
}

// ============================================================================
// Process-wide default
// ============================================================================

static DEFAULT_ENGINE: Lazy<RwLock<Arc<dyn AssertEngine>>> =
    Lazy::new(|| RwLock::new(Arc::new(PanicAssertEngine)));

/// Engine used by assertions that were not given one explicitly
pub fn default_engine() -> Arc<dyn AssertEngine> {
    DEFAULT_ENGINE
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

/// Installs the engine used by assertions that were not given one explicitly
pub fn set_default_engine(engine: Arc<dyn AssertEngine>) {
    *DEFAULT_ENGINE
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner()) = engine;
}

/// Restores the panicking default
pub fn reset_default_engine() {
    set_default_engine(Arc::new(PanicAssertEngine));
}
