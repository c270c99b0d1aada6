use std::sync::Arc;
use thiserror::Error;

/// Callback invoked when a tracked key is mutated through another tab
/// handle. Never invoked for the handle that performed the write.
pub type ChangeCallback = Arc<dyn Fn(&StoreChange) + Send + Sync>;

/// An external mutation of one stored key. `new_value` is `None` for
/// removals.
#[derive(Debug, Clone)]
pub struct StoreChange {
    pub key: String,
    pub new_value: Option<String>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store backend error: {0}")]
    Backend(String),
}

/// The persistence boundary: a shared string-to-string store with
/// whole-value replace semantics, one handle per open tab.
///
/// Reading a missing key yields `Ok(None)`; absent is an expected state
/// (first run), never an error. Values are accepted as-is, with no
/// validation. The session service and the sponsor repository are the only
/// writers of their respective keys.
pub trait KeyValueStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Watch one key for mutations of external origin. Dropping the returned
    /// handle unsubscribes.
    fn subscribe(&self, key: &str, callback: ChangeCallback) -> Subscription;
}

/// Deregisters its watcher when dropped or explicitly unsubscribed.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}
