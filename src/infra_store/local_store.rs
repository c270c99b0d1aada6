use crate::domain_port::{ChangeCallback, KeyValueStore, StoreChange, StoreError, Subscription};
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// The shared key-value store behind every open tab: one map per process,
/// any number of [`StoreTab`] handles onto it.
///
/// With a path, every mutation rewrites the whole file as a JSON object of
/// string pairs (whole-value replace, never a partial patch); a missing or
/// corrupt file starts empty. Without a path the store is purely in-memory,
/// which is what tests and fakes use.
pub struct LocalStore {
    shared: Arc<StoreShared>,
}

struct StoreShared {
    values: DashMap<String, String>,
    watchers: Mutex<Vec<Watcher>>,
    next_watcher_id: AtomicU64,
    next_tab_id: AtomicU64,
    persist_path: Option<PathBuf>,
}

struct Watcher {
    id: u64,
    origin: u64,
    key: String,
    callback: ChangeCallback,
}

impl LocalStore {
    pub fn in_memory() -> Self {
        Self::with_values(DashMap::new(), None)
    }

    /// Open a file-backed store. The file may be absent (first run).
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = DashMap::new();
        match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(map) => {
                    for (key, value) in map {
                        values.insert(key, value);
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        "corrupt store file, starting empty: {e}"
                    );
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::Io(e)),
        }
        Ok(Self::with_values(values, Some(path)))
    }

    fn with_values(values: DashMap<String, String>, persist_path: Option<PathBuf>) -> Self {
        Self {
            shared: Arc::new(StoreShared {
                values,
                watchers: Mutex::new(Vec::new()),
                next_watcher_id: AtomicU64::new(0),
                next_tab_id: AtomicU64::new(0),
                persist_path,
            }),
        }
    }

    /// Open a new tab handle onto this store.
    pub fn tab(&self) -> StoreTab {
        StoreTab {
            shared: self.shared.clone(),
            origin: self.shared.next_tab_id.fetch_add(1, Ordering::Relaxed),
        }
    }
}

impl StoreShared {
    fn persist(&self) -> Result<(), StoreError> {
        let Some(path) = &self.persist_path else {
            return Ok(());
        };
        let snapshot: BTreeMap<String, String> = self
            .values
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        let raw = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    /// Deliver a change to every watcher on `key` registered through a
    /// different tab handle. Callbacks run outside the registry lock so they
    /// are free to subscribe or unsubscribe.
    fn notify_external(&self, origin: u64, change: &StoreChange) {
        let callbacks: Vec<ChangeCallback> = {
            let watchers = lock_watchers(&self.watchers);
            watchers
                .iter()
                .filter(|w| w.key == change.key && w.origin != origin)
                .map(|w| w.callback.clone())
                .collect()
        };
        for callback in callbacks {
            callback(change);
        }
    }
}

fn lock_watchers(watchers: &Mutex<Vec<Watcher>>) -> MutexGuard<'_, Vec<Watcher>> {
    watchers.lock().unwrap_or_else(|e| e.into_inner())
}

/// One tab's handle onto the shared store.
pub struct StoreTab {
    shared: Arc<StoreShared>,
    origin: u64,
}

impl KeyValueStore for StoreTab {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .shared
            .values
            .get(key)
            .map(|entry| entry.value().clone()))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let previous = self.shared.values.insert(key.to_owned(), value.to_owned());
        if previous.as_deref() == Some(value) {
            // Unchanged value: no event, nothing to persist.
            return Ok(());
        }
        self.shared.persist()?;
        self.shared.notify_external(
            self.origin,
            &StoreChange {
                key: key.to_owned(),
                new_value: Some(value.to_owned()),
            },
        );
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        if self.shared.values.remove(key).is_none() {
            return Ok(());
        }
        self.shared.persist()?;
        self.shared.notify_external(
            self.origin,
            &StoreChange {
                key: key.to_owned(),
                new_value: None,
            },
        );
        Ok(())
    }

    fn subscribe(&self, key: &str, callback: ChangeCallback) -> Subscription {
        let id = self.shared.next_watcher_id.fetch_add(1, Ordering::Relaxed);
        lock_watchers(&self.shared.watchers).push(Watcher {
            id,
            origin: self.origin,
            key: key.to_owned(),
            callback,
        });

        let shared = self.shared.clone();
        Subscription::new(move || {
            lock_watchers(&shared.watchers).retain(|w| w.id != id);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter_callback(hits: Arc<AtomicUsize>) -> ChangeCallback {
        Arc::new(move |_change: &StoreChange| {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_absent_read_is_none_not_error() {
        let store = LocalStore::in_memory();
        let tab = store.tab();
        assert!(tab.read("missing").unwrap().is_none());
    }

    #[test]
    fn test_write_read_remove() {
        let store = LocalStore::in_memory();
        let tab = store.tab();

        tab.write("k", "v").unwrap();
        assert_eq!(tab.read("k").unwrap().as_deref(), Some("v"));

        tab.remove("k").unwrap();
        assert!(tab.read("k").unwrap().is_none());
    }

    #[test]
    fn test_tabs_share_values() {
        let store = LocalStore::in_memory();
        let a = store.tab();
        let b = store.tab();

        a.write("k", "from-a").unwrap();
        assert_eq!(b.read("k").unwrap().as_deref(), Some("from-a"));
    }

    #[test]
    fn test_only_external_writes_notify() {
        let store = LocalStore::in_memory();
        let a = store.tab();
        let b = store.tab();

        let a_hits = Arc::new(AtomicUsize::new(0));
        let b_hits = Arc::new(AtomicUsize::new(0));
        let _sub_a = a.subscribe("k", counter_callback(a_hits.clone()));
        let _sub_b = b.subscribe("k", counter_callback(b_hits.clone()));

        a.write("k", "v1").unwrap();
        assert_eq!(a_hits.load(Ordering::SeqCst), 0);
        assert_eq!(b_hits.load(Ordering::SeqCst), 1);

        b.remove("k").unwrap();
        assert_eq!(a_hits.load(Ordering::SeqCst), 1);
        assert_eq!(b_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_no_event_for_unchanged_value_or_absent_removal() {
        let store = LocalStore::in_memory();
        let a = store.tab();
        let b = store.tab();

        let hits = Arc::new(AtomicUsize::new(0));
        let _sub = b.subscribe("k", counter_callback(hits.clone()));

        a.remove("k").unwrap();
        a.write("k", "v").unwrap();
        a.write("k", "v").unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_events_are_key_scoped() {
        let store = LocalStore::in_memory();
        let a = store.tab();
        let b = store.tab();

        let hits = Arc::new(AtomicUsize::new(0));
        let _sub = b.subscribe("watched", counter_callback(hits.clone()));

        a.write("other", "v").unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        a.write("watched", "v").unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dropping_subscription_unsubscribes() {
        let store = LocalStore::in_memory();
        let a = store.tab();
        let b = store.tab();

        let hits = Arc::new(AtomicUsize::new(0));
        let sub = b.subscribe("k", counter_callback(hits.clone()));

        a.write("k", "v1").unwrap();
        drop(sub);
        a.write("k", "v2").unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_change_carries_key_and_value() {
        let store = LocalStore::in_memory();
        let a = store.tab();
        let b = store.tab();

        let seen: Arc<Mutex<Vec<StoreChange>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _sub = b.subscribe(
            "k",
            Arc::new(move |change: &StoreChange| {
                sink.lock().unwrap().push(change.clone());
            }),
        );

        a.write("k", "v").unwrap();
        a.remove("k").unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].key, "k");
        assert_eq!(seen[0].new_value.as_deref(), Some("v"));
        assert!(seen[1].new_value.is_none());
    }

    #[test]
    fn test_file_backing_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        {
            let store = LocalStore::open(&path).unwrap();
            let tab = store.tab();
            tab.write("k", "v").unwrap();
        }

        let store = LocalStore::open(&path).unwrap();
        let tab = store.tab();
        assert_eq!(tab.read("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "][ definitely not json").unwrap();

        let store = LocalStore::open(&path).unwrap();
        let tab = store.tab();
        assert!(tab.read("anything").unwrap().is_none());
    }

    #[test]
    fn test_removal_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        {
            let store = LocalStore::open(&path).unwrap();
            let tab = store.tab();
            tab.write("k", "v").unwrap();
            tab.remove("k").unwrap();
        }

        let store = LocalStore::open(&path).unwrap();
        assert!(store.tab().read("k").unwrap().is_none());
    }
}
