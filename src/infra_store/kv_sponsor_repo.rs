use crate::domain_model::{SponsorList, SponsorRecord};
use crate::domain_port::{KeyValueStore, SponsorError, SponsorRepo};
use std::sync::{Arc, Mutex, MutexGuard};

/// Storage key for the serialized sponsor list. Only the repository writes
/// this key.
pub const SPONSORS_KEY: &str = "skydeck_sponsors";

/// Sponsor CRUD over the injected store port.
///
/// The repository owns the working copy of the list; mutations apply to that
/// copy and persist the whole list in one write. The copy is refreshed from
/// the store on construction and on every `list()`. A repository in another
/// tab holding an older copy will overwrite this one's writes wholesale:
/// last write wins, nothing merges.
pub struct KvSponsorRepo {
    store: Arc<dyn KeyValueStore>,
    cached: Mutex<SponsorList>,
}

impl KvSponsorRepo {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let cached = Mutex::new(read_list(store.as_ref()));
        Self { store, cached }
    }

    fn persist(&self, list: &SponsorList) -> Result<(), SponsorError> {
        let raw = serde_json::to_string(list).map_err(|e| SponsorError::Store(e.to_string()))?;
        self.store
            .write(SPONSORS_KEY, &raw)
            .map_err(|e| SponsorError::Store(e.to_string()))
    }

    fn check_complete(record: &SponsorRecord) -> Result<(), SponsorError> {
        match record.missing_field() {
            Some(field) => Err(SponsorError::MissingField(field)),
            None => Ok(()),
        }
    }

    fn cached(&self) -> MutexGuard<'_, SponsorList> {
        self.cached.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Parse the stored list, degrading absent or corrupt data to empty.
fn read_list(store: &dyn KeyValueStore) -> SponsorList {
    let raw = match store.read(SPONSORS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return SponsorList::new(),
        Err(e) => {
            tracing::warn!("sponsor list read failed, treating as empty: {e}");
            return SponsorList::new();
        }
    };
    match serde_json::from_str::<SponsorList>(&raw) {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!("corrupt sponsor list treated as empty: {e}");
            SponsorList::new()
        }
    }
}

impl SponsorRepo for KvSponsorRepo {
    fn list(&self) -> SponsorList {
        let list = read_list(self.store.as_ref());
        *self.cached() = list.clone();
        list
    }

    fn create(&self, record: SponsorRecord) -> Result<SponsorList, SponsorError> {
        Self::check_complete(&record)?;
        let mut list = self.cached().clone();
        list.push(record);
        self.persist(&list)?;
        *self.cached() = list.clone();
        Ok(list)
    }

    fn update(&self, index: usize, record: SponsorRecord) -> Result<SponsorList, SponsorError> {
        Self::check_complete(&record)?;
        let mut list = self.cached().clone();
        if index >= list.len() {
            return Err(SponsorError::OutOfBounds {
                index,
                len: list.len(),
            });
        }
        list[index] = record;
        self.persist(&list)?;
        *self.cached() = list.clone();
        Ok(list)
    }

    fn delete(&self, index: usize) -> Result<SponsorList, SponsorError> {
        let mut list = self.cached().clone();
        if index >= list.len() {
            return Err(SponsorError::OutOfBounds {
                index,
                len: list.len(),
            });
        }
        list.remove(index);
        self.persist(&list)?;
        *self.cached() = list.clone();
        Ok(list)
    }
}
