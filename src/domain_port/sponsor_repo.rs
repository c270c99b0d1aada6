use crate::domain_model::{SponsorList, SponsorRecord};

#[derive(Debug, thiserror::Error)]
pub enum SponsorError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("sponsor index {index} out of bounds (list has {len} entries)")]
    OutOfBounds { index: usize, len: usize },
    #[error("store error: {0}")]
    Store(String),
}

/// CRUD over the ordered sponsor list.
///
/// The repository owns the in-memory list; the store only ever holds its
/// serialized form. Each mutation validates first, then persists the whole
/// list in one write, never a partial update. Successful calls return the
/// list as persisted so same-tab callers can refresh their own state at the
/// call site. Writers in different tabs are not coordinated beyond
/// last-write-wins.
pub trait SponsorRepo: Send + Sync {
    /// Read-through from the store. Absent or corrupt stored data reads as
    /// an empty list.
    fn list(&self) -> SponsorList;

    /// Append a record. Rejected when any field is empty.
    fn create(&self, record: SponsorRecord) -> Result<SponsorList, SponsorError>;

    /// Replace the record at `index`. Rejected when any field is empty or
    /// `index` is out of bounds.
    fn update(&self, index: usize, record: SponsorRecord) -> Result<SponsorList, SponsorError>;

    /// Remove the record at `index`, shifting every later record down one.
    fn delete(&self, index: usize) -> Result<SponsorList, SponsorError>;
}
