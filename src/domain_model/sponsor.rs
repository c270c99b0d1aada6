use serde::{Deserialize, Serialize};

/// One displayable sponsor entry.
///
/// Identity is positional: a record is addressed by its index in the stored
/// list, so a removal shifts the identity of every record behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SponsorRecord {
    pub name: String,
    pub logo: String,
    pub link: String,
}

/// Insertion order is display order.
pub type SponsorList = Vec<SponsorRecord>;

impl SponsorRecord {
    pub fn new(
        name: impl Into<String>,
        logo: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            logo: logo.into(),
            link: link.into(),
        }
    }

    /// First empty field, if any. A record may only be persisted when all
    /// three fields are filled in.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.name.is_empty() {
            Some("name")
        } else if self.logo.is_empty() {
            Some("logo")
        } else if self.link.is_empty() {
            Some("link")
        } else {
            None
        }
    }
}
