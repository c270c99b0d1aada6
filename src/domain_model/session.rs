use serde::{Deserialize, Serialize};

/// Proof that the operator is currently authenticated, with an absolute
/// expiry. The token is an opaque presence marker; nothing ever validates it
/// against a server.
///
/// A session is valid while `now <= expiration`. Once a query observes it
/// expired, the stored record must be deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    /// Milliseconds since the Unix epoch.
    pub expiration: i64,
}

impl Session {
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms > self.expiration
    }
}
