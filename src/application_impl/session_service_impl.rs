use crate::application_port::*;
use crate::domain_model::Session;
use crate::domain_port::KeyValueStore;
use chrono::Utc;
use nanoid::nanoid;
use std::sync::Arc;

/// Storage key for the serialized session record. Only the session service
/// writes this key.
pub const SESSION_KEY: &str = "skydeck_admin_session";

const DEFAULT_TTL_HOURS: i64 = 24;

/// Equality check against a configured operator pair.
#[derive(Debug, Clone)]
pub struct FixedCredentials {
    pub username: String,
    pub password: String,
}

impl Default for FixedCredentials {
    fn default() -> Self {
        Self {
            username: "admin".to_owned(),
            password: "admin123".to_owned(),
        }
    }
}

impl CredentialAuthenticator for FixedCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}

/// Session service over the injected store port.
///
/// The session record lives under [`SESSION_KEY`] as
/// `{"token": …, "expiration": <ms since epoch>}`. Expiry is lazy: no timer
/// runs anywhere, the stored timestamp is compared against the clock
/// whenever someone asks.
pub struct StoreSessionService {
    store: Arc<dyn KeyValueStore>,
    authenticator: Arc<dyn CredentialAuthenticator>,
    ttl_hours: i64,
}

impl StoreSessionService {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        authenticator: Arc<dyn CredentialAuthenticator>,
    ) -> Self {
        Self {
            store,
            authenticator,
            ttl_hours: DEFAULT_TTL_HOURS,
        }
    }

    pub fn with_ttl_hours(mut self, ttl_hours: i64) -> Self {
        self.ttl_hours = ttl_hours;
        self
    }

    fn new_token() -> String {
        nanoid!()
    }
}

impl SessionService for StoreSessionService {
    fn login(&self, input: LoginInput) -> Result<Session, SessionError> {
        let LoginInput { username, password } = input;

        if !self.authenticator.verify(&username, &password) {
            return Err(SessionError::InvalidCredentials);
        }

        let expiration =
            (Utc::now() + chrono::Duration::hours(self.ttl_hours)).timestamp_millis();
        let session = Session {
            token: Self::new_token(),
            expiration,
        };

        let raw =
            serde_json::to_string(&session).map_err(|e| SessionError::Store(e.to_string()))?;
        self.store
            .write(SESSION_KEY, &raw)
            .map_err(|e| SessionError::Store(e.to_string()))?;

        tracing::debug!(expiration, "operator session created");
        Ok(session)
    }

    fn is_authenticated(&self) -> bool {
        let raw = match self.store.read(SESSION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!("session read failed: {e}");
                return false;
            }
        };

        let session: Session = match serde_json::from_str(&raw) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("corrupt session record treated as logged out: {e}");
                return false;
            }
        };

        if session.is_expired(Utc::now().timestamp_millis()) {
            // Lazy expiry: the first observation drops the stale record,
            // later queries simply find it absent.
            if let Err(e) = self.store.remove(SESSION_KEY) {
                tracing::warn!("failed to drop expired session: {e}");
            }
            return false;
        }

        true
    }

    fn logout(&self) -> Result<(), SessionError> {
        self.store
            .remove(SESSION_KEY)
            .map_err(|e| SessionError::Store(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra_store::LocalStore;

    fn service(tab: Arc<dyn KeyValueStore>) -> StoreSessionService {
        StoreSessionService::new(tab, Arc::new(FixedCredentials::default()))
    }

    fn operator_input() -> LoginInput {
        LoginInput {
            username: "admin".to_owned(),
            password: "admin123".to_owned(),
        }
    }

    #[test]
    fn test_login_then_authenticated() {
        let store = LocalStore::in_memory();
        let tab: Arc<dyn KeyValueStore> = Arc::new(store.tab());
        let service = service(tab.clone());

        assert!(!service.is_authenticated());
        let session = service.login(operator_input()).unwrap();
        assert!(!session.token.is_empty());
        assert!(service.is_authenticated());
        assert!(tab.read(SESSION_KEY).unwrap().is_some());
    }

    #[test]
    fn test_rejected_login_writes_nothing() {
        let store = LocalStore::in_memory();
        let tab: Arc<dyn KeyValueStore> = Arc::new(store.tab());
        let service = service(tab.clone());

        let result = service.login(LoginInput {
            username: "admin".to_owned(),
            password: "nope".to_owned(),
        });
        assert!(matches!(result, Err(SessionError::InvalidCredentials)));
        assert!(tab.read(SESSION_KEY).unwrap().is_none());
        assert!(!service.is_authenticated());
    }

    #[test]
    fn test_expired_session_is_deleted_on_first_query() {
        let store = LocalStore::in_memory();
        let tab: Arc<dyn KeyValueStore> = Arc::new(store.tab());
        let service = service(tab.clone());

        let stale = Session {
            token: "stale".to_owned(),
            expiration: Utc::now().timestamp_millis() - 1,
        };
        tab.write(SESSION_KEY, &serde_json::to_string(&stale).unwrap())
            .unwrap();

        assert!(!service.is_authenticated());
        assert!(tab.read(SESSION_KEY).unwrap().is_none());
        // Idempotent afterwards.
        assert!(!service.is_authenticated());
    }

    #[test]
    fn test_corrupt_record_reads_as_logged_out() {
        let store = LocalStore::in_memory();
        let tab: Arc<dyn KeyValueStore> = Arc::new(store.tab());
        let service = service(tab.clone());

        tab.write(SESSION_KEY, "{not json").unwrap();
        assert!(!service.is_authenticated());
        // Corruption is tolerated, not cleaned up.
        assert!(tab.read(SESSION_KEY).unwrap().is_some());
    }

    #[test]
    fn test_logout_drops_the_record() {
        let store = LocalStore::in_memory();
        let tab: Arc<dyn KeyValueStore> = Arc::new(store.tab());
        let service = service(tab.clone());

        service.login(operator_input()).unwrap();
        service.logout().unwrap();
        assert!(!service.is_authenticated());
        assert!(tab.read(SESSION_KEY).unwrap().is_none());
    }

    #[test]
    fn test_custom_credentials() {
        let store = LocalStore::in_memory();
        let tab: Arc<dyn KeyValueStore> = Arc::new(store.tab());
        let authenticator = FixedCredentials {
            username: "ops".to_owned(),
            password: "hunter2".to_owned(),
        };
        let service = StoreSessionService::new(tab, Arc::new(authenticator));

        assert!(service.login(operator_input()).is_err());
        let session = service.login(LoginInput {
            username: "ops".to_owned(),
            password: "hunter2".to_owned(),
        });
        assert!(session.is_ok());
    }
}
