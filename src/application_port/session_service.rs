use crate::domain_model::Session;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("store error: {0}")]
    Store(String),
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Decides whether a credential pair belongs to the operator.
///
/// The stock implementation compares a configured pair by equality. The port
/// exists so a deployment can swap in something stronger without touching
/// the session machinery.
pub trait CredentialAuthenticator: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Operator session lifecycle: logged out, `login` to logged in, back via
/// `logout` or lazy expiry.
pub trait SessionService: Send + Sync {
    /// Create and persist a session for a matching credential pair.
    fn login(&self, input: LoginInput) -> Result<Session, SessionError>;

    /// True while a stored, unexpired session exists. The first query that
    /// observes an expired session deletes it; a corrupt record reads as
    /// logged out. No other side effects.
    fn is_authenticated(&self) -> bool;

    /// Drop the session record unconditionally.
    fn logout(&self) -> Result<(), SessionError>;
}
