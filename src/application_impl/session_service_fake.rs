use crate::application_port::*;
use crate::domain_model::Session;
use std::sync::Mutex;

// Minimal fake implementation for basic use only.
// Extend to simulate expiry and store failures when needed.
#[derive(Debug, Default)]
pub struct FakeSessionService {
    authenticated: Mutex<bool>,
}

impl FakeSessionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logged_in() -> Self {
        Self {
            authenticated: Mutex::new(true),
        }
    }
}

impl SessionService for FakeSessionService {
    fn login(&self, input: LoginInput) -> Result<Session, SessionError> {
        if input.username.is_empty() || input.password.is_empty() {
            return Err(SessionError::InvalidCredentials);
        }
        *lock(&self.authenticated) = true;
        Ok(Session {
            token: format!("fake-token:{}", input.username),
            expiration: i64::MAX,
        })
    }

    fn is_authenticated(&self) -> bool {
        *lock(&self.authenticated)
    }

    fn logout(&self) -> Result<(), SessionError> {
        *lock(&self.authenticated) = false;
        Ok(())
    }
}

fn lock(flag: &Mutex<bool>) -> std::sync::MutexGuard<'_, bool> {
    flag.lock().unwrap_or_else(|e| e.into_inner())
}
