use crate::application_port::{LoginInput, SessionError, SessionService};
use crate::view::{Nav, Route};
use std::sync::Arc;

/// Login form state. The password never leaves this struct except inside a
/// login call; any failed attempt clears it while the username is retained.
pub struct LoginView {
    session: Arc<dyn SessionService>,
    pub username: String,
    pub password: String,
    pub error: Option<String>,
}

impl LoginView {
    /// An already-authenticated operator skips the form entirely.
    pub fn mount(session: Arc<dyn SessionService>) -> (Self, Nav) {
        let nav = if session.is_authenticated() {
            Nav::Redirect(Route::Admin)
        } else {
            Nav::Stay
        };
        let view = Self {
            session,
            username: String::new(),
            password: String::new(),
            error: None,
        };
        (view, nav)
    }

    pub fn submit(&mut self) -> Nav {
        if self.username.trim().is_empty() || self.password.trim().is_empty() {
            // Rejected here; the session service is never consulted.
            self.error = Some("Please enter both username and password".to_owned());
            return Nav::Stay;
        }

        let input = LoginInput {
            username: self.username.clone(),
            password: self.password.clone(),
        };
        match self.session.login(input) {
            Ok(_) => {
                self.error = None;
                Nav::Redirect(Route::Admin)
            }
            Err(e @ SessionError::InvalidCredentials) => {
                self.password.clear();
                self.error = Some(e.to_string());
                Nav::Stay
            }
            Err(e) => {
                tracing::warn!("login failed: {e}");
                self.password.clear();
                self.error = Some(e.to_string());
                Nav::Stay
            }
        }
    }
}
