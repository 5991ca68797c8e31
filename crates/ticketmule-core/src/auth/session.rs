use tracing::{debug, info};

use crate::models::User;

/// Authentication state of the running client.
///
/// `Anonymous --login--> Authenticated --logout--> Anonymous (logging_out)`.
/// The logging-out flag stays set until the login screen has announced the
/// logout and calls `reset_logging_out`.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    user: Option<User>,
    logging_out: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the identity returned by a successful login.
    /// A fresh login drops any logout notice that was never shown.
    pub fn set_user(&mut self, user: User) {
        info!(user_id = user.id, username = %user.username, "Session started");
        self.user = Some(user);
        self.logging_out = false;
    }

    /// Drop the identity and mark that a logout just happened.
    /// Returns the user that was signed in, if any.
    pub fn logout(&mut self) -> Option<User> {
        let previous = self.user.take();
        if let Some(ref user) = previous {
            info!(user_id = user.id, "Session ended");
            self.logging_out = true;
        }
        previous
    }

    pub fn reset_logging_out(&mut self) {
        debug!("Logging-out flag cleared");
        self.logging_out = false;
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_logging_out(&self) -> bool {
        self.logging_out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        serde_json::from_str(r#"{"id": 7, "username": "jsmith"}"#).unwrap()
    }

    #[test]
    fn test_starts_anonymous() {
        let session = SessionState::new();
        assert!(!session.is_authenticated());
        assert!(!session.is_logging_out());
        assert!(session.user().is_none());
    }

    #[test]
    fn test_login_then_logout() {
        let mut session = SessionState::new();
        session.set_user(user());
        assert!(session.is_authenticated());
        assert_eq!(session.user().map(|u| u.id), Some(7));

        let previous = session.logout();
        assert_eq!(previous.map(|u| u.username), Some("jsmith".to_string()));
        assert!(!session.is_authenticated());
        assert!(session.is_logging_out());

        session.reset_logging_out();
        assert!(!session.is_logging_out());
    }

    #[test]
    fn test_login_drops_pending_logout_notice() {
        let mut session = SessionState::new();
        session.set_user(user());
        session.logout();
        assert!(session.is_logging_out());

        session.set_user(user());
        assert!(!session.is_logging_out());
    }

    #[test]
    fn test_logout_while_anonymous_does_not_flag() {
        let mut session = SessionState::new();
        assert!(session.logout().is_none());
        assert!(!session.is_logging_out());
    }
}
