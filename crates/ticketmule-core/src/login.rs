//! Login submission flow.
//!
//! `LoginForm` validates credentials, guards against a second submission
//! while one is in flight, and routes the server's answer either into the
//! session (success) or into a notification (failure). State it touches is
//! passed in by the caller; the form itself only owns its busy flag and the
//! last field errors.

use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::{Credentials, SessionState, ValidationErrors};
use crate::models::User;
use crate::notification::{NotificationCenter, NotificationExpired, NotificationKind};

/// Shown on the login screen right after a logout
pub const LOGGED_OUT_MESSAGE: &str = "Logged Out Successfully";

/// Why a submission never reached the network
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejected {
    #[error("A login request is already in flight")]
    Busy,

    #[error("{0}")]
    Invalid(ValidationErrors),
}

/// Result of a submission that did reach the server
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    LoggedIn(User),
    /// `notified` is false when another notification was already visible
    Failed {
        message: &'static str,
        notified: bool,
    },
}

#[derive(Debug, Default)]
pub struct LoginForm {
    busy: bool,
    errors: ValidationErrors,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a request is in flight; the submit control is disabled
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn field_errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn clear_field_errors(&mut self) {
        self.errors = ValidationErrors::default();
    }

    /// Called whenever the login screen is shown or its notification goes
    /// away. Announces a completed logout once.
    pub fn on_enter<E>(
        &mut self,
        session: &mut SessionState,
        notifications: &mut NotificationCenter<E>,
    ) -> bool
    where
        E: From<NotificationExpired> + Send + 'static,
    {
        if session.is_logging_out() && !notifications.is_active() {
            notifications.show_if_idle(NotificationKind::Success, LOGGED_OUT_MESSAGE);
            session.reset_logging_out();
            return true;
        }
        false
    }

    /// Validate and take the busy flag. On `Ok` the caller must send exactly
    /// one login request and pass its result to `finish_submit`.
    pub fn begin_submit(&mut self, credentials: &Credentials) -> Result<(), SubmitRejected> {
        if self.busy {
            return Err(SubmitRejected::Busy);
        }

        if let Err(errors) = credentials.validate() {
            self.errors = errors;
            return Err(SubmitRejected::Invalid(errors));
        }

        self.errors = ValidationErrors::default();
        self.busy = true;
        Ok(())
    }

    /// Take the busy flag for some other request, such as a logout that
    /// must reach the server before a new login may start
    pub fn hold(&mut self) {
        self.busy = true;
    }

    pub fn release(&mut self) {
        self.busy = false;
    }

    /// Release the busy flag and apply the server's answer
    pub fn finish_submit<E>(
        &mut self,
        result: Result<User, ApiError>,
        session: &mut SessionState,
        notifications: &mut NotificationCenter<E>,
    ) -> LoginOutcome
    where
        E: From<NotificationExpired> + Send + 'static,
    {
        self.busy = false;

        match result {
            Ok(user) => {
                info!(user_id = user.id, "Login successful");
                session.set_user(user.clone());
                LoginOutcome::LoggedIn(user)
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                let message = e.user_message();
                let notified = notifications.show_if_idle(NotificationKind::Error, message);
                LoginOutcome::Failed { message, notified }
            }
        }
    }

    /// Run one whole submission against the server.
    /// The credentials are dropped as soon as the request completes.
    pub async fn submit<E>(
        &mut self,
        api: &ApiClient,
        credentials: Credentials,
        session: &mut SessionState,
        notifications: &mut NotificationCenter<E>,
    ) -> Result<LoginOutcome, SubmitRejected>
    where
        E: From<NotificationExpired> + Send + 'static,
    {
        self.begin_submit(&credentials)?;
        let result = api.login(&credentials).await;
        drop(credentials);
        Ok(self.finish_submit(result, session, notifications))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiConfig;
    use crate::auth::FieldError;
    use serde_json::json;
    use tokio::sync::mpsc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Harness {
        form: LoginForm,
        session: SessionState,
        notifications: NotificationCenter<NotificationExpired>,
        _rx: mpsc::Receiver<NotificationExpired>,
    }

    fn harness() -> Harness {
        let (tx, rx) = mpsc::channel(8);
        Harness {
            form: LoginForm::new(),
            session: SessionState::new(),
            notifications: NotificationCenter::with_default_delay(tx),
            _rx: rx,
        }
    }

    fn api(server: &MockServer) -> ApiClient {
        ApiClient::new(&ApiConfig::new(server.uri())).unwrap()
    }

    async fn mount_login(server: &MockServer, response: ResponseTemplate, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/api/v1/login"))
            .respond_with(response)
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    fn user() -> User {
        serde_json::from_str(r#"{"id": 5, "username": "jsmith"}"#).unwrap()
    }

    #[tokio::test]
    async fn test_empty_username_sends_nothing() {
        let server = MockServer::start().await;
        mount_login(&server, ResponseTemplate::new(200), 0).await;
        let mut h = harness();

        let result = h
            .form
            .submit(
                &api(&server),
                Credentials::new("", "hunter22", false),
                &mut h.session,
                &mut h.notifications,
            )
            .await;

        let Err(SubmitRejected::Invalid(errors)) = result else {
            panic!("expected validation failure, got {:?}", result);
        };
        assert_eq!(errors.username.unwrap().to_string(), "Username is required");
        assert_eq!(h.form.field_errors().username, Some(FieldError::UsernameRequired));
        assert!(!h.form.is_busy());
        assert!(!h.notifications.is_active());
    }

    #[tokio::test]
    async fn test_short_password_sends_nothing() {
        let server = MockServer::start().await;
        mount_login(&server, ResponseTemplate::new(200), 0).await;
        let mut h = harness();

        let result = h
            .form
            .submit(
                &api(&server),
                Credentials::new("jsmith", "123456", false),
                &mut h.session,
                &mut h.notifications,
            )
            .await;

        let Err(SubmitRejected::Invalid(errors)) = result else {
            panic!("expected validation failure, got {:?}", result);
        };
        assert!(errors.password.unwrap().to_string().contains('7'));
    }

    #[tokio::test]
    async fn test_success_sets_user_once() {
        let server = MockServer::start().await;
        mount_login(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"id": 5, "username": "jsmith"})),
            1,
        )
        .await;
        let mut h = harness();

        let outcome = h
            .form
            .submit(
                &api(&server),
                Credentials::new("jsmith", "hunter22", true),
                &mut h.session,
                &mut h.notifications,
            )
            .await
            .unwrap();

        assert_eq!(outcome, LoginOutcome::LoggedIn(user()));
        assert_eq!(h.session.user(), Some(&user()));
        assert!(!h.form.is_busy());
        assert!(!h.notifications.is_active());
    }

    #[tokio::test]
    async fn test_401_shows_incorrect_login_details() {
        let server = MockServer::start().await;
        mount_login(&server, ResponseTemplate::new(401), 1).await;
        let mut h = harness();

        let outcome = h
            .form
            .submit(
                &api(&server),
                Credentials::new("jsmith", "wrongpass", false),
                &mut h.session,
                &mut h.notifications,
            )
            .await
            .unwrap();

        assert_eq!(
            outcome,
            LoginOutcome::Failed {
                message: "Incorrect login details",
                notified: true
            }
        );
        let n = h.notifications.current().unwrap();
        assert_eq!(n.kind, NotificationKind::Error);
        assert_eq!(n.text, "Incorrect login details");
        assert!(!h.session.is_authenticated());
    }

    #[tokio::test]
    async fn test_other_status_shows_generic_error() {
        for status in [400u16, 403, 404, 422, 500, 503] {
            let server = MockServer::start().await;
            mount_login(&server, ResponseTemplate::new(status), 1).await;
            let mut h = harness();

            h.form
                .submit(
                    &api(&server),
                    Credentials::new("jsmith", "hunter22", false),
                    &mut h.session,
                    &mut h.notifications,
                )
                .await
                .unwrap();

            assert_eq!(h.notifications.current().unwrap().text, "Error occurred");
        }
    }

    #[tokio::test]
    async fn test_failure_while_notification_visible_does_not_replace_it() {
        let server = MockServer::start().await;
        mount_login(&server, ResponseTemplate::new(500), 2).await;
        let mut h = harness();
        let api = api(&server);

        for _ in 0..2 {
            h.form
                .submit(
                    &api,
                    Credentials::new("jsmith", "hunter22", false),
                    &mut h.session,
                    &mut h.notifications,
                )
                .await
                .unwrap();
        }

        // Make sure the second failure did not swap the message
        let first_id = h.notifications.current().unwrap().id;
        let outcome = h.form.finish_submit(
            Err(ApiError::Unauthorized),
            &mut h.session,
            &mut h.notifications,
        );
        assert_eq!(
            outcome,
            LoginOutcome::Failed {
                message: "Incorrect login details",
                notified: false
            }
        );
        assert_eq!(h.notifications.current().unwrap().id, first_id);
        assert_eq!(h.notifications.current().unwrap().text, "Error occurred");
    }

    #[tokio::test]
    async fn test_busy_form_rejects_second_submit() {
        let mut h = harness();
        let creds = Credentials::new("jsmith", "hunter22", false);

        h.form.begin_submit(&creds).unwrap();
        assert!(h.form.is_busy());
        assert_eq!(h.form.begin_submit(&creds), Err(SubmitRejected::Busy));

        h.form
            .finish_submit(Ok(user()), &mut h.session, &mut h.notifications);
        assert!(!h.form.is_busy());
        assert!(h.form.begin_submit(&creds).is_ok());
    }

    #[test]
    fn test_held_form_rejects_submit_until_released() {
        let mut form = LoginForm::new();
        let creds = Credentials::new("jsmith", "hunter22", false);

        form.hold();
        assert_eq!(form.begin_submit(&creds), Err(SubmitRejected::Busy));

        form.release();
        assert!(form.begin_submit(&creds).is_ok());
    }

    #[tokio::test]
    async fn test_on_enter_announces_logout_once() {
        let mut h = harness();
        h.session.set_user(user());
        h.session.logout();

        assert!(h.form.on_enter(&mut h.session, &mut h.notifications));
        let n = h.notifications.current().unwrap();
        assert_eq!(n.kind, NotificationKind::Success);
        assert_eq!(n.text, "Logged Out Successfully");
        assert!(!h.session.is_logging_out());

        h.notifications.dismiss();
        assert!(!h.form.on_enter(&mut h.session, &mut h.notifications));
        assert!(!h.notifications.is_active());
    }

    #[tokio::test]
    async fn test_on_enter_waits_for_visible_notification() {
        let mut h = harness();
        h.session.set_user(user());
        h.session.logout();
        h.notifications
            .show_if_idle(NotificationKind::Error, "Error occurred");

        assert!(!h.form.on_enter(&mut h.session, &mut h.notifications));
        assert!(h.session.is_logging_out());

        h.notifications.dismiss();
        assert!(h.form.on_enter(&mut h.session, &mut h.notifications));
        assert_eq!(
            h.notifications.current().unwrap().text,
            "Logged Out Successfully"
        );
    }
}
