//! Application state management for the TicketMule terminal client.
//!
//! This module contains the `App` struct that owns all client state: the
//! login form, the session, the visible notification and the time types
//! loaded after sign-in. Network calls run on spawned tasks and report back
//! through a single MPSC channel of `AppEvent`s.

use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use ticketmule_core::api::ApiConfig;
use ticketmule_core::notification::NotificationExpired;
use ticketmule_core::{
    ApiClient, ApiError, Config, Credentials, LoginForm, LoginOutcome, NotificationCenter,
    SessionState, SubmitRejected, TimeType, User,
};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background event channel.
/// A login, a fetch and a couple of timers are the most ever in flight.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for username input.
const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Environment overrides
const ENV_SERVER_URL: &str = "TICKETMULE_URL";
const ENV_USERNAME: &str = "TICKETMULE_USERNAME";
const ENV_PASSWORD: &str = "TICKETMULE_PASSWORD";

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    LoggingIn,
    Normal,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Username,
    Password,
    Remember,
    Button,
}

impl LoginFocus {
    pub fn next(&self) -> Self {
        match self {
            LoginFocus::Username => LoginFocus::Password,
            LoginFocus::Password => LoginFocus::Remember,
            LoginFocus::Remember => LoginFocus::Button,
            LoginFocus::Button => LoginFocus::Username,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            LoginFocus::Username => LoginFocus::Button,
            LoginFocus::Password => LoginFocus::Username,
            LoginFocus::Remember => LoginFocus::Password,
            LoginFocus::Button => LoginFocus::Remember,
        }
    }
}

// ============================================================================
// Background Events
// ============================================================================

/// Messages sent from spawned tasks back to the main loop.
pub enum AppEvent {
    /// The login request finished
    LoginFinished(Result<User, ApiError>),
    /// The server answered (or failed) the logout request
    LogoutFinished(Result<(), ApiError>),
    /// The time-type list was fetched (or failed)
    TimeTypesLoaded(Result<Vec<TimeType>, ApiError>),
    /// A notification's clear timer fired
    NotificationExpired(u64),
}

impl From<NotificationExpired> for AppEvent {
    fn from(expired: NotificationExpired) -> Self {
        AppEvent::NotificationExpired(expired.0)
    }
}

/// Username and remember flag of the submission in flight
struct PendingLogin {
    username: String,
    remember: bool,
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    // Core services
    pub config: Config,
    /// Where the remembered username is written; `None` when the file
    /// could not be read at startup
    config_path: Option<PathBuf>,
    pub api: ApiClient,
    pub session: SessionState,
    pub notifications: NotificationCenter<AppEvent>,

    pub state: AppState,

    // Login form state
    pub login_form: LoginForm,
    pub login_username: String,
    pub login_password: String,
    pub login_remember: bool,
    pub login_focus: LoginFocus,
    pending_login: Option<PendingLogin>,
    pub logout_in_flight: bool,

    // Main screen
    pub time_types: Vec<TimeType>,
    pub time_type_selection: usize,
    pub status_message: Option<String>,

    // Background task channel
    event_rx: mpsc::Receiver<AppEvent>,
    event_tx: mpsc::Sender<AppEvent>,
}

impl App {
    /// Create the app from the config file and environment
    pub fn new() -> Result<Self> {
        let loaded = Config::config_path()
            .and_then(|path| Config::load_from(&path).map(|config| (config, path)));
        let (config, config_path) = match loaded {
            Ok((config, path)) => (config, Some(path)),
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults without saving");
                (Config::default(), None)
            }
        };

        // Applies to this run only, never written back
        let server_override = std::env::var(ENV_SERVER_URL).ok();
        if let Some(ref url) = server_override {
            debug!(url = %url, "Server URL overridden from environment");
        }

        let mut app = Self::build(config, config_path, server_override)?;

        if let Ok(username) = std::env::var(ENV_USERNAME) {
            app.login_username = username;
        }
        app.login_password = std::env::var(ENV_PASSWORD).unwrap_or_default();

        Ok(app)
    }

    /// Build from an in-memory config that is never saved
    pub fn with_config(config: Config) -> Result<Self> {
        Self::build(config, None, None)
    }

    fn build(
        config: Config,
        config_path: Option<PathBuf>,
        server_override: Option<String>,
    ) -> Result<Self> {
        let mut api_config: ApiConfig = config.api_config();
        if let Some(url) = server_override {
            api_config.base_url = url;
        }
        debug!(server = %api_config.base_url, "API client configured");
        let api = ApiClient::new(&api_config)?;

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let notifications = NotificationCenter::new(tx.clone(), config.notification_delay());

        let login_username = config.last_username.clone().unwrap_or_default();
        let login_remember = config.last_username.is_some();

        Ok(Self {
            config,
            config_path,
            api,
            session: SessionState::new(),
            notifications,

            state: AppState::LoggingIn,

            login_form: LoginForm::new(),
            login_username,
            login_password: String::new(),
            login_remember,
            login_focus: LoginFocus::Username,
            pending_login: None,
            logout_in_flight: false,

            time_types: Vec::new(),
            time_type_selection: 0,
            status_message: None,

            event_rx: rx,
            event_tx: tx,
        })
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Show the login overlay
    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        self.login_focus = if self.login_username.is_empty() {
            LoginFocus::Username
        } else {
            LoginFocus::Password
        };
        self.login_form.clear_field_errors();
        self.login_form
            .on_enter(&mut self.session, &mut self.notifications);
    }

    /// Submit the login form. The request runs on a background task.
    pub fn attempt_login(&mut self) {
        let credentials = Credentials::new(
            self.login_username.clone(),
            self.login_password.clone(),
            self.login_remember,
        );

        match self.login_form.begin_submit(&credentials) {
            Ok(()) => {}
            Err(SubmitRejected::Busy) => {
                debug!("Login already in flight");
                return;
            }
            Err(SubmitRejected::Invalid(errors)) => {
                debug!(%errors, "Login form invalid");
                return;
            }
        }

        info!(username = %credentials.username, "Signing in");
        self.pending_login = Some(PendingLogin {
            username: credentials.username.clone(),
            remember: credentials.remember,
        });

        let api = self.api.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = api.login(&credentials).await;
            drop(credentials);
            Self::send_event(&tx, AppEvent::LoginFinished(result)).await;
        });
    }

    fn handle_login_finished(&mut self, result: Result<User, ApiError>) {
        let pending = self.pending_login.take();
        let outcome =
            self.login_form
                .finish_submit(result, &mut self.session, &mut self.notifications);

        match outcome {
            LoginOutcome::LoggedIn(_) => {
                if let Some(pending) = pending {
                    self.config
                        .remember_username(&pending.username, pending.remember);
                    if let Some(ref path) = self.config_path {
                        if let Err(e) =
                            Config::save_last_username(path, &pending.username, pending.remember)
                        {
                            warn!(error = %e, "Failed to save config");
                        }
                    }
                }
                self.login_password.clear();
                self.state = AppState::Normal;
                self.refresh_time_types();
            }
            LoginOutcome::Failed { message, notified } => {
                debug!(reason = message, notified, "Login rejected");
            }
        }
    }

    /// Sign out locally and tell the server in the background. The login
    /// button stays busy until the server has answered, so a new session
    /// cookie cannot be cleared by a late logout.
    pub fn logout(&mut self) {
        if self.session.logout().is_none() {
            return;
        }

        self.time_types.clear();
        self.time_type_selection = 0;
        self.status_message = None;

        self.logout_in_flight = true;
        self.login_form.hold();

        let api = self.api.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = api.logout().await;
            Self::send_event(&tx, AppEvent::LogoutFinished(result)).await;
        });

        self.start_login();
    }

    fn handle_logout_finished(&mut self, result: Result<(), ApiError>) {
        if let Err(e) = result {
            warn!(error = %e, "Server logout failed");
        }
        self.logout_in_flight = false;
        self.login_form.release();
    }

    // =========================================================================
    // Time Types
    // =========================================================================

    /// Spawn a background fetch of the time-type list
    pub fn refresh_time_types(&mut self) {
        let api = self.api.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = api.fetch_time_types().await;
            Self::send_event(&tx, AppEvent::TimeTypesLoaded(result)).await;
        });
        self.status_message = Some("Loading time types...".to_string());
    }

    fn handle_time_types(&mut self, result: Result<Vec<TimeType>, ApiError>) {
        match result {
            Ok(types) => {
                info!(count = types.len(), "Time types loaded");
                self.time_types = types;
                self.time_type_selection = self
                    .time_type_selection
                    .min(self.time_types.len().saturating_sub(1));
                self.status_message = None;
            }
            Err(e) => {
                error!(error = %e, "Failed to load time types");
                self.status_message = Some(format!("Error: {}", e));
            }
        }
    }

    pub fn select_next_time_type(&mut self) {
        if self.time_type_selection + 1 < self.time_types.len() {
            self.time_type_selection += 1;
        }
    }

    pub fn select_prev_time_type(&mut self) {
        self.time_type_selection = self.time_type_selection.saturating_sub(1);
    }

    // =========================================================================
    // Background Events
    // =========================================================================

    /// Helper to send events, logging any channel errors
    async fn send_event(tx: &mpsc::Sender<AppEvent>, event: AppEvent) {
        if tx.send(event).await.is_err() {
            error!("Failed to send background event - channel closed");
        }
    }

    /// Drain and apply every pending background event
    pub fn check_background_tasks(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::LoginFinished(result) => self.handle_login_finished(result),
            AppEvent::LogoutFinished(result) => self.handle_logout_finished(result),
            AppEvent::TimeTypesLoaded(result) => {
                // A logout may have raced the fetch
                if self.is_authenticated() {
                    self.handle_time_types(result);
                }
            }
            AppEvent::NotificationExpired(id) => {
                if self.notifications.expire(id) && self.state == AppState::LoggingIn {
                    self.login_form
                        .on_enter(&mut self.session, &mut self.notifications);
                }
            }
        }
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a username character should be accepted
pub fn can_add_username_char(current_len: usize, c: char) -> bool {
    current_len < MAX_USERNAME_LENGTH && is_valid_input_char(c)
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================
