//! Core library for the TicketMule client.
//!
//! This crate holds everything that does not touch the terminal:
//!
//! - `api`: HTTP client for the TicketMule server (login, logout, time types)
//! - `auth`: credential validation and the in-memory session state machine
//! - `notification`: the single transient notification and its clear timer
//! - `login`: the submission flow tying the three together
//! - `config`: persisted client configuration
//! - `models`: wire types returned by the server

pub mod api;
pub mod auth;
pub mod config;
pub mod login;
pub mod models;
pub mod notification;

pub use api::{ApiClient, ApiError};
pub use auth::{Credentials, FieldError, SessionState, ValidationErrors};
pub use config::Config;
pub use login::{LoginForm, LoginOutcome, SubmitRejected};
pub use models::{TimeType, User};
pub use notification::{ClearTimer, Notification, NotificationCenter, NotificationExpired, NotificationKind};
