//! Authentication module for credentials and session state.
//!
//! This module provides:
//! - `Credentials`: the transient username/password pair and its field checks
//! - `SessionState`: who is signed in, and whether a logout just happened
//!
//! Nothing here is written to disk.

pub mod credentials;
pub mod session;

pub use credentials::{Credentials, FieldError, ValidationErrors, MIN_PASSWORD_LEN};
pub use session::SessionState;
