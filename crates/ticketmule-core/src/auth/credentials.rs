use std::fmt;

use thiserror::Error;

/// Minimum number of characters the server accepts for a password
pub const MIN_PASSWORD_LEN: usize = 7;

/// A single failed field check
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("Username is required")]
    UsernameRequired,

    #[error("Password is required")]
    PasswordRequired,

    #[error("Password length must be at least {min} characters.")]
    PasswordTooShort { min: usize },
}

/// Field-level validation result. Each field carries at most one error so
/// the form can show them inline next to the input they belong to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub username: Option<FieldError>,
    pub password: Option<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = [self.username, self.password]
            .iter()
            .flatten()
            .map(|e| e.to_string())
            .collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Username/password pair for one submission.
///
/// Lives only as long as the submission; nothing in this crate stores it.
#[derive(Clone, Default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub remember: bool,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .field("remember", &self.remember)
            .finish()
    }
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>, remember: bool) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            remember,
        }
    }

    /// Check the shape of both fields. Length is counted in characters.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let username = if self.username.is_empty() {
            Some(FieldError::UsernameRequired)
        } else {
            None
        };

        let password = if self.password.is_empty() {
            Some(FieldError::PasswordRequired)
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            Some(FieldError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            })
        } else {
            None
        };

        let errors = ValidationErrors { username, password };
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
