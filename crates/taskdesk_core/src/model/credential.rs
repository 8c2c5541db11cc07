//! Credential record and session identity projection.
//!
//! # Responsibility
//! - Define one account's username/email/password tuple.
//! - Define the reduced `{username, email}` projection persisted as the
//!   active session.
//!
//! # Invariants
//! - Passwords are stored verbatim. This is documented application
//!   behavior, not an oversight; nothing in core hashes or redacts them.
//! - Username comparisons for identity are case-insensitive; password
//!   comparisons are exact.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// The distinguished administrator identity. The record with this exact
/// username always exists after bootstrap and can never be deleted.
pub const ADMIN_USERNAME: &str = "Admin_00";
pub const ADMIN_EMAIL: &str = "admin@system.com";
pub const ADMIN_PASSWORD: &str = "admin123";

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

/// One account's stored credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl CredentialRecord {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// The fixed record appended by directory bootstrap.
    pub fn default_admin() -> Self {
        Self::new(ADMIN_USERNAME, ADMIN_EMAIL, ADMIN_PASSWORD)
    }

    /// Reduced identity projection copied into the session at login time.
    pub fn identity(&self) -> SessionUser {
        SessionUser {
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }

    /// Case-insensitive username identity check.
    pub fn username_matches(&self, candidate: &str) -> bool {
        self.username.eq_ignore_ascii_case(candidate)
    }

    /// Case-insensitive email identity check.
    pub fn email_matches(&self, candidate: &str) -> bool {
        self.email.eq_ignore_ascii_case(candidate)
    }
}

/// The active logged-in identity persisted under the session key.
///
/// Copied from a credential record at login, so it can become stale with
/// respect to later password changes but never with respect to username or
/// email, which are immutable post-registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub username: String,
    pub email: String,
}

impl SessionUser {
    /// True iff this identity is the distinguished administrator.
    ///
    /// Exact match on purpose: the admin gate is stricter than the
    /// case-insensitive login lookup.
    pub fn is_admin(&self) -> bool {
        self.username == ADMIN_USERNAME
    }
}

/// Malformed or insufficient registration/password input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyField(&'static str),
    UsernameTooShort { min: usize, actual: usize },
    NewPasswordTooShort { min: usize, actual: usize },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "field `{field}` must not be empty"),
            Self::UsernameTooShort { min, actual } => write!(
                f,
                "username must be at least {min} characters, got {actual}"
            ),
            Self::NewPasswordTooShort { min, actual } => write!(
                f,
                "new password must be at least {min} characters, got {actual}"
            ),
        }
    }
}

impl Error for ValidationError {}
