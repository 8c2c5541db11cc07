//! Account directory persistence and credential operations.
//!
//! # Responsibility
//! - Own the `users` key: one JSON array of credential records.
//! - Enforce username/email uniqueness and password rules on every write.
//!
//! # Invariants
//! - No two records share a case-insensitively equal username or email.
//! - A record with username `Admin_00` always exists after bootstrap.
//! - Read-modify-write sequences are not atomic; callers run single-threaded
//!   and never interleave two directory operations.

use crate::model::credential::{
    CredentialRecord, SessionUser, ValidationError, ADMIN_USERNAME, MIN_PASSWORD_LEN,
    MIN_USERNAME_LEN,
};
use crate::store::{KeyValueStore, StoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Well-known key holding the serialized account directory.
pub const USERS_KEY: &str = "users";

pub type AccountResult<T> = Result<T, AccountError>;

/// Uniqueness violation against the existing directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictError {
    DuplicateUsername(String),
    DuplicateEmail(String),
}

impl Display for ConflictError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateUsername(username) => {
                write!(f, "username already exists: {username}")
            }
            Self::DuplicateEmail(email) => write!(f, "email already registered: {email}"),
        }
    }
}

impl Error for ConflictError {}

/// Bad credentials or failed authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No record matches the username/password pair. Deliberately does not
    /// say which half failed.
    InvalidCredentials,
    UserNotFound(String),
    WrongCurrentPassword,
    /// The caller's session is absent or not the administrator.
    AdminRequired,
    /// The distinguished admin record cannot be deleted.
    ProtectedAccount(String),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "invalid username or password"),
            Self::UserNotFound(username) => write!(f, "user not found: {username}"),
            Self::WrongCurrentPassword => write!(f, "incorrect current password"),
            Self::AdminRequired => write!(f, "admin privileges required"),
            Self::ProtectedAccount(username) => {
                write!(f, "account is protected and cannot be deleted: {username}")
            }
        }
    }
}

impl Error for AuthError {}

/// Generic error for account directory operations.
#[derive(Debug)]
pub enum AccountError {
    Validation(ValidationError),
    Conflict(ConflictError),
    Auth(AuthError),
    Store(StoreError),
    /// The persisted directory payload does not parse as the expected shape.
    InvalidData(String),
}

impl Display for AccountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Conflict(err) => write!(f, "{err}"),
            Self::Auth(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted account data: {message}")
            }
        }
    }
}

impl Error for AccountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Conflict(err) => Some(err),
            Self::Auth(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for AccountError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ConflictError> for AccountError {
    fn from(value: ConflictError) -> Self {
        Self::Conflict(value)
    }
}

impl From<AuthError> for AccountError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<StoreError> for AccountError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Directory of every registered account, persisted as one value.
pub struct AccountDirectory<'s, S: KeyValueStore> {
    store: &'s S,
}

impl<'s, S: KeyValueStore> AccountDirectory<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Loads the directory, surfacing corrupt payloads as `InvalidData`.
    ///
    /// An absent `users` key is an empty directory, not an error.
    pub fn load(&self) -> AccountResult<Vec<CredentialRecord>> {
        match self.store.get(USERS_KEY)? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|err| AccountError::InvalidData(format!("users payload: {err}"))),
            None => Ok(Vec::new()),
        }
    }

    /// Loads the directory, treating corrupt payloads as empty.
    ///
    /// This is the explicit fallback branch used by bootstrap; storage
    /// transport errors still surface.
    pub fn load_or_default(&self) -> AccountResult<Vec<CredentialRecord>> {
        match self.load() {
            Ok(records) => Ok(records),
            Err(AccountError::InvalidData(message)) => {
                warn!(
                    "event=directory_load module=account status=recovered error_code=corrupt_payload detail={message}"
                );
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    fn save(&self, records: &[CredentialRecord]) -> AccountResult<()> {
        let raw = serde_json::to_string(records)
            .map_err(|err| AccountError::InvalidData(format!("users serialization: {err}")))?;
        self.store.set(USERS_KEY, &raw)?;
        Ok(())
    }

    /// Ensures the default admin record exists. Idempotent.
    ///
    /// A corrupt stored directory is silently recovered by resetting it to
    /// contain only the default admin record; no error is surfaced for that
    /// case.
    pub fn bootstrap_default_admin(&self) -> AccountResult<()> {
        let mut records = self.load_or_default()?;

        let admin_exists = records
            .iter()
            .any(|record| record.username_matches(ADMIN_USERNAME));
        if admin_exists {
            return Ok(());
        }

        records.push(CredentialRecord::default_admin());
        self.save(&records)?;
        info!("event=admin_bootstrap module=account status=ok");
        Ok(())
    }

    /// Registers a new account. No auto-login: the caller must separately
    /// authenticate.
    pub fn register(&self, username: &str, email: &str, password: &str) -> AccountResult<()> {
        let username = username.trim();
        let email = email.trim();
        let password = password.trim();

        if username.is_empty() {
            return Err(ValidationError::EmptyField("username").into());
        }
        if email.is_empty() {
            return Err(ValidationError::EmptyField("email").into());
        }
        if password.is_empty() {
            return Err(ValidationError::EmptyField("password").into());
        }
        if username.chars().count() < MIN_USERNAME_LEN {
            return Err(ValidationError::UsernameTooShort {
                min: MIN_USERNAME_LEN,
                actual: username.chars().count(),
            }
            .into());
        }

        let mut records = self.load()?;

        if records.iter().any(|record| record.username_matches(username)) {
            return Err(ConflictError::DuplicateUsername(username.to_string()).into());
        }
        if records.iter().any(|record| record.email_matches(email)) {
            return Err(ConflictError::DuplicateEmail(email.to_string()).into());
        }

        records.push(CredentialRecord::new(username, email, password));
        self.save(&records)?;
        info!("event=register module=account status=ok username={username}");
        Ok(())
    }

    /// Matches a record by case-insensitive username and exact password.
    ///
    /// Returns the identity projection on success. Any number of attempts
    /// is permitted; there is no lockout or backoff.
    pub fn authenticate(&self, username: &str, password: &str) -> AccountResult<SessionUser> {
        let records = self.load()?;
        let matched = records
            .iter()
            .find(|record| record.username_matches(username) && record.password == password);

        match matched {
            Some(record) => Ok(record.identity()),
            None => {
                info!(
                    "event=authenticate module=account status=error error_code=invalid_credentials username={username}"
                );
                Err(AuthError::InvalidCredentials.into())
            }
        }
    }

    /// Replaces the stored password after verifying the current one.
    ///
    /// Lookup is by exact username: this runs on behalf of an active
    /// session whose username was copied verbatim from the record.
    pub fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> AccountResult<()> {
        let mut records = self.load()?;
        let record = records
            .iter_mut()
            .find(|record| record.username == username)
            .ok_or_else(|| AuthError::UserNotFound(username.to_string()))?;

        if record.password != current_password {
            return Err(AuthError::WrongCurrentPassword.into());
        }
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::NewPasswordTooShort {
                min: MIN_PASSWORD_LEN,
                actual: new_password.chars().count(),
            }
            .into());
        }

        record.password = new_password.to_string();
        self.save(&records)?;
        info!("event=password_change module=account status=ok username={username}");
        Ok(())
    }

    /// Removes the exact-matching record from the directory only.
    ///
    /// No-op if absent. Task cascade and admin gating live in the admin
    /// service.
    pub fn remove_user(&self, username: &str) -> AccountResult<()> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|record| record.username != username);
        if records.len() != before {
            self.save(&records)?;
            info!("event=user_remove module=account status=ok username={username}");
        }
        Ok(())
    }

    /// Drops every record except the exact `Admin_00` one.
    pub fn retain_admin_only(&self) -> AccountResult<()> {
        let mut records = self.load()?;
        records.retain(|record| record.username == ADMIN_USERNAME);
        self.save(&records)?;
        Ok(())
    }
}
