//! Session lifecycle over the persisted `currentUser` key.
//!
//! # Responsibility
//! - Track the single active logged-in identity, or none.
//! - Delegate credential checks to the account directory.
//!
//! # Invariants
//! - At most one session exists; there is no intermediate state between
//!   "auth" and "application" modes.
//! - A failed login leaves any prior session untouched.
//! - Logout is unconditional and idempotent.

use crate::model::credential::SessionUser;
use crate::repo::account_repo::{AccountDirectory, AccountError, AccountResult};
use crate::store::KeyValueStore;
use log::{info, warn};

/// Well-known key holding the serialized session projection.
pub const SESSION_KEY: &str = "currentUser";

/// Manages the at-most-one active session.
pub struct SessionManager<'s, S: KeyValueStore> {
    store: &'s S,
}

impl<'s, S: KeyValueStore> SessionManager<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Returns the persisted session projection, or `None` when logged out.
    ///
    /// A corrupt session payload reads as logged out rather than an error;
    /// the next successful login overwrites it.
    pub fn current_session(&self) -> AccountResult<Option<SessionUser>> {
        match self.store.get(SESSION_KEY)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(session) => Ok(Some(session)),
                Err(err) => {
                    warn!(
                        "event=session_read module=session status=recovered error_code=corrupt_payload detail={err}"
                    );
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Authenticates and persists the returned identity as the session.
    pub fn login(&self, username: &str, password: &str) -> AccountResult<SessionUser> {
        let directory = AccountDirectory::new(self.store);
        let session = directory.authenticate(username, password)?;

        let raw = serde_json::to_string(&session)
            .map_err(|err| AccountError::InvalidData(format!("session serialization: {err}")))?;
        self.store.set(SESSION_KEY, &raw)?;
        info!(
            "event=login module=session status=ok username={}",
            session.username
        );
        Ok(session)
    }

    /// Clears the persisted session. Safe to call while already logged out.
    pub fn logout(&self) -> AccountResult<()> {
        self.store.remove(SESSION_KEY)?;
        info!("event=logout module=session status=ok");
        Ok(())
    }

    /// The sole switch between the "auth" and "application" UI modes.
    pub fn is_authenticated(&self) -> AccountResult<bool> {
        Ok(self.current_session()?.is_some())
    }
}
