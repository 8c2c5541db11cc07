//! Admin-gated destructive operations and directory read view.
//!
//! # Responsibility
//! - Gate delete-user, cleanup and the full-directory view behind the
//!   single authorization predicate.
//! - Cascade task deletion alongside account deletion.
//!
//! # Invariants
//! - Every operation re-checks the admin predicate at its entry point; UI
//!   visibility is cosmetic and never trusted.
//! - The `Admin_00` record is never deleted, by either operation.
//! - The predicate is exact-match and all-or-nothing; there are no roles.

use crate::model::credential::{CredentialRecord, SessionUser, ADMIN_USERNAME};
use crate::repo::account_repo::{AccountDirectory, AccountResult, AuthError};
use crate::repo::task_repo::TaskStore;
use crate::service::session_service::SessionManager;
use crate::store::KeyValueStore;
use log::info;

/// The only authorization predicate in the system: true iff a session
/// exists and its username exactly equals the admin identity.
pub fn is_admin(session: Option<&SessionUser>) -> bool {
    session.is_some_and(SessionUser::is_admin)
}

/// Capability check plus the operations it gates.
pub struct AdminAuthority<'s, S: KeyValueStore> {
    store: &'s S,
}

impl<'s, S: KeyValueStore> AdminAuthority<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    fn require_admin(&self) -> AccountResult<SessionUser> {
        let session = SessionManager::new(self.store).current_session()?;
        match session {
            Some(user) if user.is_admin() => Ok(user),
            _ => {
                info!(
                    "event=admin_check module=admin status=error error_code=admin_required"
                );
                Err(AuthError::AdminRequired.into())
            }
        }
    }

    /// Full directory read, plaintext passwords included.
    ///
    /// Plaintext exposure is documented application behavior; the admin
    /// dashboard renders these values as-is.
    pub fn list_accounts(&self) -> AccountResult<Vec<CredentialRecord>> {
        self.require_admin()?;
        AccountDirectory::new(self.store).load()
    }

    /// Deletes one account and cascades deletion of its task list.
    ///
    /// Refuses the protected admin record. Deleting an absent user still
    /// removes any orphaned task key.
    pub fn delete_user(&self, username: &str) -> AccountResult<()> {
        self.require_admin()?;

        if username == ADMIN_USERNAME {
            return Err(AuthError::ProtectedAccount(username.to_string()).into());
        }

        AccountDirectory::new(self.store).remove_user(username)?;
        TaskStore::new(self.store).delete_all_tasks_for(username)?;
        info!("event=user_delete module=admin status=ok username={username}");
        Ok(())
    }

    /// Removes every account and task list except the admin's.
    ///
    /// If the active session does not belong to `Admin_00` it is cleared;
    /// the self-lockout is intentional. In practice the admin gate makes
    /// that branch unreachable, but the conditional clear is kept so the
    /// operation is safe even if the gate is bypassed.
    pub fn cleanup_all_except_admin(&self) -> AccountResult<()> {
        self.require_admin()?;

        let directory = AccountDirectory::new(self.store);
        directory.retain_admin_only()?;

        let tasks = TaskStore::new(self.store);
        for username in tasks.task_usernames()? {
            if username != ADMIN_USERNAME {
                tasks.delete_all_tasks_for(&username)?;
            }
        }

        let sessions = SessionManager::new(self.store);
        if let Some(session) = sessions.current_session()? {
            if !session.is_admin() {
                sessions.logout()?;
            }
        }

        info!("event=account_cleanup module=admin status=ok");
        Ok(())
    }
}
