//! Per-user task persistence.
//!
//! # Responsibility
//! - Own the `tasks_<username>` key family.
//! - Provide the load/save/delete surface consumed by the UI layer and by
//!   admin cascade deletion.
//!
//! # Invariants
//! - One key per username; task order within a value is preserved verbatim.

use crate::model::task::Task;
use crate::repo::account_repo::{AccountError, AccountResult};
use crate::store::KeyValueStore;
use log::info;

/// Prefix of every per-user task key.
pub const TASK_KEY_PREFIX: &str = "tasks_";

/// Builds the storage key for one user's task list.
pub fn task_key(username: &str) -> String {
    format!("{TASK_KEY_PREFIX}{username}")
}

/// Extracts the username from a task key, or `None` for unrelated keys.
pub fn username_from_task_key(key: &str) -> Option<&str> {
    key.strip_prefix(TASK_KEY_PREFIX)
}

/// Task list persistence scoped by username.
pub struct TaskStore<'s, S: KeyValueStore> {
    store: &'s S,
}

impl<'s, S: KeyValueStore> TaskStore<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Loads one user's tasks. An absent key is an empty list.
    pub fn load_tasks_for(&self, username: &str) -> AccountResult<Vec<Task>> {
        match self.store.get(&task_key(username))? {
            Some(raw) => serde_json::from_str(&raw).map_err(|err| {
                AccountError::InvalidData(format!("tasks payload for `{username}`: {err}"))
            }),
            None => Ok(Vec::new()),
        }
    }

    /// Replaces one user's task list.
    pub fn save_tasks_for(&self, username: &str, tasks: &[Task]) -> AccountResult<()> {
        let raw = serde_json::to_string(tasks).map_err(|err| {
            AccountError::InvalidData(format!("tasks serialization for `{username}`: {err}"))
        })?;
        self.store.set(&task_key(username), &raw)?;
        Ok(())
    }

    /// Removes one user's entire task list. Idempotent.
    pub fn delete_all_tasks_for(&self, username: &str) -> AccountResult<()> {
        self.store.remove(&task_key(username))?;
        info!("event=tasks_delete module=tasks status=ok username={username}");
        Ok(())
    }

    /// Returns every username that currently has a stored task list.
    pub fn task_usernames(&self) -> AccountResult<Vec<String>> {
        let usernames = self
            .store
            .keys()?
            .iter()
            .filter_map(|key| username_from_task_key(key))
            .map(str::to_string)
            .collect();
        Ok(usernames)
    }
}
