//! Core domain logic for taskdesk.
//! This crate is the single source of truth for business invariants:
//! account directory uniqueness, session lifecycle, the admin authority
//! and snapshot backup/restore over the shared key-value store.

pub mod backup;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use backup::{
    export_snapshot, import_snapshot, import_snapshot_file, snapshot_file_name, snapshot_to_json,
    write_snapshot_file, Snapshot, SnapshotError, SnapshotResult,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::credential::{
    CredentialRecord, SessionUser, ValidationError, ADMIN_EMAIL, ADMIN_PASSWORD, ADMIN_USERNAME,
};
pub use model::task::{Task, TaskPriority, TaskStats, TaskStatus};
pub use repo::account_repo::{
    AccountDirectory, AccountError, AccountResult, AuthError, ConflictError, USERS_KEY,
};
pub use repo::task_repo::{task_key, username_from_task_key, TaskStore, TASK_KEY_PREFIX};
pub use service::admin_service::{is_admin, AdminAuthority};
pub use service::session_service::{SessionManager, SESSION_KEY};
pub use store::{
    open_store, open_store_in_memory, KeyValueStore, SqliteKvStore, StoreError, StoreResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
