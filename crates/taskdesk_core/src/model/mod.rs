//! Domain model for accounts, sessions and per-user tasks.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep the persisted JSON shapes stable across registrations, sessions
//!   and backup artifacts.
//!
//! # Invariants
//! - Usernames and emails are immutable after registration; only the
//!   password field of a credential record may change.
//! - The session projection never carries the password.

pub mod credential;
pub mod task;
