//! Repository layer over the key-value store.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for accounts and tasks.
//! - Isolate key naming and JSON payload details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce directory uniqueness invariants before
//!   persistence.
//! - Repository APIs return semantic errors (conflict, auth) in addition to
//!   storage transport errors.

pub mod account_repo;
pub mod task_repo;
