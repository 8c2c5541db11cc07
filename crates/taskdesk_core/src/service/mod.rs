//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate directory, session and task-store calls into the
//!   operations the UI layer invokes.
//! - Keep authorization re-checks at the operation entry points instead of
//!   trusting UI gating.

pub mod admin_service;
pub mod session_service;
