//! Core domain types
//!
//! Entities as the backend reports them. These are read-only on the client
//! side; the backend owns their lifecycle.

pub mod document;
pub mod task;
