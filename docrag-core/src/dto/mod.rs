//! Data transfer objects for the backend API
//!
//! Request bodies and response envelopes exchanged with the docrag
//! backend over JSON/HTTP.

pub mod ask;
pub mod document;
pub mod health;
