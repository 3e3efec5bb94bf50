//! Docrag Core
//!
//! Core types for the docrag client stack.
//!
//! This crate contains:
//! - Domain types: entities owned by the backend (Document, answering tasks)
//! - DTOs: request bodies and response envelopes for the backend API

pub mod domain;
pub mod dto;
