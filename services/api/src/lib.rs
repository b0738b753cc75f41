//! services/api/src/lib.rs
//!
//! The PhishGuard web service: configuration, adapters for the analysis LLM and
//! the history file, and the axum web layer.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
