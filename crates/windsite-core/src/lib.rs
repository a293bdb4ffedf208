//! Windsite Core - Domain models, errors, and configuration
//!
//! This crate contains the core domain types and configuration layer for the
//! windsite project lifecycle system.

pub mod config;
pub mod error;
pub mod models;

pub use error::{ErrorCode, Result, WindsiteError};
