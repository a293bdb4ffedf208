//! Windsite Store - Storage ports, adapters, and cached stores
//!
//! This crate defines the backing-store ports, provides in-memory adapter
//! implementations, and layers the cached project store and session context
//! manager on top of them.

pub mod memory;
pub mod ports;
pub mod project;
pub mod session;
