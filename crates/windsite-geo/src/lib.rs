//! Windsite Geo - Distance, proximity search, and duplicate clustering
//!
//! This crate handles the geospatial side of project management: great-circle
//! distances, radius searches over project sets, and proximity-based duplicate
//! grouping. Pure computation, no I/O.

pub mod models;
pub mod proximity;
pub mod validation;
