//! Windsite Lifecycle - Project operation orchestration
//!
//! This crate implements the lifecycle operations, composing the project
//! store, session tracking, and proximity analysis into confirmation-gated
//! multi-step protocols with structured results.

pub mod filters;
pub mod manager;
pub mod messages;
pub mod names;
pub mod resolver;
pub mod results;

pub use filters::SearchFilters;
pub use manager::ProjectLifecycleManager;
pub use names::ProjectNameGenerator;
pub use resolver::ProjectResolver;
pub use results::{
    ArchiveResult, CreateResult, DashboardEntry, DashboardResult, DeleteResult, DuplicatesResult,
    ImportResult, MergeResult, RenameResult, SearchResult,
};
