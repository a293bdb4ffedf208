//! Structured results returned by every lifecycle operation.
//!
//! Public operations never return `Err` for expected business failures;
//! they return one of these result values with `success` cleared and a
//! machine-readable error code alongside the human-readable message.

use serde::{Deserialize, Serialize};
use windsite_core::models::Project;
use windsite_core::{ErrorCode, WindsiteError};
use windsite_geo::models::DuplicateGroup;

/// Outcome of a delete operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResult {
    pub success: bool,
    pub message: String,
    /// Machine-readable failure code; `None` on success
    pub error: Option<ErrorCode>,
    /// Name the caller asked to delete
    pub project_name: String,
}

impl DeleteResult {
    pub fn ok(project_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
            project_name: project_name.into(),
        }
    }

    pub fn failed(
        project_name: impl Into<String>,
        error: &WindsiteError,
        message: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(error.code()),
            project_name: project_name.into(),
        }
    }
}

/// Outcome of a rename operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameResult {
    pub success: bool,
    pub message: String,
    pub error: Option<ErrorCode>,
    pub old_name: String,
    /// Canonical form of the requested new name
    pub new_name: String,
}

impl RenameResult {
    pub fn ok(
        old_name: impl Into<String>,
        new_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
            old_name: old_name.into(),
            new_name: new_name.into(),
        }
    }

    pub fn failed(
        old_name: impl Into<String>,
        new_name: impl Into<String>,
        error: &WindsiteError,
        message: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(error.code()),
            old_name: old_name.into(),
            new_name: new_name.into(),
        }
    }
}

/// Outcome of creating a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResult {
    pub success: bool,
    pub message: String,
    pub error: Option<ErrorCode>,
    /// The stored project on success
    pub project: Option<Project>,
}

impl CreateResult {
    pub fn ok(project: Project, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
            project: Some(project),
        }
    }

    pub fn failed(error: &WindsiteError, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(error.code()),
            project: None,
        }
    }
}

/// Outcome of importing an externally produced project record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResult {
    pub success: bool,
    pub message: String,
    pub error: Option<ErrorCode>,
    /// The stored project on success, under its possibly suffixed name
    pub project: Option<Project>,
}

impl ImportResult {
    pub fn ok(project: Project, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
            project: Some(project),
        }
    }

    pub fn failed(error: &WindsiteError, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(error.code()),
            project: None,
        }
    }
}

/// Outcome of a search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub success: bool,
    pub message: String,
    pub error: Option<ErrorCode>,
    /// Matching projects; empty on failure or when nothing matched
    pub projects: Vec<Project>,
}

impl SearchResult {
    pub fn ok(projects: Vec<Project>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
            projects,
        }
    }

    pub fn failed(error: &WindsiteError, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(error.code()),
            projects: Vec::new(),
        }
    }
}

/// Outcome of an archive or unarchive operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveResult {
    pub success: bool,
    pub message: String,
    pub error: Option<ErrorCode>,
    pub project_name: String,
    /// Archived state after the operation
    pub archived: bool,
}

impl ArchiveResult {
    pub fn ok(project_name: impl Into<String>, archived: bool, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
            project_name: project_name.into(),
            archived,
        }
    }

    pub fn failed(
        project_name: impl Into<String>,
        archived: bool,
        error: &WindsiteError,
        message: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(error.code()),
            project_name: project_name.into(),
            archived,
        }
    }
}

/// Outcome of a merge operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeResult {
    pub success: bool,
    pub message: String,
    pub error: Option<ErrorCode>,
    /// Name that now holds the combined record
    pub kept_name: Option<String>,
    /// Name that was folded in and deleted
    pub merged_name: Option<String>,
}

impl MergeResult {
    pub fn ok(
        kept_name: impl Into<String>,
        merged_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
            kept_name: Some(kept_name.into()),
            merged_name: Some(merged_name.into()),
        }
    }

    pub fn failed(error: &WindsiteError, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(error.code()),
            kept_name: None,
            merged_name: None,
        }
    }
}

/// One row of the project dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardEntry {
    pub project_name: String,
    /// 0, 25, 50, 75, or 100 depending on stage results present
    pub completion_percentage: u8,
    /// Furthest completed stage, e.g. "Terrain Complete"
    pub status_label: String,
    /// Formatted coordinates, or "Unknown"
    pub location: String,
    /// True when the project belongs to a duplicate group
    pub is_duplicate: bool,
    /// True when the project is the session's active project
    pub is_active: bool,
}

/// Outcome of dashboard generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResult {
    pub success: bool,
    pub message: String,
    pub error: Option<ErrorCode>,
    pub entries: Vec<DashboardEntry>,
}

impl DashboardResult {
    pub fn ok(entries: Vec<DashboardEntry>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
            entries,
        }
    }

    pub fn failed(error: &WindsiteError, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(error.code()),
            entries: Vec::new(),
        }
    }
}

/// Outcome of duplicate grouping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicatesResult {
    pub success: bool,
    pub message: String,
    pub error: Option<ErrorCode>,
    /// Radius the grouping ran with, in kilometers
    pub radius_km: f64,
    /// Groups sorted by descending member count
    pub groups: Vec<DuplicateGroup>,
}

impl DuplicatesResult {
    pub fn ok(radius_km: f64, groups: Vec<DuplicateGroup>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
            radius_km,
            groups,
        }
    }

    pub fn failed(radius_km: f64, error: &WindsiteError, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(error.code()),
            radius_km,
            groups: Vec::new(),
        }
    }
}
