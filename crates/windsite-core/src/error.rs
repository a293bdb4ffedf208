//! Error types for Windsite

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WindsiteError {
    // Confirmation gating
    #[error("Confirmation required: {prompt}")]
    ConfirmationRequired { prompt: String },

    // Project errors
    #[error("Project not found: {name}")]
    ProjectNotFound { name: String },

    #[error("Project name already exists: {name}")]
    NameAlreadyExists { name: String },

    #[error("Project '{name}' is in progress and cannot be deleted")]
    ProjectInProgress { name: String },

    // Input validation errors
    #[error("Invalid coordinates: {reason}")]
    InvalidCoordinates { reason: String },

    #[error("Invalid radius {radius_km} km: radius must be greater than zero")]
    InvalidRadius { radius_km: f64 },

    #[error("Invalid search radius {radius_km} km: radius must be greater than zero")]
    InvalidSearchRadius { radius_km: f64 },

    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("Invalid date range: {reason}")]
    InvalidDateRange { reason: String },

    // Name generation
    #[error("No free name found for '{base}' after {attempts} attempts")]
    NameGenerationExhausted { base: String, attempts: u32 },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Persistence errors. The original store message is always preserved
    // for diagnostics.
    #[error("Store error: {message}")]
    Store { message: String },

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, WindsiteError>;

/// Machine-readable error code carried in the `error` field of structured
/// operation results. Business failures are values at the public boundary,
/// never exceptions, so callers match on this instead of catching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    ConfirmationRequired,
    ProjectNotFound,
    NameAlreadyExists,
    ProjectInProgress,
    InvalidCoordinates,
    InvalidRadius,
    InvalidSearchRadius,
    InvalidProjectName,
    InvalidDateRange,
    NameGenerationExhausted,
    ConfigInvalid,
    StoreError,
    SerializationError,
}

impl WindsiteError {
    /// The code exposed for this error in operation results.
    pub fn code(&self) -> ErrorCode {
        match self {
            WindsiteError::ConfirmationRequired { .. } => ErrorCode::ConfirmationRequired,
            WindsiteError::ProjectNotFound { .. } => ErrorCode::ProjectNotFound,
            WindsiteError::NameAlreadyExists { .. } => ErrorCode::NameAlreadyExists,
            WindsiteError::ProjectInProgress { .. } => ErrorCode::ProjectInProgress,
            WindsiteError::InvalidCoordinates { .. } => ErrorCode::InvalidCoordinates,
            WindsiteError::InvalidRadius { .. } => ErrorCode::InvalidRadius,
            WindsiteError::InvalidSearchRadius { .. } => ErrorCode::InvalidSearchRadius,
            WindsiteError::InvalidProjectName { .. } => ErrorCode::InvalidProjectName,
            WindsiteError::InvalidDateRange { .. } => ErrorCode::InvalidDateRange,
            WindsiteError::NameGenerationExhausted { .. } => ErrorCode::NameGenerationExhausted,
            WindsiteError::ConfigInvalid { .. } => ErrorCode::ConfigInvalid,
            WindsiteError::Store { .. } => ErrorCode::StoreError,
            WindsiteError::Serialization(_) => ErrorCode::SerializationError,
        }
    }

    /// True for expected business-rule failures that must never be logged
    /// as errors (confirmation gates, lookups, guards, input validation).
    pub fn is_business_failure(&self) -> bool {
        !matches!(self, WindsiteError::Store { .. } | WindsiteError::Serialization(_))
    }
}
