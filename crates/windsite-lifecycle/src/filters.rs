//! Search filter model for project queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use windsite_core::models::{Coordinates, Project};
use windsite_core::{Result, WindsiteError};
use windsite_geo::validation;

/// Criteria for searching projects. All fields are optional and combine
/// as a strict AND; an empty filter matches every project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Case-insensitive substring match against the project name
    pub location: Option<String>,
    /// Inclusive lower bound on creation time
    pub date_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on creation time
    pub date_to: Option<DateTime<Utc>>,
    /// True keeps only projects missing at least one stage result;
    /// false has no filtering effect
    #[serde(default)]
    pub incomplete: bool,
    /// Exact match on the archived flag; missing metadata counts as false
    pub archived: Option<bool>,
    /// Center point for a proximity search
    pub coordinates: Option<Coordinates>,
    /// Radius for the proximity search, in kilometers; ignored without
    /// a center point
    pub radius_km: Option<f64>,
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_date_from(mut self, date_from: DateTime<Utc>) -> Self {
        self.date_from = Some(date_from);
        self
    }

    pub fn with_date_to(mut self, date_to: DateTime<Utc>) -> Self {
        self.date_to = Some(date_to);
        self
    }

    pub fn with_incomplete(mut self, incomplete: bool) -> Self {
        self.incomplete = incomplete;
        self
    }

    pub fn with_archived(mut self, archived: bool) -> Self {
        self.archived = Some(archived);
        self
    }

    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = Some(radius_km);
        self
    }

    /// Check the filter inputs before any store access.
    pub fn validate(&self) -> Result<()> {
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(WindsiteError::InvalidDateRange {
                    reason: format!("start {} is after end {}", from, to),
                });
            }
        }

        if let Some(radius_km) = self.radius_km {
            if !(radius_km > 0.0 && radius_km.is_finite()) {
                return Err(WindsiteError::InvalidSearchRadius { radius_km });
            }
        }

        if let Some(center) = self.coordinates {
            validation::validate_coordinates(center)?;
        }

        Ok(())
    }

    /// Whether a proximity restriction applies.
    pub fn has_proximity(&self) -> bool {
        self.coordinates.is_some()
    }

    /// Apply the non-geographic criteria to one project. The proximity
    /// restriction is applied separately by the caller because it needs
    /// distance computation across the candidate set.
    pub fn matches(&self, project: &Project) -> bool {
        if let Some(location) = &self.location {
            let needle = location.to_lowercase();
            if !project.project_name.to_lowercase().contains(&needle) {
                return false;
            }
        }

        if let Some(from) = self.date_from {
            if project.created_at < from {
                return false;
            }
        }

        if let Some(to) = self.date_to {
            if project.created_at > to {
                return false;
            }
        }

        if self.incomplete && !project.is_incomplete() {
            return false;
        }

        if let Some(archived) = self.archived {
            if project.metadata.archived != archived {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn project(name: &str) -> Project {
        Project::new(name)
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filters = SearchFilters::new();
        assert!(filters.matches(&project("alpha")));
    }

    #[test]
    fn test_location_is_case_insensitive_substring() {
        let filters = SearchFilters::new().with_location("TEXAS");
        assert!(filters.matches(&project("texas-wind-farm")));
        assert!(!filters.matches(&project("oklahoma-ridge")));
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let mut candidate = project("alpha");
        candidate.created_at = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();

        let filters = SearchFilters::new()
            .with_date_from(candidate.created_at)
            .with_date_to(candidate.created_at);
        assert!(filters.matches(&candidate));

        let filters = SearchFilters::new()
            .with_date_from(Utc.with_ymd_and_hms(2024, 6, 16, 0, 0, 0).unwrap());
        assert!(!filters.matches(&candidate));
    }

    #[test]
    fn test_incomplete_true_keeps_only_unfinished_projects() {
        let unfinished = project("alpha");
        let mut finished = project("beta");
        finished.terrain_results = Some(json!({"ok": true}));
        finished.layout_results = Some(json!({"ok": true}));
        finished.simulation_results = Some(json!({"ok": true}));
        finished.report_results = Some(json!({"ok": true}));

        let filters = SearchFilters::new().with_incomplete(true);
        assert!(filters.matches(&unfinished));
        assert!(!filters.matches(&finished));

        let filters = SearchFilters::new().with_incomplete(false);
        assert!(filters.matches(&finished));
    }

    #[test]
    fn test_archived_matches_exactly_with_missing_as_false() {
        let active = project("alpha");
        let mut archived = project("beta");
        archived.metadata.archived = true;

        let filters = SearchFilters::new().with_archived(true);
        assert!(!filters.matches(&active));
        assert!(filters.matches(&archived));

        let filters = SearchFilters::new().with_archived(false);
        assert!(filters.matches(&active));
        assert!(!filters.matches(&archived));
    }

    #[test]
    fn test_filters_combine_as_strict_and() {
        let mut candidate = project("texas-wind-farm");
        candidate.metadata.archived = true;

        let filters = SearchFilters::new()
            .with_location("texas")
            .with_incomplete(true)
            .with_archived(true);
        assert!(filters.matches(&candidate));

        let filters = SearchFilters::new()
            .with_location("texas")
            .with_archived(false);
        assert!(!filters.matches(&candidate));
    }

    #[test]
    fn test_validate_rejects_inverted_date_range() {
        let filters = SearchFilters::new()
            .with_date_from(Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap())
            .with_date_to(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        assert!(matches!(
            filters.validate(),
            Err(WindsiteError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_non_positive_radius() {
        let filters = SearchFilters::new().with_radius_km(0.0);
        assert!(matches!(
            filters.validate(),
            Err(WindsiteError::InvalidSearchRadius { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_range_center() {
        let filters = SearchFilters::new().with_coordinates(Coordinates::new(95.0, 0.0));
        assert!(matches!(
            filters.validate(),
            Err(WindsiteError::InvalidCoordinates { .. })
        ));
    }
}
