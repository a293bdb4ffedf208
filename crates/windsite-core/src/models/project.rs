use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque stable identifier for a project. Assigned once at creation,
/// never reused, and preserved across renames.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub String);

impl ProjectId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// WGS84 point location of a project site, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in [-90, 90]
    pub latitude: f64,

    /// Longitude in [-180, 180]
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Analysis progress state. `InProgress` blocks destructive operations
/// (delete, merge-away); rename remains allowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ProjectStatus::NotStarted => "not_started",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Completed => "completed",
        };
        write!(f, "{}", label)
    }
}

/// Free-form project metadata with reserved lifecycle flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Archived projects are excluded from the active listing.
    #[serde(default)]
    pub archived: bool,

    /// When the project was archived.
    #[serde(default)]
    pub archived_at: Option<DateTime<Utc>>,

    /// When the project was imported from an external payload.
    #[serde(default)]
    pub imported_at: Option<DateTime<Utc>>,

    /// Everything else callers stash on a project.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectMetadata {
    /// Key-level merge of incoming metadata entries, mirroring a JSON
    /// spread: only keys present in `entries` change.
    pub fn apply(&mut self, entries: &Map<String, Value>) {
        for (key, value) in entries {
            match key.as_str() {
                "archived" => self.archived = value.as_bool().unwrap_or(self.archived),
                "archived_at" => self.archived_at = parse_timestamp(value),
                "imported_at" => self.imported_at = parse_timestamp(value),
                _ => {
                    self.extra.insert(key.clone(), value.clone());
                }
            }
        }
    }

    /// Flatten into plain JSON entries, the inverse of `apply`. Used when
    /// copying a project's metadata wholesale (rename, merge).
    pub fn to_entries(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    value.as_str().and_then(|raw| raw.parse::<DateTime<Utc>>().ok())
}

/// A named wind-farm site analysis with staged results.
///
/// The normalized `project_name` doubles as the storage key and is unique
/// across all non-deleted projects. Stage payloads are opaque; their
/// presence, not their content, drives completion tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: ProjectId,

    /// Normalized, human-chosen slug (lowercase, hyphen-separated).
    pub project_name: String,

    /// Site location, when known.
    pub coordinates: Option<Coordinates>,

    pub created_at: DateTime<Utc>,

    /// Advances on every mutation.
    pub updated_at: DateTime<Utc>,

    /// Stage payloads or references, in pipeline order.
    pub terrain_results: Option<Value>,
    pub layout_results: Option<Value>,
    pub simulation_results: Option<Value>,
    pub report_results: Option<Value>,

    #[serde(default)]
    pub status: ProjectStatus,

    #[serde(default)]
    pub metadata: ProjectMetadata,
}

impl Project {
    /// Create an empty project shell with a fresh id and timestamps.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            project_id: ProjectId::generate(),
            project_name: name.into(),
            coordinates: None,
            created_at: now,
            updated_at: now,
            terrain_results: None,
            layout_results: None,
            simulation_results: None,
            report_results: None,
            status: ProjectStatus::default(),
            metadata: ProjectMetadata::default(),
        }
    }

    /// Stage payloads in fixed pipeline order:
    /// terrain, layout, simulation, report.
    pub fn stage_results(&self) -> [&Option<Value>; 4] {
        [
            &self.terrain_results,
            &self.layout_results,
            &self.simulation_results,
            &self.report_results,
        ]
    }

    /// 25% per present stage result.
    pub fn completion_percentage(&self) -> u8 {
        25 * self.stage_results().iter().filter(|stage| stage.is_some()).count() as u8
    }

    /// True when at least one of the four stage results is missing.
    pub fn is_incomplete(&self) -> bool {
        self.stage_results().iter().any(|stage| stage.is_none())
    }

    /// Human progress label; the furthest completed stage wins.
    pub fn stage_label(&self) -> &'static str {
        if self.report_results.is_some() {
            "Complete"
        } else if self.simulation_results.is_some() {
            "Simulation Complete"
        } else if self.layout_results.is_some() {
            "Layout Complete"
        } else if self.terrain_results.is_some() {
            "Terrain Complete"
        } else {
            "Not Started"
        }
    }

    /// Dashboard location string: `"{lat:.4}, {lon:.4}"` or `"Unknown"`.
    pub fn location_label(&self) -> String {
        match &self.coordinates {
            Some(point) => format!("{:.4}, {:.4}", point.latitude, point.longitude),
            None => "Unknown".to_string(),
        }
    }

    /// Apply a partial update. Top-level fields present in the patch
    /// overwrite; metadata entries merge key-by-key. A patch cannot clear
    /// a stage result or the coordinates.
    pub fn apply_patch(&mut self, patch: &ProjectPatch) {
        if let Some(id) = &patch.project_id {
            self.project_id = id.clone();
        }
        if let Some(point) = patch.coordinates {
            self.coordinates = Some(point);
        }
        if let Some(created_at) = patch.created_at {
            self.created_at = created_at;
        }
        if let Some(payload) = &patch.terrain_results {
            self.terrain_results = Some(payload.clone());
        }
        if let Some(payload) = &patch.layout_results {
            self.layout_results = Some(payload.clone());
        }
        if let Some(payload) = &patch.simulation_results {
            self.simulation_results = Some(payload.clone());
        }
        if let Some(payload) = &patch.report_results {
            self.report_results = Some(payload.clone());
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(entries) = &patch.metadata {
            self.metadata.apply(entries);
        }
    }
}

/// Partial project payload for merge-on-save.
///
/// `Some` fields overwrite the stored record; `metadata` entries merge
/// key-by-key like a JSON spread.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectPatch {
    pub project_id: Option<ProjectId>,
    pub coordinates: Option<Coordinates>,
    pub created_at: Option<DateTime<Utc>>,
    pub terrain_results: Option<Value>,
    pub layout_results: Option<Value>,
    pub simulation_results: Option<Value>,
    pub report_results: Option<Value>,
    pub status: Option<ProjectStatus>,
    pub metadata: Option<Map<String, Value>>,
}

impl ProjectPatch {
    /// Create an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Full copy of an existing project, used by rename and merge to
    /// re-save the record under another name.
    pub fn from_project(project: &Project) -> Self {
        Self {
            project_id: Some(project.project_id.clone()),
            coordinates: project.coordinates,
            created_at: Some(project.created_at),
            terrain_results: project.terrain_results.clone(),
            layout_results: project.layout_results.clone(),
            simulation_results: project.simulation_results.clone(),
            report_results: project.report_results.clone(),
            status: Some(project.status),
            metadata: Some(project.metadata.to_entries()),
        }
    }

    /// Set the site coordinates
    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    /// Set the analysis status
    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the terrain stage payload
    pub fn with_terrain_results(mut self, payload: Value) -> Self {
        self.terrain_results = Some(payload);
        self
    }

    /// Set the layout stage payload
    pub fn with_layout_results(mut self, payload: Value) -> Self {
        self.layout_results = Some(payload);
        self
    }

    /// Set the simulation stage payload
    pub fn with_simulation_results(mut self, payload: Value) -> Self {
        self.simulation_results = Some(payload);
        self
    }

    /// Set the report stage payload
    pub fn with_report_results(mut self, payload: Value) -> Self {
        self.report_results = Some(payload);
        self
    }

    /// Add a single metadata entry
    pub fn with_metadata_entry(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.get_or_insert_with(Map::new).insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_completion_percentage_per_stage() {
        let mut project = Project::new("panhandle-ridge");
        assert_eq!(project.completion_percentage(), 0);
        assert_eq!(project.stage_label(), "Not Started");

        project.terrain_results = Some(json!({"cells": 1024}));
        assert_eq!(project.completion_percentage(), 25);
        assert_eq!(project.stage_label(), "Terrain Complete");

        project.layout_results = Some(json!({"turbines": 48}));
        assert_eq!(project.completion_percentage(), 50);
        assert_eq!(project.stage_label(), "Layout Complete");

        project.simulation_results = Some(json!({"aep_gwh": 412.0}));
        assert_eq!(project.completion_percentage(), 75);
        assert_eq!(project.stage_label(), "Simulation Complete");

        project.report_results = Some(json!({"uri": "s3://reports/pr.pdf"}));
        assert_eq!(project.completion_percentage(), 100);
        assert_eq!(project.stage_label(), "Complete");
        assert!(!project.is_incomplete());
    }

    #[test]
    fn test_stage_label_uses_furthest_stage() {
        let mut project = Project::new("gap-site");
        project.simulation_results = Some(json!({}));
        // Terrain and layout missing, but the furthest stage present wins.
        assert_eq!(project.stage_label(), "Simulation Complete");
        assert_eq!(project.completion_percentage(), 25);
        assert!(project.is_incomplete());
    }

    #[test]
    fn test_location_label_formats_four_decimals() {
        let mut project = Project::new("texas-wind-farm-1");
        assert_eq!(project.location_label(), "Unknown");

        project.coordinates = Some(Coordinates::new(35.0, -101.0));
        assert_eq!(project.location_label(), "35.0000, -101.0000");
    }

    #[test]
    fn test_patch_overwrites_top_level_and_merges_metadata() {
        let mut project = Project::new("alpha");
        project.terrain_results = Some(json!({"v": 1}));
        project.metadata.extra.insert("region".to_string(), json!("ercot"));

        let patch = ProjectPatch::new()
            .with_terrain_results(json!({"v": 2}))
            .with_status(ProjectStatus::InProgress)
            .with_metadata_entry("owner", json!("ops"));
        project.apply_patch(&patch);

        assert_eq!(project.terrain_results, Some(json!({"v": 2})));
        assert_eq!(project.status, ProjectStatus::InProgress);
        // Metadata merge keeps existing entries and adds the new one.
        assert_eq!(project.metadata.extra["region"], json!("ercot"));
        assert_eq!(project.metadata.extra["owner"], json!("ops"));
    }

    #[test]
    fn test_patch_reserved_metadata_keys() {
        let mut project = Project::new("alpha");
        let patch = ProjectPatch::new().with_metadata_entry("archived", json!(true));
        project.apply_patch(&patch);
        assert!(project.metadata.archived);
        assert!(project.metadata.extra.is_empty());
    }

    #[test]
    fn test_from_project_preserves_identity_and_stages() {
        let mut project = Project::new("old-name");
        project.coordinates = Some(Coordinates::new(35.0, -101.0));
        project.layout_results = Some(json!({"turbines": 12}));
        project.metadata.archived = true;

        let copy = ProjectPatch::from_project(&project);
        assert_eq!(copy.project_id, Some(project.project_id.clone()));
        assert_eq!(copy.created_at, Some(project.created_at));
        assert_eq!(copy.layout_results, Some(json!({"turbines": 12})));
        let entries = copy.metadata.unwrap();
        assert_eq!(entries["archived"], json!(true));
    }

    #[test]
    fn test_metadata_roundtrip_through_entries() {
        let mut metadata = ProjectMetadata::default();
        metadata.archived = true;
        metadata.archived_at = Some(Utc::now());
        metadata.extra.insert("note".to_string(), json!("imported from legacy tool"));

        let mut rebuilt = ProjectMetadata::default();
        rebuilt.apply(&metadata.to_entries());

        assert!(rebuilt.archived);
        assert!(rebuilt.archived_at.is_some());
        assert_eq!(rebuilt.extra["note"], json!("imported from legacy tool"));
    }

    #[test]
    fn test_status_serde_snake_case() {
        let status: ProjectStatus = serde_json::from_value(json!("in_progress")).unwrap();
        assert_eq!(status, ProjectStatus::InProgress);
        assert_eq!(serde_json::to_value(ProjectStatus::NotStarted).unwrap(), json!("not_started"));
    }
}
