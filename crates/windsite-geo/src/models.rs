use serde::{Deserialize, Serialize};
use windsite_core::models::{Coordinates, Project};

/// Coarse latitude/longitude box around a center point
///
/// Used only as a pre-filter before exact distance checks; boundary
/// containment is inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Check whether a point falls inside the box (boundaries included)
    pub fn contains(&self, point: Coordinates) -> bool {
        point.latitude >= self.min_lat
            && point.latitude <= self.max_lat
            && point.longitude >= self.min_lon
            && point.longitude <= self.max_lon
    }
}

/// A project found within a search radius, paired with its distance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProximityMatch {
    pub project: Project,
    /// Distance from the search center in kilometers
    pub distance_km: f64,
}

/// A cluster of projects sitting within a shared radius of an anchor
///
/// Derived on demand, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Arithmetic mean of the member coordinates
    pub center_coordinates: Coordinates,
    pub projects: Vec<Project>,
    pub count: usize,
    /// The clustering threshold that produced this group, in kilometers
    pub radius_km: f64,
    /// Mean distance from each member to the group center, in kilometers
    pub average_distance_km: f64,
}

impl DuplicateGroup {
    /// Project names of the group members, in member order
    pub fn member_names(&self) -> Vec<&str> {
        self.projects.iter().map(|p| p.project_name.as_str()).collect()
    }

    /// Check whether a project name belongs to this group
    pub fn contains_name(&self, name: &str) -> bool {
        self.projects.iter().any(|p| p.project_name == name)
    }
}
