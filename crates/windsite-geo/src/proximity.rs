use crate::models::{BoundingBox, DuplicateGroup, ProximityMatch};
use crate::validation::{validate_coordinates, validate_radius};
use windsite_core::error::Result;
use windsite_core::models::{Coordinates, Project};

/// Mean Earth radius of the spherical approximation, in kilometers
pub const MEAN_EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers
///
/// Uses the Haversine formula on a spherical Earth. Bit-identical inputs
/// return exactly zero, not merely a value close to zero.
pub fn distance_km(a: Coordinates, b: Coordinates) -> Result<f64> {
    validate_coordinates(a)?;
    validate_coordinates(b)?;

    if a.latitude == b.latitude && a.longitude == b.longitude {
        return Ok(0.0);
    }

    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push h just past 1 for near-antipodal points
    let h = h.min(1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    Ok(MEAN_EARTH_RADIUS_KM * c)
}

/// Find all projects within `radius_km` of a center point
///
/// Projects without coordinates are skipped, not errors. Results are sorted
/// ascending by distance; ties keep input order.
pub fn projects_within_radius(
    projects: &[Project],
    center: Coordinates,
    radius_km: f64,
) -> Result<Vec<ProximityMatch>> {
    validate_coordinates(center)?;
    validate_radius(radius_km)?;

    let mut matches = Vec::new();
    for project in projects {
        let coords = match project.coordinates {
            Some(c) => c,
            None => continue,
        };

        let distance = distance_km(coords, center)?;
        if distance <= radius_km {
            matches.push(ProximityMatch { project: project.clone(), distance_km: distance });
        }
    }

    matches.sort_by(|a, b| {
        a.distance_km.partial_cmp(&b.distance_km).unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(matches)
}

/// Cluster projects into duplicate groups by direct distance to an anchor
///
/// Iterates projects in order; each unassigned project gathers every other
/// unassigned project within `radius_km` of it, forming a group when at least
/// two members result. Distance is measured to the anchor, not chained
/// transitively, so a chain A-B-C where A and C are far apart groups around
/// whichever anchor comes first. Projects without coordinates never appear in
/// any group. Groups are sorted by descending member count; first-formed wins
/// ties.
pub fn group_duplicates(projects: &[Project], radius_km: f64) -> Result<Vec<DuplicateGroup>> {
    validate_radius(radius_km)?;

    let mut assigned = vec![false; projects.len()];
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    for anchor_idx in 0..projects.len() {
        if assigned[anchor_idx] {
            continue;
        }

        let anchor_coords = match projects[anchor_idx].coordinates {
            Some(c) => c,
            None => continue,
        };

        let mut member_indices = vec![anchor_idx];
        for other_idx in 0..projects.len() {
            if other_idx == anchor_idx || assigned[other_idx] {
                continue;
            }

            let other_coords = match projects[other_idx].coordinates {
                Some(c) => c,
                None => continue,
            };

            if distance_km(anchor_coords, other_coords)? <= radius_km {
                member_indices.push(other_idx);
            }
        }

        // A lone anchor stays unassigned and may still join a later group
        if member_indices.len() < 2 {
            continue;
        }

        for &idx in &member_indices {
            assigned[idx] = true;
        }

        let members: Vec<Project> =
            member_indices.iter().map(|&idx| projects[idx].clone()).collect();
        groups.push(build_group(members, radius_km)?);
    }

    groups.sort_by(|a, b| b.count.cmp(&a.count));

    Ok(groups)
}

fn build_group(projects: Vec<Project>, radius_km: f64) -> Result<DuplicateGroup> {
    let coords: Vec<Coordinates> = projects.iter().filter_map(|p| p.coordinates).collect();
    let count = projects.len();

    let center = Coordinates::new(
        coords.iter().map(|c| c.latitude).sum::<f64>() / coords.len() as f64,
        coords.iter().map(|c| c.longitude).sum::<f64>() / coords.len() as f64,
    );

    let mut total = 0.0;
    for c in &coords {
        total += distance_km(*c, center)?;
    }

    Ok(DuplicateGroup {
        center_coordinates: center,
        projects,
        count,
        radius_km,
        average_distance_km: total / count as f64,
    })
}

/// Coarse latitude/longitude box covering a radius around a center
///
/// Degree deltas are approximated from the radius and clamped to valid
/// ranges. Only a pre-filter; exact inclusion must use [`distance_km`].
pub fn bounding_box(center: Coordinates, radius_km: f64) -> Result<BoundingBox> {
    validate_coordinates(center)?;
    validate_radius(radius_km)?;

    let km_per_degree_lat = std::f64::consts::PI * MEAN_EARTH_RADIUS_KM / 180.0;
    let lat_delta = radius_km / km_per_degree_lat;

    // Longitude degrees shrink toward the poles; at the poles the box spans all longitudes
    let cos_lat = center.latitude.to_radians().cos();
    let lon_delta = if cos_lat.abs() < 1e-10 {
        360.0
    } else {
        radius_km / (km_per_degree_lat * cos_lat.abs())
    };

    Ok(BoundingBox {
        min_lat: (center.latitude - lat_delta).max(-90.0),
        max_lat: (center.latitude + lat_delta).min(90.0),
        min_lon: (center.longitude - lon_delta).max(-180.0),
        max_lon: (center.longitude + lon_delta).min(180.0),
    })
}

/// Inclusive containment test; false (not an error) without coordinates
pub fn within_bounding_box(project: &Project, bbox: &BoundingBox) -> bool {
    match project.coordinates {
        Some(coords) => bbox.contains(coords),
        None => false,
    }
}
