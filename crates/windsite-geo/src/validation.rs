use windsite_core::error::{Result, WindsiteError};
use windsite_core::models::Coordinates;

/// Validate that coordinates are finite and within WGS84 bounds
pub fn validate_coordinates(coords: Coordinates) -> Result<()> {
    if !coords.latitude.is_finite() || !coords.longitude.is_finite() {
        return Err(WindsiteError::InvalidCoordinates {
            reason: format!(
                "Coordinates must be finite, got ({}, {})",
                coords.latitude, coords.longitude
            ),
        });
    }

    if coords.latitude < -90.0 || coords.latitude > 90.0 {
        return Err(WindsiteError::InvalidCoordinates {
            reason: format!("Latitude must be within [-90, 90], got {}", coords.latitude),
        });
    }

    if coords.longitude < -180.0 || coords.longitude > 180.0 {
        return Err(WindsiteError::InvalidCoordinates {
            reason: format!("Longitude must be within [-180, 180], got {}", coords.longitude),
        });
    }

    Ok(())
}

/// Validate a clustering/search radius: must be a positive finite number
pub fn validate_radius(radius_km: f64) -> Result<()> {
    if radius_km > 0.0 && radius_km.is_finite() {
        Ok(())
    } else {
        Err(WindsiteError::InvalidRadius { radius_km })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinates() {
        assert!(validate_coordinates(Coordinates::new(0.0, 0.0)).is_ok());
        assert!(validate_coordinates(Coordinates::new(90.0, 180.0)).is_ok());
        assert!(validate_coordinates(Coordinates::new(-90.0, -180.0)).is_ok());
        assert!(validate_coordinates(Coordinates::new(35.0, -101.0)).is_ok());
    }

    #[test]
    fn test_out_of_range_coordinates() {
        assert!(validate_coordinates(Coordinates::new(90.1, 0.0)).is_err());
        assert!(validate_coordinates(Coordinates::new(-90.1, 0.0)).is_err());
        assert!(validate_coordinates(Coordinates::new(0.0, 180.1)).is_err());
        assert!(validate_coordinates(Coordinates::new(0.0, -180.1)).is_err());
    }

    #[test]
    fn test_non_finite_coordinates() {
        assert!(validate_coordinates(Coordinates::new(f64::NAN, 0.0)).is_err());
        assert!(validate_coordinates(Coordinates::new(0.0, f64::INFINITY)).is_err());
        assert!(validate_coordinates(Coordinates::new(f64::NEG_INFINITY, 0.0)).is_err());
    }

    #[test]
    fn test_radius_bounds() {
        assert!(validate_radius(1.0).is_ok());
        assert!(validate_radius(0.001).is_ok());
        assert!(validate_radius(0.0).is_err());
        assert!(validate_radius(-1.0).is_err());
        assert!(validate_radius(f64::NAN).is_err());
        assert!(validate_radius(f64::INFINITY).is_err());
    }
}
