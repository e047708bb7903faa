//! Location model for geographic coordinates and delivery stops

use serde::{Deserialize, Serialize};

/// Geographic coordinates
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinate {
    /// Placeholder position used for stops that could not be geocoded.
    ///
    /// This is a real point in the Gulf of Guinea, so distances computed
    /// against it are numerically valid but physically meaningless.
    pub const UNRESOLVED: Coordinate = Coordinate {
        latitude: 0.0,
        longitude: 0.0,
    };

    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// Whether both components are finite and inside the valid degree ranges
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

/// A named delivery stop and its resolved position, if any
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Name as entered by the caller
    pub name: String,
    /// `None` until geocoding found the place
    pub coordinate: Option<Coordinate>,
}

impl Location {
    /// Create an unresolved location
    #[must_use]
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            coordinate: None,
        }
    }

    /// Create a location with known coordinates
    #[must_use]
    pub fn resolved(name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            name: name.into(),
            coordinate: Some(coordinate),
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.coordinate.is_some()
    }

    /// Position fed to the distance matrix.
    ///
    /// Unresolved locations fall back to [`Coordinate::UNRESOLVED`] so the
    /// matrix keeps one row per input location.
    #[must_use]
    pub fn position(&self) -> Coordinate {
        self.coordinate.unwrap_or(Coordinate::UNRESOLVED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coordinates() {
        let coordinate = Coordinate::new(18.457_512, 73.858_049);
        assert_eq!(coordinate.format_coordinates(), "18.4575, 73.8580");
    }

    #[test]
    fn test_unresolved_position_is_placeholder() {
        let location = Location::unresolved("Atlantis");
        assert!(!location.is_resolved());
        assert_eq!(location.position(), Coordinate::UNRESOLVED);
    }

    #[test]
    fn test_resolved_origin_is_still_resolved() {
        let location = Location::resolved("Null Island", Coordinate::new(0.0, 0.0));
        assert!(location.is_resolved());
        assert_eq!(location.position(), Coordinate::new(0.0, 0.0));
    }

    #[test]
    fn test_coordinate_validity() {
        assert!(Coordinate::new(18.5, 73.9).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, f64::NAN).is_valid());
    }
}
