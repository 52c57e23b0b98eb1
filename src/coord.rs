use serde::{Deserialize, Serialize};
use std::fmt;

/// A geographic coordinate as an ordered (longitude, latitude) pair.
///
/// Longitude comes first: the shape map renderers consume. Serializes as a
/// two-element JSON array `[lon, lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat(pub f64, pub f64);

impl LngLat {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self(lon, lat)
    }

    pub fn lon(&self) -> f64 {
        self.0
    }

    pub fn lat(&self) -> f64 {
        self.1
    }

    /// Whether the pair lies within [-180, 180] x [-90, 90].
    pub fn in_bounds(&self) -> bool {
        (-180.0..=180.0).contains(&self.0) && (-90.0..=90.0).contains(&self.1)
    }
}

impl fmt::Display for LngLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lon_comes_first() {
        let c = LngLat::new(-100.0, 40.0);
        assert_eq!(c.lon(), -100.0);
        assert_eq!(c.lat(), 40.0);
    }

    #[test]
    fn serializes_as_lon_lat_array() {
        let c = LngLat::new(-100.0, 40.0);
        assert_eq!(serde_json::to_string(&c).unwrap(), "[-100.0,40.0]");
    }

    #[test]
    fn deserializes_from_array() {
        let c: LngLat = serde_json::from_str("[18.0686, 59.3293]").unwrap();
        assert_eq!(c, LngLat::new(18.0686, 59.3293));
    }

    #[test]
    fn bounds_check() {
        assert!(LngLat::new(-100.0, 40.0).in_bounds());
        assert!(LngLat::new(180.0, -90.0).in_bounds());
        assert!(!LngLat::new(-181.0, 40.0).in_bounds());
        assert!(!LngLat::new(0.0, 90.5).in_bounds());
    }
}
