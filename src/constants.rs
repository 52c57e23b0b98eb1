use crate::coord::LngLat;

/// Fallback map center when live resolution fails: the middle of the USA.
pub const MIDDLE_OF_USA: LngLat = LngLat::new(-100.0, 40.0);
