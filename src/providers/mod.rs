pub mod ip;

#[cfg(target_os = "macos")]
pub mod corelocation;

#[cfg(not(target_os = "macos"))]
pub mod corelocation {
    //! Portable stub: the sensor capability only exists on macOS.

    use super::{LocationError, Position, PositionOptions, PositionProvider};
    use async_trait::async_trait;

    pub struct CoreLocationProvider;

    #[async_trait]
    impl PositionProvider for CoreLocationProvider {
        fn is_available(&self) -> bool {
            false
        }

        async fn current_position(
            &self,
            _opts: &PositionOptions,
        ) -> Result<Position, LocationError> {
            Err(LocationError::Unavailable)
        }
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt;
use std::time::Duration;

/// Configuration for a single position request.
#[derive(Debug, Clone)]
pub struct PositionOptions {
    /// Maximum wait before giving up.
    pub timeout: Duration,
    /// Prefer high-accuracy sensors when present.
    pub high_accuracy: bool,
    /// Accept a cached fix no older than this instead of forcing a fresh reading.
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(10_000),
            high_accuracy: true,
            maximum_age: Duration::from_millis(300_000),
        }
    }
}

/// A position fix as reported by the sensor.
#[derive(Debug, Clone, Copy)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_m: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// Why a position request produced no fix. The resolver treats every
/// variant the same way: log and substitute the default coordinate.
#[derive(Debug)]
pub enum LocationError {
    /// The capability does not exist in this environment.
    Unavailable,
    PermissionDenied,
    Timeout,
    Sensor(String),
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "location capability not available"),
            Self::PermissionDenied => write!(f, "location permission denied"),
            Self::Timeout => write!(f, "timed out waiting for a position fix"),
            Self::Sensor(reason) => write!(f, "sensor error: {reason}"),
        }
    }
}

impl Error for LocationError {}

/// The injectable host capability for obtaining the device's position.
#[async_trait]
pub trait PositionProvider: Send + Sync {
    /// Whether the capability exists in the current environment at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Request the current position once. Implementations should honor
    /// `opts.timeout`, but the resolver bounds the wait regardless.
    async fn current_position(&self, opts: &PositionOptions)
        -> Result<Position, LocationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_match_contract() {
        let opts = PositionOptions::default();
        assert_eq!(opts.timeout, Duration::from_millis(10_000));
        assert!(opts.high_accuracy);
        assert_eq!(opts.maximum_age, Duration::from_millis(300_000));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            LocationError::Unavailable.to_string(),
            "location capability not available"
        );
        assert_eq!(
            LocationError::Sensor("no fix".into()).to_string(),
            "sensor error: no fix"
        );
    }
}
