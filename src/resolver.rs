//! Location resolver: one sensor attempt, then the fixed fallback.

use crate::constants::MIDDLE_OF_USA;
use crate::coord::LngLat;
use crate::providers::{LocationError, PositionOptions, PositionProvider};
use log::{info, warn};

/// Resolve the host's coordinates. Total: always produces a coordinate.
///
/// Makes a single request against `provider`, bounded by `opts.timeout`.
/// Any failure (capability absent, permission denied, sensor error, or an
/// elapsed wait) is absorbed and [`MIDDLE_OF_USA`] is returned instead.
pub async fn resolve<P: PositionProvider + ?Sized>(provider: &P, opts: &PositionOptions) -> LngLat {
    if !provider.is_available() {
        info!("no location capability; using fallback location: {MIDDLE_OF_USA}");
        return MIDDLE_OF_USA;
    }

    let result = match tokio::time::timeout(opts.timeout, provider.current_position(opts)).await {
        Ok(result) => result,
        Err(_elapsed) => Err(LocationError::Timeout),
    };

    match result {
        Ok(pos) => {
            info!(
                "sensor fix found - lat: {}, lon: {}",
                pos.latitude, pos.longitude
            );
            let coord = LngLat::new(pos.longitude, pos.latitude);
            if !coord.in_bounds() {
                warn!("sensor fix out of range: {coord}");
            }
            coord
        }
        Err(e) => {
            warn!("position request failed: {e}");
            info!("using fallback location: {MIDDLE_OF_USA}");
            MIDDLE_OF_USA
        }
    }
}
