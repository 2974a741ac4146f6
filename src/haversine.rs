//! Haversine travel estimates (fallback when no routed lookup is available).
//!
//! Uses great-circle distance at an assumed average speed. Less accurate
//! than a routing service (ignores roads) but always available.

use crate::config::FALLBACK_SPEED_KMH;
use crate::error::ProviderError;
use crate::geometry::spherical_distance;
use crate::traits::{DistanceMatrixProvider, TravelLeg};
use crate::types::Coordinates;

#[derive(Debug, Clone)]
pub struct HaversineMatrix {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineMatrix {
    fn default() -> Self {
        Self {
            speed_kmh: FALLBACK_SPEED_KMH,
        }
    }
}

impl HaversineMatrix {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    pub fn estimate(&self, from: Coordinates, to: Coordinates) -> TravelLeg {
        let meters = spherical_distance(from, to);
        TravelLeg {
            distance_meters: meters,
            duration_seconds: self.meters_to_seconds(meters),
        }
    }

    fn meters_to_seconds(&self, meters: f64) -> f64 {
        let hours = meters / 1000.0 / self.speed_kmh;
        (hours * 3600.0).round()
    }
}

impl DistanceMatrixProvider for HaversineMatrix {
    fn batch(
        &self,
        origin: Coordinates,
        destinations: &[Coordinates],
    ) -> Result<Vec<Result<TravelLeg, ProviderError>>, ProviderError> {
        Ok(destinations
            .iter()
            .map(|destination| Ok(self.estimate(origin, *destination)))
            .collect())
    }
}
