//! Engine tunables.

use serde::Deserialize;

use crate::error::ConfigError;

/// Corridor for "along an already-chosen route" searches, meters.
pub const ALONG_ROUTE_RADIUS_M: f64 = 2_000.0;

/// Corridor for general "near the hotel / last place" suggestions, meters.
pub const GENERAL_RADIUS_M: f64 = 5_000.0;

/// Average driving speed used when no routed estimate is available.
pub const FALLBACK_SPEED_KMH: f64 = 30.0;

/// Detour minutes charged per kilometer of offset from the route.
pub const DETOUR_MINUTES_PER_KM: f64 = 2.0;

/// Destinations per distance-matrix request.
pub const MATRIX_BATCH_SIZE: usize = 25;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub along_route_radius_m: f64,
    pub general_radius_m: f64,
    pub fallback_speed_kmh: f64,
    pub detour_minutes_per_km: f64,
    /// Day count when the trip has no date range.
    pub default_target_days: usize,
    /// Bounds for the derived per-day capacity.
    pub min_places_per_day: usize,
    pub max_places_per_day: usize,
    pub matrix_batch_size: usize,
    /// Route start/end closer than this are treated as one point.
    pub coincident_tolerance_m: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            along_route_radius_m: ALONG_ROUTE_RADIUS_M,
            general_radius_m: GENERAL_RADIUS_M,
            fallback_speed_kmh: FALLBACK_SPEED_KMH,
            detour_minutes_per_km: DETOUR_MINUTES_PER_KM,
            default_target_days: 3,
            min_places_per_day: 5,
            max_places_per_day: 8,
            matrix_batch_size: MATRIX_BATCH_SIZE,
            coincident_tolerance_m: 1.0,
        }
    }
}

impl EngineConfig {
    /// Parse overrides from JSON; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("alongRouteRadiusM", self.along_route_radius_m),
            ("generalRadiusM", self.general_radius_m),
            ("fallbackSpeedKmh", self.fallback_speed_kmh),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::invalid(key, "must be a positive number"));
            }
        }
        if !(self.detour_minutes_per_km.is_finite() && self.detour_minutes_per_km >= 0.0) {
            return Err(ConfigError::invalid("detourMinutesPerKm", "must not be negative"));
        }
        if !(self.coincident_tolerance_m.is_finite() && self.coincident_tolerance_m >= 0.0) {
            return Err(ConfigError::invalid("coincidentToleranceM", "must not be negative"));
        }
        if self.default_target_days == 0 {
            return Err(ConfigError::invalid("defaultTargetDays", "must be at least 1"));
        }
        if self.matrix_batch_size == 0 {
            return Err(ConfigError::invalid("matrixBatchSize", "must be at least 1"));
        }
        if self.min_places_per_day == 0 || self.min_places_per_day > self.max_places_per_day {
            return Err(ConfigError::invalid(
                "minPlacesPerDay",
                "must be at least 1 and not above maxPlacesPerDay",
            ));
        }
        Ok(())
    }
}
