//! Contracts for the external services the engine is fed from.
//!
//! The engine itself never performs I/O; these traits describe what a
//! caller-side adapter must provide. Implementations must be `Send + Sync`
//! so independent requests can be fanned out.

use crate::error::ProviderError;
use crate::types::Coordinates;

/// A routed drive between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct Directions {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    /// Encoded polyline of the overview geometry.
    pub polyline: String,
    pub steps: Vec<crate::types::RouteStep>,
}

/// A place returned by a search.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceCandidate {
    pub place_id: String,
    pub name: String,
    pub coordinates: Coordinates,
    pub rating: Option<f32>,
    pub types: Vec<String>,
}

/// Travel distance and time to one destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelLeg {
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

pub trait DirectionsProvider: Send + Sync {
    fn route(&self, start: Coordinates, end: Coordinates) -> Result<Directions, ProviderError>;
}

pub trait PlacesProvider: Send + Sync {
    fn nearby_search(
        &self,
        location: Coordinates,
        radius_meters: f64,
        place_type: Option<&str>,
    ) -> Result<Vec<PlaceCandidate>, ProviderError>;

    /// Free-text lookup; callers treat the first hit as the best match.
    fn text_search(
        &self,
        query: &str,
        location_bias: Option<Coordinates>,
    ) -> Result<Vec<PlaceCandidate>, ProviderError>;
}

/// One-to-many travel lookups.
///
/// The outer error fails the whole batch; inner errors fail single
/// destinations. The inner vector is indexed like `destinations`.
pub trait DistanceMatrixProvider: Send + Sync {
    fn batch(
        &self,
        origin: Coordinates,
        destinations: &[Coordinates],
    ) -> Result<Vec<Result<TravelLeg, ProviderError>>, ProviderError>;
}
