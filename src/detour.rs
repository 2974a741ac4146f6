//! Detour cost estimation for candidates near a planned route.
//!
//! The cost is a flat heuristic (minutes per kilometer of offset from the
//! nearest route step), not a routed estimate.

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::geometry::{point_to_segment_distance, spherical_distance};
use crate::types::{Coordinates, Hotel, Place, Route, RoutePlace, RouteStep};

/// A candidate accepted into a search corridor.
#[derive(Debug, Clone, PartialEq)]
pub struct DetourMatch {
    pub place: Place,
    pub detour_cost: u32,
    /// Meters from the nearest route step (or from the search center).
    pub distance_from_route: f64,
    /// Index of the matched route step.
    pub order: usize,
}

impl DetourMatch {
    pub fn to_route_place(&self) -> RoutePlace {
        RoutePlace {
            place_id: self.place.id.clone(),
            order: self.order,
            detour_cost: self.detour_cost,
        }
    }
}

/// Where to look for candidates.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPlan {
    /// Within `radius_m` of any step of a route.
    Corridor { steps: Vec<RouteStep>, radius_m: f64 },
    /// Within `radius_m` of a single point.
    Around { center: Coordinates, radius_m: f64 },
}

impl SearchPlan {
    /// Plan a search along `route`.
    ///
    /// A closed loop has no useful corridor, so the search is centered on the
    /// last visited place, or the hotel when nothing was visited yet.
    pub fn for_route(
        route: &Route,
        last_visited: Option<Coordinates>,
        hotel: Option<&Hotel>,
        config: &EngineConfig,
    ) -> Result<Self, EngineError> {
        let radius_m = config.along_route_radius_m;

        if route.is_closed_loop(config.coincident_tolerance_m) {
            let center = match (last_visited, hotel) {
                (Some(center), _) => center,
                (None, Some(hotel)) => hotel
                    .coordinates
                    .ok_or_else(|| EngineError::AnchorWithoutCoordinates(hotel.name.clone()))?,
                (None, None) => route.start,
            };
            debug!(route = %route.id, "closed loop route, searching around a point");
            return Ok(SearchPlan::Around { center, radius_m });
        }

        let steps = if route.steps.is_empty() {
            vec![RouteStep::new(route.start, route.end)]
        } else {
            route.steps.clone()
        };

        Ok(SearchPlan::Corridor { steps, radius_m })
    }

    /// General suggestions near a single point.
    pub fn around(center: Coordinates, config: &EngineConfig) -> Self {
        SearchPlan::Around {
            center,
            radius_m: config.general_radius_m,
        }
    }

    pub fn radius_m(&self) -> f64 {
        match self {
            SearchPlan::Corridor { radius_m, .. } | SearchPlan::Around { radius_m, .. } => *radius_m,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetourEstimator {
    minutes_per_km: f64,
}

impl Default for DetourEstimator {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl DetourEstimator {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            minutes_per_km: config.detour_minutes_per_km,
        }
    }

    /// Heuristic detour minutes for a perpendicular offset.
    pub fn detour_minutes(&self, distance_m: f64) -> u32 {
        (distance_m / 1000.0 * self.minutes_per_km).round().max(0.0) as u32
    }

    /// Score one candidate against a route's steps.
    ///
    /// Returns `None` for places without coordinates, for an empty step list,
    /// or when the nearest step is not strictly within `radius_m`.
    pub fn estimate(&self, place: &Place, steps: &[RouteStep], radius_m: f64) -> Option<DetourMatch> {
        let location = place.location()?;
        let (order, distance) = nearest_step(location, steps)?;

        if distance >= radius_m {
            return None;
        }

        Some(DetourMatch {
            place: place.clone(),
            detour_cost: self.detour_minutes(distance),
            distance_from_route: distance,
            order,
        })
    }

    /// Accepted candidates ordered by route position; ties keep input order.
    pub fn along_route(&self, candidates: &[Place], steps: &[RouteStep], radius_m: f64) -> Vec<DetourMatch> {
        let mut matches: Vec<DetourMatch> = candidates
            .iter()
            .filter_map(|place| self.estimate(place, steps, radius_m))
            .collect();
        matches.sort_by_key(|found| found.order);
        matches
    }

    pub fn score(&self, plan: &SearchPlan, candidates: &[Place]) -> Vec<DetourMatch> {
        let matches = match plan {
            SearchPlan::Corridor { steps, radius_m } => self.along_route(candidates, steps, *radius_m),
            SearchPlan::Around { center, radius_m } => candidates
                .iter()
                .filter_map(|place| {
                    let distance = spherical_distance(*center, place.location()?);
                    (distance < *radius_m).then(|| DetourMatch {
                        place: place.clone(),
                        detour_cost: self.detour_minutes(distance),
                        distance_from_route: distance,
                        order: 0,
                    })
                })
                .collect(),
        };

        debug!(
            candidates = candidates.len(),
            accepted = matches.len(),
            "scored detour candidates"
        );
        matches
    }
}

/// Index of and distance to the step nearest `point`; first wins on ties.
pub fn nearest_step(point: Coordinates, steps: &[RouteStep]) -> Option<(usize, f64)> {
    steps
        .iter()
        .enumerate()
        .map(|(index, step)| (index, point_to_segment_distance(point, step.start, step.end)))
        .fold(None, |best, (index, distance)| match best {
            Some((_, best_distance)) if best_distance <= distance => best,
            _ => Some((index, distance)),
        })
}
