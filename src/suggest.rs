//! Caller-side glue between the providers and the engine.
//!
//! Every function here degrades instead of failing: provider errors become
//! a [`ProviderStatus`] next to whatever partial result is available.
//! Independent requests are fanned out on the rayon pool.

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::cancel::CancellationToken;
use crate::config::EngineConfig;
use crate::detour::{DetourEstimator, DetourMatch, SearchPlan};
use crate::error::ProviderError;
use crate::geometry::spherical_distance;
use crate::haversine::HaversineMatrix;
use crate::polyline::Polyline;
use crate::traits::{DirectionsProvider, DistanceMatrixProvider, PlaceCandidate, PlacesProvider, TravelLeg};
use crate::types::{Coordinates, Place, Route};

/// Outcome of a provider interaction as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderStatus {
    Ok,
    Unavailable,
    Denied,
    QuotaExceeded,
    NoRoute,
    Cancelled,
    Failed,
}

impl From<&ProviderError> for ProviderStatus {
    fn from(err: &ProviderError) -> Self {
        match err {
            ProviderError::Unavailable => ProviderStatus::Unavailable,
            ProviderError::Denied => ProviderStatus::Denied,
            ProviderError::QuotaExceeded => ProviderStatus::QuotaExceeded,
            ProviderError::NoRoute => ProviderStatus::NoRoute,
            ProviderError::Cancelled => ProviderStatus::Cancelled,
            ProviderError::Transport(_) | ProviderError::InvalidResponse(_) => ProviderStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub value: T,
    pub status: ProviderStatus,
}

impl<T> Fetched<T> {
    fn ok(value: T) -> Self {
        Self {
            value,
            status: ProviderStatus::Ok,
        }
    }

    fn degraded(value: T, err: &ProviderError) -> Self {
        Self {
            value,
            status: err.into(),
        }
    }
}

/// Fetch directions and build a new [`Route`] with no places attached.
pub fn fetch_route<D: DirectionsProvider>(
    provider: &D,
    id: &str,
    start: Coordinates,
    end: Coordinates,
    cancel: &CancellationToken,
) -> Fetched<Option<Route>> {
    let directions = match cancel.check().and_then(|_| provider.route(start, end)) {
        Ok(directions) => directions,
        Err(err) => {
            warn!(route = id, error = %err, "directions lookup failed");
            return Fetched::degraded(None, &err);
        }
    };

    let steps = if directions.steps.is_empty() {
        match Polyline::decode(&directions.polyline) {
            Ok(polyline) => polyline.steps(),
            Err(err) => {
                warn!(route = id, error = %err, "route has no steps and an unreadable polyline");
                Vec::new()
            }
        }
    } else {
        directions.steps
    };

    Fetched::ok(Some(Route {
        id: id.to_string(),
        start,
        end,
        steps,
        polyline: directions.polyline,
        places: Vec::new(),
    }))
}

/// Where a travel estimate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateSource {
    Routed,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelEstimate {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub source: EstimateSource,
}

impl TravelEstimate {
    fn routed(leg: TravelLeg) -> Self {
        Self {
            distance_meters: leg.distance_meters,
            duration_seconds: leg.duration_seconds,
            source: EstimateSource::Routed,
        }
    }

    fn fallback(leg: TravelLeg) -> Self {
        Self {
            distance_meters: leg.distance_meters,
            duration_seconds: leg.duration_seconds,
            source: EstimateSource::Fallback,
        }
    }
}

/// Travel estimates from `origin` to every destination, in input order.
///
/// Destinations go out in concurrent batches of `matrix_batch_size`. A
/// failed batch or a failed item falls back to a haversine estimate.
pub fn travel_estimates<M: DistanceMatrixProvider>(
    provider: &M,
    origin: Coordinates,
    destinations: &[Coordinates],
    config: &EngineConfig,
    cancel: &CancellationToken,
) -> Vec<TravelEstimate> {
    let fallback = HaversineMatrix::new(config.fallback_speed_kmh);
    let batch_size = config.matrix_batch_size.max(1);

    let batches: Vec<Vec<TravelEstimate>> = destinations
        .par_chunks(batch_size)
        .map(|chunk| {
            let estimate_all = || {
                chunk
                    .iter()
                    .map(|destination| TravelEstimate::fallback(fallback.estimate(origin, *destination)))
                    .collect::<Vec<_>>()
            };

            let results = match cancel.check().and_then(|_| provider.batch(origin, chunk)) {
                Ok(results) => results,
                Err(err) => {
                    warn!(error = %err, destinations = chunk.len(), "matrix batch failed, using fallback");
                    return estimate_all();
                }
            };

            chunk
                .iter()
                .enumerate()
                .map(|(index, destination)| match results.get(index) {
                    Some(Ok(leg)) => TravelEstimate::routed(*leg),
                    Some(Err(err)) => {
                        debug!(error = %err, index, "matrix item failed, using fallback");
                        TravelEstimate::fallback(fallback.estimate(origin, *destination))
                    }
                    None => TravelEstimate::fallback(fallback.estimate(origin, *destination)),
                })
                .collect()
        })
        .collect();

    batches.into_iter().flatten().collect()
}

/// Search for candidate places for `plan` and score them.
///
/// One nearby search is issued per (search center, place type) pair, all
/// concurrently. Results are merged in discovery order, deduplicated by
/// provider id, and candidates whose provider id is in `exclude` are dropped.
pub fn suggest_places<P: PlacesProvider>(
    provider: &P,
    plan: &SearchPlan,
    place_types: &[&str],
    exclude: &HashSet<String>,
    estimator: &DetourEstimator,
    cancel: &CancellationToken,
) -> Fetched<Vec<DetourMatch>> {
    let radius_m = plan.radius_m();
    let centers = search_centers(plan);
    let types: Vec<Option<&str>> = if place_types.is_empty() {
        vec![None]
    } else {
        place_types.iter().copied().map(Some).collect()
    };

    let queries: Vec<(Coordinates, Option<&str>)> = centers
        .iter()
        .flat_map(|center| types.iter().map(move |place_type| (*center, *place_type)))
        .collect();

    let responses: Vec<Result<Vec<PlaceCandidate>, ProviderError>> = queries
        .par_iter()
        .map(|(center, place_type)| {
            cancel.check()?;
            provider.nearby_search(*center, radius_m, *place_type)
        })
        .collect();

    let mut status = ProviderStatus::Ok;
    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates = Vec::new();

    for response in responses {
        match response {
            Ok(found) => {
                for candidate in found {
                    if exclude.contains(&candidate.place_id) || !seen.insert(candidate.place_id.clone()) {
                        continue;
                    }
                    candidates.push(candidate_to_place(candidate));
                }
            }
            Err(err) => {
                warn!(error = %err, "nearby search failed");
                if status == ProviderStatus::Ok {
                    status = (&err).into();
                }
            }
        }
    }

    Fetched {
        value: estimator.score(plan, &candidates),
        status,
    }
}

/// Resolve free text to a place using the first text-search hit.
pub fn resolve_place<P: PlacesProvider>(
    provider: &P,
    query: &str,
    location_bias: Option<Coordinates>,
    cancel: &CancellationToken,
) -> Fetched<Option<Place>> {
    match cancel.check().and_then(|_| provider.text_search(query, location_bias)) {
        Ok(found) => Fetched::ok(found.into_iter().next().map(candidate_to_place)),
        Err(err) => {
            warn!(query, error = %err, "text search failed");
            Fetched::degraded(None, &err)
        }
    }
}

/// Points to run nearby searches from so the whole corridor is covered:
/// each step is cut into pieces no longer than `radius_m` and a piece end
/// becomes a center unless it is within half a radius of the previous one.
/// The route's final point is always a center.
pub fn search_centers(plan: &SearchPlan) -> Vec<Coordinates> {
    let (steps, radius_m) = match plan {
        SearchPlan::Around { center, .. } => return vec![*center],
        SearchPlan::Corridor { steps, radius_m } => (steps, *radius_m),
    };

    let Some(first) = steps.first() else {
        return Vec::new();
    };
    if !(radius_m.is_finite() && radius_m > 0.0) {
        warn!(radius_m, "corridor radius must be positive, searching from step ends only");
        let mut centers = vec![first.start];
        centers.extend(steps.iter().map(|step| step.end));
        return centers;
    }

    let mut centers = vec![first.start];
    for step in steps {
        let length = spherical_distance(step.start, step.end);
        let pieces = (length / radius_m).ceil().max(1.0) as usize;
        for piece in 1..=pieces {
            let t = piece as f64 / pieces as f64;
            let point = Coordinates::new(
                step.start.lat + (step.end.lat - step.start.lat) * t,
                step.start.lng + (step.end.lng - step.start.lng) * t,
            );
            if let Some(last) = centers.last() {
                if spherical_distance(*last, point) >= radius_m / 2.0 {
                    centers.push(point);
                }
            }
        }
    }

    if let (Some(last_step), Some(last_center)) = (steps.last(), centers.last()) {
        if *last_center != last_step.end {
            centers.push(last_step.end);
        }
    }

    centers
}

fn candidate_to_place(candidate: PlaceCandidate) -> Place {
    Place {
        id: candidate.place_id.clone(),
        name: candidate.name,
        category: candidate.types.into_iter().next().unwrap_or_default(),
        coordinates: Some(candidate.coordinates),
        place_id: Some(candidate.place_id),
        confirmed: false,
        validated: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::types::RouteStep;

    #[test]
    fn around_plan_searches_from_its_center() {
        let center = Coordinates::new(13.7563, 100.5018);
        let plan = SearchPlan::around(center, &EngineConfig::default());
        assert_eq!(search_centers(&plan), vec![center]);
    }

    #[test]
    fn corridor_centers_are_spaced_by_radius() {
        // ~11.1 km along the equator with a 2 km corridor
        let plan = SearchPlan::Corridor {
            steps: vec![RouteStep::new(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 0.1))],
            radius_m: 2_000.0,
        };
        let centers = search_centers(&plan);
        assert_eq!(centers.first(), Some(&Coordinates::new(0.0, 0.0)));
        assert_eq!(centers.last(), Some(&Coordinates::new(0.0, 0.1)));
        assert!(centers.len() >= 6 && centers.len() <= 7, "got {}", centers.len());
        for pair in centers.windows(2) {
            assert!(spherical_distance(pair[0], pair[1]) <= 2_000.0 + 1.0);
        }
    }

    #[test]
    fn zero_radius_corridor_falls_back_to_step_ends() {
        let plan = SearchPlan::Corridor {
            steps: vec![
                RouteStep::new(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 0.1)),
                RouteStep::new(Coordinates::new(0.0, 0.1), Coordinates::new(0.0, 0.2)),
            ],
            radius_m: 0.0,
        };
        assert_eq!(
            search_centers(&plan),
            vec![
                Coordinates::new(0.0, 0.0),
                Coordinates::new(0.0, 0.1),
                Coordinates::new(0.0, 0.2),
            ]
        );
    }

    #[test]
    fn status_mapping() {
        assert_eq!(ProviderStatus::from(&ProviderError::QuotaExceeded), ProviderStatus::QuotaExceeded);
        assert_eq!(ProviderStatus::from(&ProviderError::Transport("reset".into())), ProviderStatus::Failed);
    }
}
