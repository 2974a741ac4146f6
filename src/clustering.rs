//! Partition confirmed places into itinerary days.
//!
//! Two modes: when the trip already has routes each route seeds a day and
//! small routes are merged first-fit; otherwise places are sliced evenly in
//! their existing order. Both are deterministic for identical input.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::types::{Day, Place, Route, Trip};

/// Inputs that size the partition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterOptions {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// User cap on places per day; derived when absent.
    pub places_per_day: Option<usize>,
}

impl ClusterOptions {
    pub fn from_trip(trip: &Trip) -> Self {
        Self {
            start_date: trip.start_date,
            end_date: trip.end_date,
            places_per_day: trip.places_per_day,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DayClusterer {
    config: EngineConfig,
}

impl Default for DayClusterer {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl DayClusterer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Number of days the trip spans, inclusive of both ends.
    pub fn target_days(&self, options: &ClusterOptions) -> usize {
        match (options.start_date, options.end_date) {
            (Some(start), Some(end)) => {
                let span = (end - start).num_days();
                usize::try_from(span + 1).unwrap_or(0).max(1)
            }
            _ => self.config.default_target_days,
        }
    }

    /// Places per day: the user's cap, or an even share clamped to the
    /// configured bounds.
    pub fn capacity(&self, place_count: usize, target_days: usize, options: &ClusterOptions) -> usize {
        if let Some(cap) = options.places_per_day.filter(|cap| *cap > 0) {
            return cap;
        }
        place_count
            .div_ceil(target_days.max(1))
            .max(self.config.min_places_per_day)
            .min(self.config.max_places_per_day)
            .max(1)
    }

    /// Build days for a trip that has none yet.
    ///
    /// Returns `None` when the trip already has days: those belong to the
    /// user and are never re-clustered.
    pub fn cluster_trip(&self, trip: &Trip) -> Option<Vec<Day>> {
        if !trip.days.is_empty() {
            info!(days = trip.days.len(), "trip already has days, skipping clustering");
            return None;
        }

        let confirmed: Vec<Place> = trip.confirmed_places().into_iter().cloned().collect();
        Some(self.cluster(&confirmed, &trip.routes, &ClusterOptions::from_trip(trip)))
    }

    /// Partition `places` into days. Places that are unconfirmed or lack
    /// coordinates are ignored.
    pub fn cluster(&self, places: &[Place], routes: &[Route], options: &ClusterOptions) -> Vec<Day> {
        let eligible: Vec<&Place> = places.iter().filter(|place| place.is_schedulable()).collect();
        if eligible.is_empty() {
            debug!("no confirmed places to cluster");
            return Vec::new();
        }

        let target_days = self.target_days(options);
        let capacity = self.capacity(eligible.len(), target_days, options);

        let buckets = if routes.is_empty() {
            debug!(places = eligible.len(), target_days, "clustering by even distribution");
            even_buckets(&eligible, target_days)
        } else {
            debug!(places = eligible.len(), routes = routes.len(), capacity, "clustering by routes");
            route_buckets(&eligible, routes, capacity, target_days)
        };

        buckets
            .into_iter()
            .enumerate()
            .map(|(index, bucket)| Day {
                id: format!("day-{}", index + 1),
                places: bucket.places,
                route_ids: bucket.route_ids,
                end_destination: None,
            })
            .collect()
    }
}

#[derive(Debug, Default)]
struct Bucket {
    places: Vec<String>,
    route_ids: Vec<String>,
}

/// Contiguous slices with boundaries at `floor(n * day / target_days)`.
fn even_buckets(places: &[&Place], target_days: usize) -> Vec<Bucket> {
    let n = places.len();
    (0..target_days)
        .map(|day| {
            let from = n * day / target_days;
            let to = n * (day + 1) / target_days;
            Bucket {
                places: places[from..to].iter().map(|place| place.id.clone()).collect(),
                route_ids: Vec::new(),
            }
        })
        .collect()
}

fn route_buckets(places: &[&Place], routes: &[Route], capacity: usize, target_days: usize) -> Vec<Bucket> {
    let eligible: HashSet<&str> = places.iter().map(|place| place.id.as_str()).collect();
    let route_places: Vec<Vec<&str>> = routes
        .iter()
        .map(|route| unique_ids(route.place_ids().filter(|id| eligible.contains(id))))
        .collect();

    let mut processed = vec![false; routes.len()];
    let mut scheduled: HashSet<&str> = HashSet::new();
    let mut buckets: Vec<Bucket> = Vec::new();

    for index in 0..routes.len() {
        if processed[index] {
            continue;
        }
        processed[index] = true;

        let mut bucket_ids: Vec<&str> = route_places[index]
            .iter()
            .copied()
            .filter(|id| !scheduled.contains(id))
            .collect();
        if bucket_ids.is_empty() {
            debug!(route = %routes[index].id, "every place of the route is already scheduled");
            continue;
        }
        let mut route_ids = vec![routes[index].id.clone()];

        if bucket_ids.len() < capacity {
            for next in index + 1..routes.len() {
                // Full routes keep a day of their own.
                if processed[next] || route_places[next].len() >= capacity {
                    continue;
                }
                let added: Vec<&str> = route_places[next]
                    .iter()
                    .copied()
                    .filter(|id| !scheduled.contains(id) && !bucket_ids.contains(id))
                    .collect();
                if bucket_ids.len() + added.len() <= capacity {
                    bucket_ids.extend(added);
                    route_ids.push(routes[next].id.clone());
                    processed[next] = true;
                }
            }
        }

        scheduled.extend(bucket_ids.iter().copied());
        buckets.push(Bucket {
            places: bucket_ids.into_iter().map(str::to_string).collect(),
            route_ids,
        });
    }

    let covered: HashSet<&str> = route_places.iter().flatten().copied().collect();
    let mut uncovered: Vec<String> = places
        .iter()
        .filter(|place| !covered.contains(place.id.as_str()))
        .map(|place| place.id.clone())
        .collect();

    if !uncovered.is_empty() {
        debug!(uncovered = uncovered.len(), "placing places not on any route");
        if let Some(last) = buckets.last_mut() {
            let spare = capacity.saturating_sub(last.places.len()).min(uncovered.len());
            last.places.extend(uncovered.drain(..spare));
        }
        for chunk in uncovered.chunks(capacity.max(1)) {
            buckets.push(Bucket {
                places: chunk.to_vec(),
                route_ids: Vec::new(),
            });
        }
    }

    while buckets.len() < target_days {
        buckets.push(Bucket::default());
    }

    buckets
}

/// Dedupe preserving first occurrence.
fn unique_ids<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}
