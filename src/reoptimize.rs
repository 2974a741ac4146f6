//! Nearest-neighbor reordering of a day's remaining stops.

use std::collections::HashSet;

use tracing::debug;

use crate::error::EngineError;
use crate::geometry::spherical_distance;
use crate::types::{Coordinates, Day, Hotel, Place, Trip};

/// Visit state of the stops in one day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayProgress {
    pub completed: HashSet<String>,
    pub skipped: HashSet<String>,
}

/// Greedy nearest-neighbor order for `remaining`, starting at `anchor`.
///
/// Places without coordinates keep their relative order at the tail. With
/// fewer than two located places the input order is returned unchanged.
/// Ties go to the place listed first.
pub fn nearest_neighbor_order<'a>(anchor: Coordinates, remaining: &[&'a Place]) -> Vec<&'a Place> {
    let mut unvisited: Vec<(&Place, Coordinates)> = Vec::with_capacity(remaining.len());
    let mut unlocated = Vec::new();
    for &place in remaining {
        match place.location() {
            Some(location) => unvisited.push((place, location)),
            None => unlocated.push(place),
        }
    }

    if unvisited.len() < 2 {
        return remaining.to_vec();
    }

    let mut ordered = Vec::with_capacity(remaining.len());
    let mut current = anchor;

    while !unvisited.is_empty() {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (index, &(_, location)) in unvisited.iter().enumerate() {
            let distance = spherical_distance(current, location);
            if distance < best_distance {
                best = index;
                best_distance = distance;
            }
        }

        let (next, location) = unvisited.remove(best);
        current = location;
        ordered.push(next);
    }

    ordered.extend(unlocated);
    ordered
}

/// `completed` followed by `remaining` in nearest-neighbor order.
///
/// The anchor is the hotel, or the first located remaining place when the
/// trip has no hotel. A hotel without coordinates is a caller error.
pub fn reoptimize<'a>(
    hotel: Option<&Hotel>,
    completed: &[&'a Place],
    remaining: &[&'a Place],
) -> Result<Vec<&'a Place>, EngineError> {
    let anchor = match hotel {
        Some(hotel) => Some(
            hotel
                .coordinates
                .ok_or_else(|| EngineError::AnchorWithoutCoordinates(hotel.name.clone()))?,
        ),
        None => remaining.iter().find_map(|place| place.location()),
    };

    let mut sequence = completed.to_vec();
    match anchor {
        Some(anchor) => sequence.extend(nearest_neighbor_order(anchor, remaining)),
        None => sequence.extend_from_slice(remaining),
    }
    Ok(sequence)
}

/// Reorder the unvisited stops of `day`, returning a new day.
///
/// Completed stops keep their order at the front and skipped stops are kept
/// at the end. Ids that no longer resolve to a trip place are left in the
/// remaining set's tail untouched.
pub fn reoptimize_day(trip: &Trip, day: &Day, progress: &DayProgress) -> Result<Day, EngineError> {
    let mut completed = Vec::new();
    let mut remaining = Vec::new();
    let mut skipped = Vec::new();
    let mut unresolved = Vec::new();

    for id in &day.places {
        if progress.completed.contains(id) {
            completed.push(id.clone());
        } else if progress.skipped.contains(id) {
            skipped.push(id.clone());
        } else {
            match trip.place(id) {
                Some(place) => remaining.push(place),
                None => unresolved.push(id.clone()),
            }
        }
    }

    let reordered = reoptimize(trip.hotel.as_ref(), &[], &remaining)?;
    debug!(day = %day.id, remaining = reordered.len(), "reoptimized day");

    let mut places = completed;
    places.extend(reordered.into_iter().map(|place| place.id.clone()));
    places.extend(unresolved);
    places.extend(skipped);

    Ok(Day {
        places,
        ..day.clone()
    })
}
