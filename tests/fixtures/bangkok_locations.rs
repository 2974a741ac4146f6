//! Central Bangkok landmarks for realistic test fixtures.
//!
//! Coordinates rounded to four decimals from OpenStreetMap.

#![allow(dead_code)]

use trip_engine::{Coordinates, Hotel, Place, Route, RoutePlace, RouteStep};

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }

    /// A confirmed, geocoded place with a slug id.
    pub fn place(&self) -> Place {
        let mut place = Place::new(slug(self.name), self.name);
        place.coordinates = Some(self.coords());
        place.confirmed = true;
        place.validated = true;
        place
    }
}

pub fn slug(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

// ============================================================================
// Anchors
// ============================================================================

pub const HOTEL: Location = Location::new("Riverside Hotel", 13.7563, 100.5018);
pub const SIAM: Location = Location::new("Siam Paragon", 13.7466, 100.5347);

// ============================================================================
// Old Town (Rattanakosin)
// ============================================================================

pub const OLD_TOWN: &[Location] = &[
    Location::new("Grand Palace", 13.7500, 100.4913),
    Location::new("Wat Pho", 13.7465, 100.4927),
    Location::new("Wat Arun", 13.7437, 100.4888),
    Location::new("Khao San Road", 13.7589, 100.4974),
    Location::new("Golden Mount", 13.7539, 100.5068),
    Location::new("Yaowarat Road", 13.7410, 100.5090),
];

// ============================================================================
// Downtown
// ============================================================================

pub const DOWNTOWN: &[Location] = &[
    Location::new("Jim Thompson House", 13.7494, 100.5283),
    Location::new("MBK Center", 13.7447, 100.5299),
    Location::new("Erawan Shrine", 13.7443, 100.5404),
    Location::new("Lumphini Park", 13.7314, 100.5414),
    Location::new("Victory Monument", 13.7649, 100.5383),
    Location::new("Chatuchak Market", 13.7999, 100.5500),
];

// ============================================================================
// Out of town
// ============================================================================

pub const FAR_AWAY: Location = Location::new("Bang Pakong Riverside", 13.9, 100.9);

pub fn all_locations() -> Vec<Location> {
    let mut all = Vec::with_capacity(12);
    all.extend_from_slice(OLD_TOWN);
    all.extend_from_slice(DOWNTOWN);
    all
}

pub fn all_places() -> Vec<Place> {
    all_locations().iter().map(Location::place).collect()
}

pub fn hotel() -> Hotel {
    Hotel {
        name: HOTEL.name.to_string(),
        coordinates: Some(HOTEL.coords()),
        place_id: None,
    }
}

/// A single-step route between two locations with the given places attached.
pub fn route(id: &str, from: &Location, to: &Location, place_ids: &[String]) -> Route {
    Route {
        id: id.to_string(),
        start: from.coords(),
        end: to.coords(),
        steps: vec![RouteStep::new(from.coords(), to.coords())],
        polyline: String::new(),
        places: place_ids
            .iter()
            .enumerate()
            .map(|(order, place_id)| RoutePlace {
                place_id: place_id.clone(),
                order,
                detour_cost: 0,
            })
            .collect(),
    }
}
