//! Trip data model shared by every engine component.
//!
//! These are plain values: the engine reads a [`Trip`] snapshot and hands
//! back new `Day` / `RoutePlace` collections for the caller to persist.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A WGS-84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// The trip store writes `{0, 0}` for "not geocoded yet".
    pub fn is_zero(&self) -> bool {
        self.lat == 0.0 && self.lng == 0.0
    }
}

impl From<(f64, f64)> for Coordinates {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// A place of interest collected for the trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    /// External provider place id, if the place was matched upstream.
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub validated: bool,
}

impl Place {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: String::new(),
            coordinates: None,
            place_id: None,
            confirmed: false,
            validated: false,
        }
    }

    /// Coordinates usable for geometry, i.e. present and non-zero.
    pub fn location(&self) -> Option<Coordinates> {
        self.coordinates.filter(|coords| !coords.is_zero())
    }

    /// Confirmed and geocoded: the only places the day clusterer accepts.
    pub fn is_schedulable(&self) -> bool {
        self.confirmed && self.location().is_some()
    }
}

/// The trip's lodging, the default anchor for every day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub name: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub place_id: Option<String>,
}

/// One leg of a planned route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub start: Coordinates,
    pub end: Coordinates,
}

impl RouteStep {
    pub const fn new(start: Coordinates, end: Coordinates) -> Self {
        Self { start, end }
    }
}

/// A place attached to a route at a step position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlace {
    pub place_id: String,
    /// Index of the route step the place was matched to.
    pub order: usize,
    /// Heuristic extra minutes.
    pub detour_cost: u32,
}

/// A planned drive between two anchors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: String,
    pub start: Coordinates,
    pub end: Coordinates,
    #[serde(default)]
    pub steps: Vec<RouteStep>,
    /// Encoded polyline of the full route geometry.
    #[serde(default)]
    pub polyline: String,
    #[serde(default)]
    pub places: Vec<RoutePlace>,
}

impl Route {
    /// Start and end coincide, e.g. hotel to hotel.
    pub fn is_closed_loop(&self, tolerance_m: f64) -> bool {
        crate::geometry::spherical_distance(self.start, self.end) < tolerance_m
    }

    pub fn place_ids(&self) -> impl Iterator<Item = &str> {
        self.places.iter().map(|place| place.place_id.as_str())
    }
}

/// One itinerary day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    pub id: String,
    /// Visiting sequence of place ids.
    pub places: Vec<String>,
    #[serde(default)]
    pub route_ids: Vec<String>,
    #[serde(default)]
    pub end_destination: Option<Coordinates>,
}

impl Day {
    pub fn new(id: impl Into<String>, places: Vec<String>) -> Self {
        Self {
            id: id.into(),
            places,
            route_ids: Vec::new(),
            end_destination: None,
        }
    }
}

/// The caller-owned trip aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    #[serde(default)]
    pub hotel: Option<Hotel>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub places_per_day: Option<usize>,
    #[serde(default)]
    pub places: Vec<Place>,
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(default)]
    pub days: Vec<Day>,
}

impl Trip {
    pub fn place(&self, id: &str) -> Option<&Place> {
        self.places.iter().find(|place| place.id == id)
    }

    /// Schedulable places in trip order.
    pub fn confirmed_places(&self) -> Vec<&Place> {
        self.places.iter().filter(|place| place.is_schedulable()).collect()
    }
}
