//! Test fixtures for trip-engine.
//!
//! Provides realistic test data including:
//! - Real central Bangkok landmarks (from OpenStreetMap)
//! - Builders for places, routes and trips

pub mod bangkok_locations;

pub use bangkok_locations::*;
