//! trip-engine: the geospatial core of a day-by-day itinerary planner.
//!
//! Scores candidates against a planned route, partitions confirmed places
//! into days and reorders a day's remaining stops. All engine functions are
//! synchronous and pure; provider I/O lives behind the traits in [`traits`].

pub mod cancel;
pub mod clustering;
pub mod config;
pub mod detour;
pub mod error;
pub mod geometry;
pub mod haversine;
pub mod osrm;
pub mod polyline;
pub mod reoptimize;
pub mod suggest;
pub mod traits;
pub mod types;

pub use clustering::{ClusterOptions, DayClusterer};
pub use config::EngineConfig;
pub use detour::{DetourEstimator, DetourMatch, SearchPlan};
pub use error::{ConfigError, EngineError, ProviderError};
pub use reoptimize::{DayProgress, reoptimize, reoptimize_day};
pub use types::{Coordinates, Day, Hotel, Place, Route, RoutePlace, RouteStep, Trip};
