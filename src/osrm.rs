//! OSRM HTTP adapter for directions and one-to-many travel lookups.

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::error::ProviderError;
use crate::polyline::Polyline;
use crate::traits::{Directions, DirectionsProvider, DistanceMatrixProvider, TravelLeg};
use crate::types::{Coordinates, RouteStep};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn get<T: for<'de> Deserialize<'de>>(&self, service: &str, coords: &str, query: &str) -> Result<T, ProviderError> {
        if self.config.base_url.is_empty() {
            return Err(ProviderError::Unavailable);
        }

        let url = format!(
            "{}/{}/v1/{}/{}?{}",
            self.config.base_url, service, self.config.profile, coords, query
        );
        debug!(%url, "osrm request");

        let response = self.client.get(url).send()?;
        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => return Err(ProviderError::QuotaExceeded),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(ProviderError::Denied),
            _ => {}
        }

        let body: serde_json::Value = response.json()?;
        match body.get("code").and_then(|code| code.as_str()) {
            Some("Ok") => serde_json::from_value(body)
                .map_err(|err| ProviderError::InvalidResponse(err.to_string())),
            Some("NoRoute") | Some("NoSegment") => Err(ProviderError::NoRoute),
            Some(code) => Err(ProviderError::InvalidResponse(code.to_string())),
            None => Err(ProviderError::InvalidResponse("missing code".to_string())),
        }
    }
}

impl DirectionsProvider for OsrmClient {
    fn route(&self, start: Coordinates, end: Coordinates) -> Result<Directions, ProviderError> {
        let coords = coordinate_list(&[start, end]);
        let body: OsrmRouteResponse =
            self.get("route", &coords, "overview=full&geometries=polyline&steps=true")?;

        let route = body.routes.into_iter().next().ok_or(ProviderError::NoRoute)?;

        let mut steps = Vec::new();
        for leg in &route.legs {
            for step in &leg.steps {
                let points = Polyline::decode(&step.geometry)
                    .map_err(|err| ProviderError::InvalidResponse(err.to_string()))?
                    .into_points();
                if let (Some(first), Some(last)) = (points.first(), points.last()) {
                    steps.push(RouteStep::new(*first, *last));
                }
            }
        }

        Ok(Directions {
            distance_meters: route.distance,
            duration_seconds: route.duration,
            polyline: route.geometry,
            steps,
        })
    }
}

impl DistanceMatrixProvider for OsrmClient {
    fn batch(
        &self,
        origin: Coordinates,
        destinations: &[Coordinates],
    ) -> Result<Vec<Result<TravelLeg, ProviderError>>, ProviderError> {
        if destinations.is_empty() {
            return Ok(Vec::new());
        }

        let mut locations = Vec::with_capacity(destinations.len() + 1);
        locations.push(origin);
        locations.extend_from_slice(destinations);

        let body: OsrmTableResponse = self.get(
            "table",
            &coordinate_list(&locations),
            "sources=0&annotations=duration,distance",
        )?;

        let durations = body.durations.unwrap_or_default().into_iter().next().unwrap_or_default();
        let distances = body.distances.unwrap_or_default().into_iter().next().unwrap_or_default();

        Ok((1..locations.len())
            .map(|index| {
                match (
                    durations.get(index).copied().flatten(),
                    distances.get(index).copied().flatten(),
                ) {
                    (Some(duration), Some(distance)) => Ok(TravelLeg {
                        distance_meters: distance,
                        duration_seconds: duration,
                    }),
                    _ => Err(ProviderError::NoRoute),
                }
            })
            .collect())
    }
}

/// OSRM expects `lng,lat` pairs joined by `;`.
fn coordinate_list(locations: &[Coordinates]) -> String {
    locations
        .iter()
        .map(|point| format!("{:.6},{:.6}", point.lng, point.lat))
        .collect::<Vec<_>>()
        .join(";")
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: String,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
struct OsrmStep {
    geometry: String,
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    durations: Option<Vec<Vec<Option<f64>>>>,
    distances: Option<Vec<Vec<Option<f64>>>>,
}
