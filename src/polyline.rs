//! Route geometry as decoded coordinates.
//!
//! Routes travel as encoded polyline strings (1e-5 precision); this type
//! holds the decoded points and converts at the boundary.

use serde::{Deserialize, Serialize};

use crate::error::PolylineError;
use crate::types::{Coordinates, RouteStep};

const PRECISION: f64 = 1e5;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinates>,
}

impl Polyline {
    pub fn new(points: Vec<Coordinates>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Coordinates] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Coordinates> {
        self.points
    }

    /// Consecutive point pairs as route steps.
    pub fn steps(&self) -> Vec<RouteStep> {
        self.points
            .windows(2)
            .map(|pair| RouteStep::new(pair[0], pair[1]))
            .collect()
    }

    pub fn decode(encoded: &str) -> Result<Self, PolylineError> {
        let bytes = encoded.as_bytes();
        let mut offset = 0;
        let mut lat = 0i64;
        let mut lng = 0i64;
        let mut points = Vec::new();

        while offset < bytes.len() {
            let start = offset;
            lat = lat
                .checked_add(read_value(bytes, &mut offset)?)
                .ok_or(PolylineError::Overflow(start))?;
            lng = lng
                .checked_add(read_value(bytes, &mut offset)?)
                .ok_or(PolylineError::Overflow(start))?;
            points.push(Coordinates::new(lat as f64 / PRECISION, lng as f64 / PRECISION));
        }

        Ok(Self { points })
    }

    pub fn encode(&self) -> String {
        let mut out = String::new();
        let mut prev_lat = 0i64;
        let mut prev_lng = 0i64;

        for point in &self.points {
            let lat = (point.lat * PRECISION).round() as i64;
            let lng = (point.lng * PRECISION).round() as i64;
            write_value(lat - prev_lat, &mut out);
            write_value(lng - prev_lng, &mut out);
            prev_lat = lat;
            prev_lng = lng;
        }

        out
    }
}

fn read_value(bytes: &[u8], offset: &mut usize) -> Result<i64, PolylineError> {
    let mut result = 0i64;
    let mut shift = 0;

    loop {
        let Some(&byte) = bytes.get(*offset) else {
            return Err(PolylineError::Truncated(*offset));
        };
        if !(63..=126).contains(&byte) || shift > 60 {
            return Err(PolylineError::InvalidByte { byte, offset: *offset });
        }
        *offset += 1;

        let chunk = i64::from(byte - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }

    Ok(if result & 1 == 1 { !(result >> 1) } else { result >> 1 })
}

fn write_value(value: i64, out: &mut String) {
    let mut rest = if value < 0 { !(value << 1) } else { value << 1 };
    while rest >= 0x20 {
        out.push(char::from((0x20 | (rest & 0x1f)) as u8 + 63));
        rest >>= 5;
    }
    out.push(char::from(rest as u8 + 63));
}
