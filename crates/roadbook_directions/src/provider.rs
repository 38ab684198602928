use std::fmt::Display;

use geo_types::{LineString, Point};
use jiff::SignedDuration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use roadbook_tour::{meters::Meters, slice::TourSlice};

#[derive(Debug, Default, Deserialize, Serialize, Copy, Clone, Hash, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
}

impl Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TravelMode::Driving => "driving",
                TravelMode::Walking => "walking",
                TravelMode::Bicycling => "bicycling",
            }
        )
    }
}

#[derive(Debug, Error)]
pub enum DirectionsError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Rate limited by the directions provider")]
    RateLimited,

    #[error("No route found between the requested waypoints")]
    NoRoute,

    #[error("API error: {status} - {message}")]
    Api { status: String, message: String },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Invalid geometry: {0}")]
    Geometry(String),
}

/// One leg of a routed segment. With pass-through waypoints a provider
/// answers with a single leg holding the intermediate positions in
/// `vias`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RouteLeg {
    pub distance: Meters,
    pub duration: SignedDuration,
    pub start: Point,
    pub vias: Vec<Point>,
    pub end: Point,
}

/// The routed result for one batch of waypoints.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RouteSegment {
    pub legs: Vec<RouteLeg>,
    pub geometry: LineString,
}

impl RouteSegment {
    pub fn total_distance(&self) -> Meters {
        self.legs.iter().map(|leg| leg.distance).sum()
    }

    pub fn total_duration(&self) -> SignedDuration {
        self.legs
            .iter()
            .fold(SignedDuration::ZERO, |acc, leg| acc + leg.duration)
    }
}

/// A directions backend able to route one batch of waypoints at a time.
pub trait DirectionsProvider {
    /// Short label used in logs and cache keys.
    fn name(&self) -> &str;

    fn fetch_route(
        &self,
        slice: &TourSlice<'_>,
        mode: TravelMode,
    ) -> impl Future<Output = Result<RouteSegment, DirectionsError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_travel_mode_display() {
        assert_eq!(TravelMode::Driving.to_string(), "driving");
        assert_eq!(TravelMode::Bicycling.to_string(), "bicycling");
    }

    #[test]
    fn test_segment_totals() {
        let segment = RouteSegment {
            legs: vec![
                RouteLeg {
                    distance: Meters::new(1000.0),
                    duration: SignedDuration::from_secs(60),
                    start: Point::new(0.0, 0.0),
                    vias: vec![],
                    end: Point::new(1.0, 0.0),
                },
                RouteLeg {
                    distance: Meters::new(500.0),
                    duration: SignedDuration::from_secs(30),
                    start: Point::new(1.0, 0.0),
                    vias: vec![],
                    end: Point::new(2.0, 0.0),
                },
            ],
            geometry: LineString::new(vec![]),
        };

        assert_eq!(segment.total_distance(), Meters::new(1500.0));
        assert_eq!(segment.total_duration(), SignedDuration::from_secs(90));
    }
}
