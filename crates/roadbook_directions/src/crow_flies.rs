use geo_types::{LineString, Point};

use roadbook_tour::{kmh::Kmh, meters::Meters, slice::TourSlice, waypoint::Waypoint};

use crate::provider::{DirectionsError, DirectionsProvider, RouteLeg, RouteSegment, TravelMode};

pub const DEFAULT_SPEED_KMH: f64 = 90.0;

/// Offline provider: straight lines between waypoints at a fixed average
/// speed. Useful for estimates and for running without an API credential.
pub struct CrowFliesDirections {
    speed: Kmh,
}

impl CrowFliesDirections {
    pub fn new(speed: Kmh) -> Self {
        Self { speed }
    }
}

impl Default for CrowFliesDirections {
    fn default() -> Self {
        Self::new(Kmh::new(DEFAULT_SPEED_KMH))
    }
}

impl DirectionsProvider for CrowFliesDirections {
    fn name(&self) -> &str {
        "crow-flies"
    }

    async fn fetch_route(
        &self,
        slice: &TourSlice<'_>,
        _mode: TravelMode,
    ) -> Result<RouteSegment, DirectionsError> {
        let waypoints: Vec<&Waypoint> = slice.waypoints().collect();

        let distance: Meters = waypoints
            .windows(2)
            .map(|pair| pair[0].haversine_distance(pair[1]))
            .sum();

        let leg = RouteLeg {
            distance,
            duration: distance / self.speed,
            start: slice.origin().point(),
            vias: slice.vias().iter().map(Waypoint::point).collect(),
            end: slice.destination().point(),
        };

        let geometry = LineString::from(
            waypoints
                .iter()
                .map(|waypoint| waypoint.point())
                .collect::<Vec<Point>>(),
        );

        Ok(RouteSegment {
            legs: vec![leg],
            geometry,
        })
    }
}
