use geo_types::Point;
use jiff::SignedDuration;
use serde::Deserialize;
use tracing::debug;

use roadbook_tour::{meters::Meters, slice::TourSlice, waypoint::Waypoint};

use crate::provider::{DirectionsError, DirectionsProvider, RouteLeg, RouteSegment, TravelMode};

pub const GOOGLE_DIRECTIONS_API_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// Google encodes overview polylines with 5 decimal places.
const POLYLINE_PRECISION: u32 = 5;

#[derive(Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct DirectionsRoute {
    overview_polyline: OverviewPolyline,
    legs: Vec<DirectionsLeg>,
}

#[derive(Deserialize)]
struct OverviewPolyline {
    points: String,
}

#[derive(Deserialize)]
struct DirectionsLeg {
    /// Distance in meters.
    distance: TextValue,

    /// Duration in seconds.
    duration: TextValue,

    start_location: LatLng,
    end_location: LatLng,

    /// Present when the request carried pass-through waypoints.
    #[serde(default)]
    via_waypoint: Vec<ViaWaypoint>,
}

#[derive(Deserialize)]
struct TextValue {
    value: f64,
}

#[derive(Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct ViaWaypoint {
    location: LatLng,
}

impl From<&LatLng> for Point {
    fn from(value: &LatLng) -> Self {
        Point::new(value.lng, value.lat)
    }
}

pub struct GoogleDirectionsClientParams {
    pub api_key: String,
    pub base_url: String,
}

pub struct GoogleDirectionsClient {
    params: GoogleDirectionsClientParams,
    client: reqwest::Client,
}

impl GoogleDirectionsClient {
    pub fn new(params: GoogleDirectionsClientParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }

    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<RouteSegment, DirectionsError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DirectionsError::RateLimited);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DirectionsError::Api {
                status: status.as_u16().to_string(),
                message,
            });
        }

        let body = response.text().await?;

        parse_body(&body)
    }
}

impl DirectionsProvider for GoogleDirectionsClient {
    fn name(&self) -> &str {
        "google"
    }

    async fn fetch_route(
        &self,
        slice: &TourSlice<'_>,
        mode: TravelMode,
    ) -> Result<RouteSegment, DirectionsError> {
        let mut query = vec![
            ("origin", format_point(slice.origin().point())),
            ("destination", format_point(slice.destination().point())),
            ("mode", mode.to_string()),
            ("units", "metric".to_string()),
            ("key", self.params.api_key.clone()),
        ];

        if !slice.vias().is_empty() {
            query.push(("waypoints", format_vias(slice.vias())));
        }

        debug!(
            "GoogleDirections: requesting segment {}..{} ({} waypoints)",
            slice.start_index(),
            slice.end_index(),
            slice.waypoint_count()
        );

        let response = self
            .client
            .get(&self.params.base_url)
            .query(&query)
            .send()
            .await?;

        self.handle_response(response).await
    }
}

fn format_point(point: Point) -> String {
    format!("{},{}", point.y(), point.x())
}

/// Intermediate waypoints are sent as pass-throughs so the provider
/// answers with a single leg instead of splitting the route at each
/// stop.
fn format_vias(vias: &[Waypoint]) -> String {
    vias.iter()
        .map(|waypoint| format!("via:{}", format_point(waypoint.point())))
        .collect::<Vec<_>>()
        .join("|")
}

fn parse_body(body: &str) -> Result<RouteSegment, DirectionsError> {
    let response: DirectionsResponse = serde_json::from_str(body)?;

    match response.status.as_str() {
        "OK" => {}
        "OVER_QUERY_LIMIT" => return Err(DirectionsError::RateLimited),
        "ZERO_RESULTS" => return Err(DirectionsError::NoRoute),
        other => {
            return Err(DirectionsError::Api {
                status: other.to_string(),
                message: response.error_message.unwrap_or_default(),
            });
        }
    }

    let Some(route) = response.routes.into_iter().next() else {
        return Err(DirectionsError::NoRoute);
    };

    if route.legs.is_empty() {
        return Err(DirectionsError::NoRoute);
    }

    let legs = route
        .legs
        .iter()
        .map(|leg| RouteLeg {
            distance: Meters::new(leg.distance.value),
            duration: SignedDuration::from_secs_f64(leg.duration.value),
            start: (&leg.start_location).into(),
            vias: leg.via_waypoint.iter().map(|via| (&via.location).into()).collect(),
            end: (&leg.end_location).into(),
        })
        .collect();

    let geometry = polyline::decode_polyline(&route.overview_polyline.points, POLYLINE_PRECISION)
        .map_err(|err| DirectionsError::Geometry(err.to_string()))?;

    Ok(RouteSegment { legs, geometry })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_OK: &str = r#"{
        "status": "OK",
        "routes": [
            {
                "overview_polyline": { "points": "_p~iF~ps|U_ulLnnqC_mqNvxq`@" },
                "legs": [
                    {
                        "distance": { "text": "243 km", "value": 243000 },
                        "duration": { "text": "2 hours 30 mins", "value": 9000 },
                        "start_location": { "lat": 38.5, "lng": -120.2 },
                        "end_location": { "lat": 43.252, "lng": -126.453 },
                        "via_waypoint": [
                            { "location": { "lat": 40.7, "lng": -120.95 }, "step_index": 1, "step_interpolation": 0.5 }
                        ]
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_ok_body() {
        let segment = parse_body(SAMPLE_OK).unwrap();

        assert_eq!(segment.legs.len(), 1);

        let leg = &segment.legs[0];
        assert_eq!(leg.distance, Meters::new(243_000.0));
        assert_eq!(leg.duration, SignedDuration::from_secs(9000));
        assert_eq!(leg.start, Point::new(-120.2, 38.5));
        assert_eq!(leg.end, Point::new(-126.453, 43.252));
        assert_eq!(leg.vias, vec![Point::new(-120.95, 40.7)]);

        let coords: Vec<_> = segment.geometry.coords().collect();
        assert_eq!(coords.len(), 3);
        assert!((coords[0].x - -120.2).abs() < 1e-5);
        assert!((coords[0].y - 38.5).abs() < 1e-5);
    }

    #[test]
    fn test_parse_rate_limited() {
        let body = r#"{ "status": "OVER_QUERY_LIMIT", "routes": [] }"#;

        assert!(matches!(
            parse_body(body),
            Err(DirectionsError::RateLimited)
        ));
    }

    #[test]
    fn test_parse_zero_results() {
        let body = r#"{ "status": "ZERO_RESULTS", "routes": [] }"#;

        assert!(matches!(parse_body(body), Err(DirectionsError::NoRoute)));
    }

    #[test]
    fn test_parse_other_status() {
        let body = r#"{ "status": "REQUEST_DENIED", "routes": [], "error_message": "The provided API key is invalid" }"#;

        match parse_body(body) {
            Err(DirectionsError::Api { status, message }) => {
                assert_eq!(status, "REQUEST_DENIED");
                assert_eq!(message, "The provided API key is invalid");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_ok_without_routes() {
        // Some responses report OK with an empty route list.
        let body = r#"{ "status": "OK", "routes": [] }"#;

        assert!(matches!(parse_body(body), Err(DirectionsError::NoRoute)));
    }

    #[test]
    fn test_point_formatting() {
        let point = Point::new(-109.5498, 38.5733);

        assert_eq!(format_point(point), "38.5733,-109.5498");
    }

    #[test]
    fn test_via_formatting() {
        let vias = vec![
            Waypoint::new("A", 38.5, -120.2),
            Waypoint::new("B", 40.7, -120.95),
        ];

        assert_eq!(format_vias(&vias), "via:38.5,-120.2|via:40.7,-120.95");
    }
}
