use geo_types::{LineString, Point};

/// Marker color for the tour's first waypoint.
pub const START_COLOR: &str = "blue";
/// Marker color for intermediate stops.
pub const STOP_COLOR: &str = "cadetblue";
/// Marker color for the tour's last waypoint.
pub const FINISH_COLOR: &str = "darkred";

/// Route colors, cycled per batch.
pub const ROUTE_COLORS: [&str; 6] = ["blue", "red", "green", "purple", "orange", "darkblue"];

/// Presentation seam. The driver only ever writes to it; every method
/// defaults to a no-op.
pub trait TourRenderer {
    fn display_route(&mut self, _geometry: &LineString, _color: &str) {}
    fn place_marker(&mut self, _position: Point, _label: Option<&str>, _color: &str) {}
    fn update_progress(&mut self, _text: &str) {}
    fn update_summary(&mut self, _start: &str, _end: &str, _distance_km: f64, _duration: &str) {}
    fn show_error(&mut self, _message: &str) {}
}

/// Renderer for headless runs.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl TourRenderer for NullRenderer {}
