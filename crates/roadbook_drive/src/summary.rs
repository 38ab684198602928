use geo_types::Point;
use jiff::SignedDuration;
use serde::Serialize;

use roadbook_tour::meters::Meters;

use crate::state::SegmentFailure;

/// Final accounting of a drive.
#[derive(Debug, Clone, Serialize)]
pub struct TourSummary {
    pub total_distance: Meters,
    pub total_duration: SignedDuration,
    pub marker_positions: Vec<Point>,
    pub error_log: Vec<SegmentFailure>,
    pub batches: usize,
}

impl TourSummary {
    pub fn distance_km(&self) -> f64 {
        self.total_distance.kilometers()
    }

    /// Human-friendly duration, e.g. `2h 30m`.
    pub fn duration_text(&self) -> String {
        format!("{:#}", self.total_duration)
    }
}
