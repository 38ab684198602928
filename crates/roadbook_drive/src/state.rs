use std::time::Duration;

use geo_types::Point;
use jiff::SignedDuration;
use serde::Serialize;

use roadbook_tour::{meters::Meters, slice::TourSlice};

/// Why a segment contributed nothing to the totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FailureKind {
    /// The provider had no route for the segment.
    NoRoute,
    /// The provider failed in some other way.
    Provider { message: String },
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::NoRoute => write!(f, "no route found"),
            FailureKind::Provider { message } => write!(f, "{message}"),
        }
    }
}

/// One failed segment, kept for the summary's error log.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentFailure {
    pub batch: usize,
    pub start_index: usize,
    pub end_index: usize,
    pub origin: Point,
    pub destination: Point,
    pub kind: FailureKind,
}

impl SegmentFailure {
    pub(crate) fn from_slice(slice: &TourSlice<'_>, batch: usize, kind: FailureKind) -> Self {
        Self {
            batch,
            start_index: slice.start_index(),
            end_index: slice.end_index(),
            origin: slice.origin().point(),
            destination: slice.destination().point(),
            kind,
        }
    }
}

/// Mutable run state. Only the dispatch loop touches it, one batch at a
/// time.
#[derive(Debug)]
pub(crate) struct DriveState {
    pub cursor: usize,
    pub delay: Duration,
    pub rate_limit_streak: u32,
    pub batches_resolved: usize,
    pub total_distance: Meters,
    pub total_duration: SignedDuration,
    pub marker_positions: Vec<Point>,
    pub error_log: Vec<SegmentFailure>,
    /// Guards the push-the-start-only-once rule across batches.
    pub origin_placed: bool,
}

impl DriveState {
    pub fn new(delay: Duration) -> Self {
        Self {
            cursor: 0,
            delay,
            rate_limit_streak: 0,
            batches_resolved: 0,
            total_distance: Meters::ZERO,
            total_duration: SignedDuration::ZERO,
            marker_positions: Vec::new(),
            error_log: Vec::new(),
            origin_placed: false,
        }
    }
}
