use crate::{error::TourError, meters::Meters, slice::TourSlice, waypoint::Waypoint};

/// The smallest batch that still describes a route.
pub const MIN_BATCH_SIZE: usize = 2;

/// An ordered list of waypoints to visit.
#[derive(Debug, Clone)]
pub struct TourRoute {
    waypoints: Vec<Waypoint>,
}

impl TourRoute {
    pub fn new(waypoints: Vec<Waypoint>) -> Result<Self, TourError> {
        if waypoints.len() < MIN_BATCH_SIZE {
            return Err(TourError::TooFewWaypoints {
                found: waypoints.len(),
            });
        }

        Ok(TourRoute { waypoints })
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn waypoint(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    pub fn origin(&self) -> &Waypoint {
        &self.waypoints[0]
    }

    pub fn destination(&self) -> &Waypoint {
        &self.waypoints[self.waypoints.len() - 1]
    }

    /// Index of the last waypoint.
    pub fn last_index(&self) -> usize {
        self.waypoints.len() - 1
    }

    /// The slice starting at `cursor`, covering at most `batch_size`
    /// waypoints. Returns `None` once the cursor reaches the last
    /// waypoint.
    ///
    /// The slice for one cursor position is always the same, so a caller
    /// that rolls its cursor back after a failed request gets the
    /// identical slice again.
    pub fn slice_from(&self, cursor: usize, batch_size: usize) -> Option<TourSlice<'_>> {
        let last = self.last_index();
        if cursor >= last {
            return None;
        }

        let batch_size = batch_size.max(MIN_BATCH_SIZE);
        let end = last.min(cursor + batch_size - 1);

        Some(TourSlice::new(
            cursor,
            end,
            &self.waypoints[cursor],
            &self.waypoints[cursor + 1..end],
            &self.waypoints[end],
        ))
    }

    /// All slices of the tour in order. Consecutive slices share their
    /// boundary waypoint.
    pub fn slices(&self, batch_size: usize) -> impl Iterator<Item = TourSlice<'_>> {
        let mut cursor = 0;

        std::iter::from_fn(move || {
            let slice = self.slice_from(cursor, batch_size)?;
            cursor = slice.end_index();
            Some(slice)
        })
    }

    /// Number of slices `slices` will yield for the given batch size.
    pub fn batch_count(&self, batch_size: usize) -> usize {
        let step = batch_size.max(MIN_BATCH_SIZE) - 1;
        (self.waypoints.len() - 1).div_ceil(step)
    }

    /// Straight-line distance along the tour, waypoint to waypoint.
    pub fn crow_flies_distance(&self) -> Meters {
        self.waypoints
            .windows(2)
            .map(|pair| pair[0].haversine_distance(&pair[1]))
            .sum()
    }
}
