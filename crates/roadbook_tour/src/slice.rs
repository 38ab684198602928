use crate::waypoint::Waypoint;

/// A contiguous run of waypoints, sized to fit a single directions request.
///
/// Consecutive slices of a tour share their boundary waypoint: the
/// destination of one slice is the origin of the next.
#[derive(Debug, Clone, Copy)]
pub struct TourSlice<'a> {
    start_index: usize,
    end_index: usize,
    origin: &'a Waypoint,
    vias: &'a [Waypoint],
    destination: &'a Waypoint,
}

impl<'a> TourSlice<'a> {
    pub(crate) fn new(
        start_index: usize,
        end_index: usize,
        origin: &'a Waypoint,
        vias: &'a [Waypoint],
        destination: &'a Waypoint,
    ) -> Self {
        TourSlice {
            start_index,
            end_index,
            origin,
            vias,
            destination,
        }
    }

    /// Index of the origin in the full tour.
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Index of the destination in the full tour.
    pub fn end_index(&self) -> usize {
        self.end_index
    }

    pub fn origin(&self) -> &'a Waypoint {
        self.origin
    }

    pub fn vias(&self) -> &'a [Waypoint] {
        self.vias
    }

    pub fn destination(&self) -> &'a Waypoint {
        self.destination
    }

    /// Number of waypoints covered, endpoints included.
    pub fn waypoint_count(&self) -> usize {
        self.vias.len() + 2
    }

    /// Waypoint at `offset` from the origin, destination last.
    pub fn waypoint(&self, offset: usize) -> Option<&'a Waypoint> {
        if offset == 0 {
            Some(self.origin)
        } else if offset <= self.vias.len() {
            Some(&self.vias[offset - 1])
        } else if offset == self.vias.len() + 1 {
            Some(self.destination)
        } else {
            None
        }
    }

    pub fn waypoints(&self) -> impl Iterator<Item = &'a Waypoint> {
        std::iter::once(self.origin)
            .chain(self.vias.iter())
            .chain(std::iter::once(self.destination))
    }
}
