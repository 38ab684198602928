use geo::{Distance, Haversine, Point};

use crate::meters::Meters;

/// A named stop on a tour.
///
/// The underlying point stores longitude as `x` and latitude as `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    name: String,
    state: Option<String>,
    point: Point,
}

impl Waypoint {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Waypoint {
            name: name.into(),
            state: None,
            point: Point::new(lon, lat),
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Human-readable label, e.g. `"Moab, UT"`.
    pub fn label(&self) -> String {
        match &self.state {
            Some(state) => format!("{}, {}", self.name, state),
            None => self.name.clone(),
        }
    }

    pub fn lat(&self) -> f64 {
        self.point.y()
    }

    pub fn lon(&self) -> f64 {
        self.point.x()
    }

    pub fn point(&self) -> Point {
        self.point
    }

    pub fn haversine_distance(&self, other: &Waypoint) -> Meters {
        Meters::new(Haversine.distance(self.point, other.point))
    }
}

impl From<&Waypoint> for Point {
    fn from(waypoint: &Waypoint) -> Self {
        waypoint.point
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label() {
        let plain = Waypoint::new("Moab", 38.5733, -109.5498);
        assert_eq!(plain.label(), "Moab");

        let with_state = plain.clone().with_state("UT");
        assert_eq!(with_state.label(), "Moab, UT");
    }

    #[test]
    fn test_point_axis_order() {
        let waypoint = Waypoint::new("Moab", 38.5733, -109.5498);

        assert_eq!(waypoint.lat(), 38.5733);
        assert_eq!(waypoint.lon(), -109.5498);
        assert_eq!(waypoint.point().x(), -109.5498);
        assert_eq!(waypoint.point().y(), 38.5733);
        assert_eq!(Point::from(&waypoint), waypoint.point());
    }

    #[test]
    fn test_haversine_distance() {
        // One degree of latitude is roughly 111.2 km.
        let south = Waypoint::new("South", 38.0, -109.0);
        let north = Waypoint::new("North", 39.0, -109.0);

        let distance = south.haversine_distance(&north);

        assert!((distance.kilometers() - 111.2).abs() < 0.3);
    }
}
