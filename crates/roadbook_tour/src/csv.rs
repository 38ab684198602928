//! Read and write tours as CSV.
//!
//! The expected columns are `name`, `state` (optional), `lat` and `lon`.
//! The legacy column names `name_visit`, `lat_visit` and `lon_visit` are
//! accepted as aliases.

use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{error::TourError, tour::TourRoute, waypoint::Waypoint};

#[derive(Debug, Deserialize, Serialize)]
struct TourRecord {
    #[serde(alias = "name_visit")]
    name: String,
    #[serde(default)]
    state: Option<String>,
    #[serde(alias = "lat_visit")]
    lat: f64,
    #[serde(alias = "lon_visit")]
    lon: f64,
}

pub fn read_tour(path: impl AsRef<Path>) -> Result<TourRoute, TourError> {
    let path = path.as_ref();
    debug!("Reading tour from {}", path.display());

    read_tour_from(File::open(path)?)
}

pub fn read_tour_from<R: Read>(reader: R) -> Result<TourRoute, TourError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut waypoints = Vec::new();

    for record in csv_reader.deserialize() {
        let record: TourRecord = record?;
        let mut waypoint = Waypoint::new(record.name, record.lat, record.lon);
        if let Some(state) = record.state {
            waypoint = waypoint.with_state(state);
        }
        waypoints.push(waypoint);
    }

    debug!("Read {} waypoints", waypoints.len());

    TourRoute::new(waypoints)
}

pub fn write_tour(tour: &TourRoute, path: impl AsRef<Path>) -> Result<(), TourError> {
    let path = path.as_ref();
    debug!("Writing tour to {}", path.display());

    write_tour_to(tour, File::create(path)?)
}

pub fn write_tour_to<W: Write>(tour: &TourRoute, writer: W) -> Result<(), TourError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for waypoint in tour.waypoints() {
        csv_writer.serialize(TourRecord {
            name: waypoint.name().to_string(),
            state: waypoint.state().map(str::to_string),
            lat: waypoint.lat(),
            lon: waypoint.lon(),
        })?;
    }

    csv_writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const SAMPLE: &str = "\
name,state,lat,lon
Boulder,CO,40.015,-105.2705
Moab,UT,38.5733,-109.5498
Page,AZ,36.9147,-111.4558
";

    const LEGACY_SAMPLE: &str = "\
name_visit,lat_visit,lon_visit
Boulder,40.015,-105.2705
Moab,38.5733,-109.5498
";

    #[test]
    fn test_read_tour() {
        let tour = read_tour_from(Cursor::new(SAMPLE)).unwrap();

        assert_eq!(tour.len(), 3);
        assert_eq!(tour.origin().label(), "Boulder, CO");
        assert_eq!(tour.destination().label(), "Page, AZ");
        assert_eq!(tour.waypoint(1).unwrap().lat(), 38.5733);
    }

    #[test]
    fn test_read_legacy_columns() {
        let tour = read_tour_from(Cursor::new(LEGACY_SAMPLE)).unwrap();

        assert_eq!(tour.len(), 2);
        assert_eq!(tour.origin().name(), "Boulder");
        assert_eq!(tour.origin().state(), None);
        assert_eq!(tour.destination().lon(), -109.5498);
    }

    #[test]
    fn test_roundtrip() {
        let tour = read_tour_from(Cursor::new(SAMPLE)).unwrap();

        let mut buffer = Vec::new();
        write_tour_to(&tour, &mut buffer).unwrap();
        let reread = read_tour_from(Cursor::new(buffer)).unwrap();

        assert_eq!(reread.len(), tour.len());
        assert_eq!(reread.waypoints(), tour.waypoints());
    }

    #[test]
    fn test_single_waypoint_is_rejected() {
        let result = read_tour_from(Cursor::new("name,state,lat,lon\nBoulder,CO,40.015,-105.2705\n"));

        assert!(matches!(
            result,
            Err(TourError::TooFewWaypoints { found: 1 })
        ));
    }
}
