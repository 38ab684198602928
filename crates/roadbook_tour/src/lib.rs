pub mod csv;
pub mod error;
pub mod kmh;
pub mod meters;
pub mod slice;
pub mod tour;
pub mod waypoint;
