pub mod cancel;
pub mod driver;
pub mod geojson;
pub mod params;
pub mod progress;
pub mod render;
pub mod state;
pub mod summary;
