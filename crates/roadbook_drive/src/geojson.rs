use std::{
    io::{BufWriter, Write},
    path::Path,
};

use geo_types::{LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject};

use crate::render::TourRenderer;

/// Collects routes and markers as GeoJSON features. Styling uses the
/// simplestyle property names (`stroke`, `marker-color`) so the output
/// renders directly in common viewers.
#[derive(Debug, Default)]
pub struct GeoJsonRenderer {
    features: Vec<Feature>,
}

impl GeoJsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let collection = FeatureCollection {
            bbox: None,
            features: self.features.clone(),
            foreign_members: None,
        };

        let file = std::fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &collection)?;
        writer.flush()?;

        Ok(())
    }

    fn push_feature(&mut self, geometry: geojson::Value, properties: JsonObject) {
        self.features.push(Feature {
            bbox: None,
            geometry: Some(Geometry::new(geometry)),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        });
    }
}

impl TourRenderer for GeoJsonRenderer {
    fn display_route(&mut self, geometry: &LineString, color: &str) {
        let mut properties = JsonObject::new();
        properties.insert("stroke".to_string(), color.into());

        self.push_feature(geojson::Value::from(geometry), properties);
    }

    fn place_marker(&mut self, position: Point, label: Option<&str>, color: &str) {
        let mut properties = JsonObject::new();
        properties.insert("marker-color".to_string(), color.into());
        if let Some(label) = label {
            properties.insert("title".to_string(), label.into());
        }

        self.push_feature(geojson::Value::from(&position), properties);
    }
}
