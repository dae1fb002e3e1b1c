use geojson::{Feature, FeatureCollection, Geometry, Value};
use crate::{accumulator::RectangleAccumulator, error::Result, types::Quad};

fn number(value: f64) -> serde_json::Value {
    serde_json::Number::from_f64(value)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

fn quad_feature(id: usize, quad: &Quad) -> Feature {
    let mut ring: Vec<Vec<f64>> = quad.vertices
        .iter()
        .map(|p| vec![p.x as f64, p.y as f64])
        .collect();
    ring.push(vec![quad.vertices[0].x as f64, quad.vertices[0].y as f64]);

    let mut properties = serde_json::Map::new();
    properties.insert("id".to_string(), serde_json::Value::from(id));
    properties.insert("area".to_string(), number(quad.area()));
    properties.insert("perimeter".to_string(), number(quad.perimeter()));
    properties.insert("max_cosine".to_string(), number(quad.max_cosine()));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
        id: Some(geojson::feature::Id::Number(serde_json::Number::from(id))),
        properties: Some(properties),
        foreign_members: None,
    }
}

impl RectangleAccumulator {
    /// Export every candidate as a polygon feature
    pub fn to_geojson(&self) -> FeatureCollection {
        let features = self.iter()
            .enumerate()
            .map(|(i, quad)| quad_feature(i, quad))
            .collect();

        let mut foreign_members = serde_json::Map::new();
        foreign_members.insert("image_count".to_string(), serde_json::Value::from(self.image_count()));
        foreign_members.insert("candidate_count".to_string(), serde_json::Value::from(self.len()));

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(foreign_members),
        }
    }

    /// Export to GeoJSON and serialize to JSON string
    pub fn to_geojson_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_geojson())?)
    }

    /// Save GeoJSON to file
    pub fn save_geojson<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_geojson_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{accumulator::{AccumulatorScope, RectangleAccumulator}, types::{Point, Quad}};

    fn accumulator() -> RectangleAccumulator {
        let mut acc = RectangleAccumulator::new();
        acc.begin_image(AccumulatorScope::Run);
        acc.accept(Quad::new([
            Point::new(0, 0),
            Point::new(40, 0),
            Point::new(40, 30),
            Point::new(0, 30),
        ]));
        acc
    }

    #[test]
    fn test_geojson_export() {
        let collection = accumulator().to_geojson();
        assert_eq!(collection.features.len(), 1);

        let feature = &collection.features[0];
        let properties = feature.properties.as_ref().expect("Should have properties");
        assert_eq!(properties["area"].as_f64(), Some(1200.0));
        assert_eq!(properties["perimeter"].as_f64(), Some(140.0));

        match &feature.geometry.as_ref().expect("Should have geometry").value {
            geojson::Value::Polygon(rings) => {
                assert_eq!(rings[0].len(), 5);
                assert_eq!(rings[0][0], rings[0][4]);
            }
            other => panic!("Expected polygon, got {:?}", other),
        }

        let members = collection.foreign_members.expect("Should have metadata");
        assert_eq!(members["candidate_count"], 1);
        assert_eq!(members["image_count"], 1);
    }

    #[test]
    fn test_save_geojson_round_trips_through_parser() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let path = dir.path().join("rects.geojson");
        accumulator().save_geojson(&path).expect("Should save");

        let text = std::fs::read_to_string(&path).expect("Should read");
        let parsed: geojson::FeatureCollection = text.parse().expect("Should parse");
        assert_eq!(parsed.features.len(), 1);
    }
}
