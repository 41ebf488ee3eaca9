use crate::posts::normalize;
use crate::projection::{self, DEFAULT_HEIGHT, DEFAULT_WIDTH, lon_lat};
use geo::{Contains, Coord, LineString, MultiPolygon, Point, Polygon};
use geojson::{Feature, FeatureCollection, PolygonType, Value};
use tracing::{debug, info};

/// Canvas dimensions; a zero dimension falls back to the default view box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewBox {
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: if width > 0.0 { width } else { DEFAULT_WIDTH },
            height: if height > 0.0 { height } else { DEFAULT_HEIGHT },
        }
    }
}

impl Default for ViewBox {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

/// One interactive country shape.
#[derive(Clone, Debug)]
pub struct RegionShape {
    pub key: String,
    pub label: String,
    pub path: String,
    /// Geographic outline, kept for pointer hit-testing.
    pub outline: MultiPolygon<f64>,
    pub active: bool,
    pub selected: bool,
}

impl RegionShape {
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.outline.contains(&Point::new(lon, lat))
    }
}

fn to_polygon(rings: &PolygonType) -> Option<Polygon<f64>> {
    let mut lines = rings.iter().map(|ring| {
        LineString::from(
            ring.iter()
                .filter_map(lon_lat)
                .map(|(x, y)| Coord { x, y })
                .collect::<Vec<_>>(),
        )
    });
    let exterior = lines.next()?;
    Some(Polygon::new(exterior, lines.collect()))
}

fn feature_name(feature: &Feature, name_property: &str) -> String {
    feature
        .property(name_property)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

/// Builds a shape for one feature, or `None` when the feature is unusable.
pub fn render_feature(feature: &Feature, view: ViewBox, name_property: &str) -> Option<RegionShape> {
    let name = feature_name(feature, name_property);
    if name.trim().is_empty() {
        return None;
    }
    let geometry = feature.geometry.as_ref()?;

    let (path, polygons) = match &geometry.value {
        Value::Polygon(rings) if !rings.is_empty() => (
            projection::build_path(rings, view.width, view.height),
            to_polygon(rings).into_iter().collect::<Vec<_>>(),
        ),
        Value::MultiPolygon(polys) if !polys.is_empty() => (
            projection::build_multi_path(polys, view.width, view.height),
            polys.iter().filter_map(to_polygon).collect(),
        ),
        _ => return None,
    };
    if path.is_empty() {
        return None;
    }

    Some(RegionShape {
        key: normalize(&name),
        label: name,
        path,
        outline: MultiPolygon::new(polygons),
        active: false,
        selected: false,
    })
}

/// Renders every usable feature. Bad features are skipped one by one.
pub fn render_all(collection: &FeatureCollection, view: ViewBox, name_property: &str) -> Vec<RegionShape> {
    let shapes: Vec<RegionShape> = collection
        .features
        .iter()
        .filter_map(|feature| {
            let shape = render_feature(feature, view, name_property);
            if shape.is_none() {
                debug!(name = %feature_name(feature, name_property), "Skipping feature");
            }
            shape
        })
        .collect();
    info!(
        features = collection.features.len(),
        regions = shapes.len(),
        "Rendered map regions"
    );
    shapes
}

#[cfg(test)]
mod tests {
    use super::*;
    use geojson::GeoJson;
    use std::str::FromStr;

    fn collection(json: &str) -> FeatureCollection {
        match GeoJson::from_str(json).unwrap() {
            GeoJson::FeatureCollection(fc) => fc,
            other => panic!("expected a feature collection, got {other:?}"),
        }
    }

    #[test]
    fn polygon_feature_becomes_shape() {
        let fc = collection(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"name":"Wonderland"},
                 "geometry":{"type":"Polygon","coordinates":[[[0,0],[10,0],[10,10],[0,0]]]}}
            ]}"#,
        );
        let shapes = render_all(&fc, ViewBox::default(), "name");
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].key, "wonderland");
        assert_eq!(shapes[0].label, "Wonderland");
        assert!(shapes[0].path.starts_with("M500.00,250.00"));
        assert!(shapes[0].contains(7.0, 2.0));
        assert!(!shapes[0].contains(-7.0, 2.0));
        assert!(!shapes[0].active && !shapes[0].selected);
    }

    #[test]
    fn multipolygon_is_one_shape_with_two_subpaths() {
        let fc = collection(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"name":"Islands"},
                 "geometry":{"type":"MultiPolygon","coordinates":[
                    [[[0,0],[1,0],[1,1]]],
                    [[[5,5],[6,5],[6,6]]]
                 ]}}
            ]}"#,
        );
        let shapes = render_all(&fc, ViewBox::default(), "name");
        assert_eq!(shapes.len(), 1);
        let d = &shapes[0].path;
        assert_eq!(d.matches('M').count(), 2);
        assert_eq!(d.matches('Z').count(), 2);
        assert_eq!(shapes[0].outline.0.len(), 2);
    }

    #[test]
    fn unusable_features_are_skipped_individually() {
        let fc = collection(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"name":"NoGeometry"},"geometry":null},
                {"type":"Feature","properties":{"name":"Empty"},
                 "geometry":{"type":"Polygon","coordinates":[]}},
                {"type":"Feature","properties":{"name":"EmptyRings"},
                 "geometry":{"type":"MultiPolygon","coordinates":[[]]}},
                {"type":"Feature","properties":{},
                 "geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1]]]}},
                {"type":"Feature","properties":{"name":""},
                 "geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1]]]}},
                {"type":"Feature","properties":{"name":"   "},
                 "geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1]]]}},
                {"type":"Feature","properties":{"name":"Capital"},
                 "geometry":{"type":"Point","coordinates":[2,48]}},
                {"type":"Feature","properties":{"name":"Kept"},
                 "geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1]]]}}
            ]}"#,
        );
        let shapes = render_all(&fc, ViewBox::default(), "name");
        let labels: Vec<_> = shapes.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["Kept"]);
    }

    #[test]
    fn name_property_is_configurable() {
        let fc = collection(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"ADMIN":"Chile"},
                 "geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1]]]}}
            ]}"#,
        );
        assert!(render_all(&fc, ViewBox::default(), "name").is_empty());
        assert_eq!(render_all(&fc, ViewBox::default(), "ADMIN").len(), 1);
    }

    #[test]
    fn zero_view_box_uses_default() {
        assert_eq!(ViewBox::new(0.0, 0.0), ViewBox::default());
        assert_eq!(ViewBox::new(800.0, 0.0).height, DEFAULT_HEIGHT);
    }
}
