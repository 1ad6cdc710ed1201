//! Ward boundary input.
//!
//! Wards arrive as GeoJSON feature collections. Each feature carries
//! a numeric ward identifier and a display name in its properties;
//! which properties those are varies by publisher, so the keys are
//! arguments rather than constants.

use crate::ZonalError;
use geo::{
    geometry::{Geometry, MultiPolygon, Point, Rect},
    BoundingRect,
};
use geojson::GeoJson;
use log::warn;
use serde_json::Value;
use std::{collections::BTreeSet, fs::File, path::Path};

/// An administrative ward: a numeric identifier, a display name, and
/// a boundary.
///
/// Identifiers are unique within a ward set and fit a `u8`; that is
/// what lets a rasterized ward grid use a single byte per cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Ward {
    pub id: u8,
    pub name: String,
    pub boundary: MultiPolygon<f64>,
}

/// Loads a ward set from a GeoJSON feature collection.
///
/// `id_property` and `name_property` name the feature properties
/// holding the ward number and ward name. Duplicate ids and ids
/// outside `u8` range are errors; geometry must be polygonal.
pub fn from_geojson<P: AsRef<Path>>(
    path: P,
    id_property: &str,
    name_property: &str,
) -> Result<Vec<Ward>, ZonalError> {
    let collection = match GeoJson::from_reader(File::open(path.as_ref())?)? {
        GeoJson::FeatureCollection(collection) => collection,
        _ => return Err(ZonalError::NotAFeatureCollection),
    };

    let mut wards = Vec::with_capacity(collection.features.len());
    let mut seen = BTreeSet::new();
    for (idx, feature) in collection.features.into_iter().enumerate() {
        let properties = feature.properties.unwrap_or_default();
        let id = properties
            .get(id_property)
            .and_then(numeric)
            .ok_or_else(|| ZonalError::MissingProperty(idx, id_property.to_string()))?;
        let id = u8::try_from(id).map_err(|_| ZonalError::WardIdRange(id))?;
        if !seen.insert(id) {
            return Err(ZonalError::DuplicateWardId(id));
        }
        let name = properties
            .get(name_property)
            .and_then(Value::as_str)
            .ok_or_else(|| ZonalError::MissingProperty(idx, name_property.to_string()))?
            .to_string();
        let geometry = feature
            .geometry
            .ok_or_else(|| ZonalError::UnsupportedGeometry(name.clone()))?;
        let boundary = match Geometry::<f64>::try_from(geometry.value)? {
            Geometry::Polygon(polygon) => MultiPolygon(vec![polygon]),
            Geometry::MultiPolygon(multi) => multi,
            _ => return Err(ZonalError::UnsupportedGeometry(name)),
        };
        wards.push(Ward { id, name, boundary });
    }
    Ok(wards)
}

/// Loads point features (bus stops, in the source data) from a
/// GeoJSON feature collection. Non-point features are skipped with a
/// warning.
pub fn points_from_geojson<P: AsRef<Path>>(path: P) -> Result<Vec<Point<f64>>, ZonalError> {
    let collection = match GeoJson::from_reader(File::open(path.as_ref())?)? {
        GeoJson::FeatureCollection(collection) => collection,
        _ => return Err(ZonalError::NotAFeatureCollection),
    };

    let mut points = Vec::with_capacity(collection.features.len());
    for (idx, feature) in collection.features.into_iter().enumerate() {
        let Some(geometry) = feature.geometry else {
            continue;
        };
        match Geometry::<f64>::try_from(geometry.value)? {
            Geometry::Point(point) => points.push(point),
            _ => warn!("feature {idx} is not a point, skipping"),
        }
    }
    Ok(points)
}

/// Returns the bounding rectangle of a ward set.
pub fn bounds(wards: &[Ward]) -> Option<Rect<f64>> {
    let mut rect: Option<Rect<f64>> = None;
    for ward in wards {
        let Some(ward_rect) = ward.boundary.bounding_rect() else {
            continue;
        };
        rect = Some(match rect {
            None => ward_rect,
            Some(rect) => {
                let min = rect.min();
                let max = rect.max();
                let wmin = ward_rect.min();
                let wmax = ward_rect.max();
                Rect::new(
                    (min.x.min(wmin.x), min.y.min(wmin.y)),
                    (max.x.max(wmax.x), max.y.max(wmax.y)),
                )
            }
        });
    }
    rect
}

fn numeric(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{bounds, from_geojson, points_from_geojson, Ward};
    use crate::ZonalError;
    use geo::{geometry::MultiPolygon, polygon};
    use std::{io::Write, path::PathBuf};

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn two_wards_geojson() -> &'static str {
        r#"{
          "type": "FeatureCollection",
          "features": [
            {
              "type": "Feature",
              "properties": {"WARDNUMBER": 1, "wardname": "Anfield"},
              "geometry": {
                "type": "Polygon",
                "coordinates": [[[0, 0], [2, 0], [2, 2], [0, 2], [0, 0]]]
              }
            },
            {
              "type": "Feature",
              "properties": {"WARDNUMBER": "2", "wardname": "Childwall"},
              "geometry": {
                "type": "MultiPolygon",
                "coordinates": [[[[3, 0], [5, 0], [5, 2], [3, 2], [3, 0]]]]
              }
            }
          ]
        }"#
    }

    #[test]
    fn test_from_geojson() {
        let path = write_temp("zonal-wards-test.geojson", two_wards_geojson());
        let wards = from_geojson(&path, "WARDNUMBER", "wardname").unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(wards.len(), 2);
        assert_eq!(wards[0].id, 1);
        assert_eq!(wards[0].name, "Anfield");
        // String-typed ward numbers parse too.
        assert_eq!(wards[1].id, 2);
        assert_eq!(wards[1].name, "Childwall");
    }

    #[test]
    fn test_missing_id_property_is_error() {
        let path = write_temp("zonal-wards-noid-test.geojson", two_wards_geojson());
        let result = from_geojson(&path, "nope", "wardname");
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ZonalError::MissingProperty(0, _))));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let geojson = two_wards_geojson().replace("\"2\"", "1");
        let path = write_temp("zonal-wards-dup-test.geojson", &geojson);
        let result = from_geojson(&path, "WARDNUMBER", "wardname");
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ZonalError::DuplicateWardId(1))));
    }

    #[test]
    fn test_points_from_geojson() {
        let geojson = r#"{
          "type": "FeatureCollection",
          "features": [
            {"type": "Feature", "properties": {},
             "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}},
            {"type": "Feature", "properties": {},
             "geometry": {"type": "Point", "coordinates": [3.0, 4.0]}}
          ]
        }"#;
        let path = write_temp("zonal-points-test.geojson", geojson);
        let points = points_from_geojson(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(points.len(), 2);
        assert_eq!((points[0].x(), points[0].y()), (1.0, 2.0));
    }

    #[test]
    fn test_bounds_covers_all_wards() {
        let wards = vec![
            Ward {
                id: 1,
                name: "a".to_string(),
                boundary: MultiPolygon(vec![polygon![
                    (x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 0.0),
                ]]),
            },
            Ward {
                id: 2,
                name: "b".to_string(),
                boundary: MultiPolygon(vec![polygon![
                    (x: 3.0, y: 1.0), (x: 5.0, y: 1.0), (x: 5.0, y: 4.0), (x: 3.0, y: 1.0),
                ]]),
            },
        ];
        let rect = bounds(&wards).unwrap();
        assert_eq!((rect.min().x, rect.min().y), (0.0, 0.0));
        assert_eq!((rect.max().x, rect.max().y), (5.0, 4.0));
    }
}
