//! GeoJSON parcel input
//!
//! Only the outer ring of `Polygon` features is read. Other geometry types are
//! ignored with a warning. A ring with a malformed position is kept as a
//! per-feature error so the rest of the file is still measured.

use anyhow::{Context, Result};
use khasra_core::{GeoCoordinate, SurveyError, SurveyResult};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

/// One parcel read from the input file
#[derive(Debug, Clone, PartialEq)]
pub struct Parcel {
    pub id: String,
    /// Outer ring, or the reason it could not be read
    pub ring: SurveyResult<Vec<GeoCoordinate>>,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    #[serde(other)]
    Unsupported,
}

/// Read every Polygon parcel from a FeatureCollection file
pub fn read_parcels(path: &Path) -> Result<Vec<Parcel>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_parcels(&text).with_context(|| format!("failed to parse GeoJSON in {}", path.display()))
}

/// Parse every Polygon parcel from FeatureCollection text
pub fn parse_parcels(text: &str) -> Result<Vec<Parcel>> {
    let collection: FeatureCollection = serde_json::from_str(text)?;
    let mut parcels = Vec::with_capacity(collection.features.len());

    for (index, feature) in collection.features.into_iter().enumerate() {
        let id = feature_id(&feature, index);
        match feature.geometry {
            Some(Geometry::Polygon { coordinates }) => {
                let ring = match coordinates.into_iter().next() {
                    Some(outer) => outer_ring(outer),
                    None => Ok(Vec::new()),
                };
                parcels.push(Parcel { id, ring });
            }
            Some(Geometry::Unsupported) | None => {
                log::warn!("feature {id} is not a Polygon, ignoring it");
            }
        }
    }

    log::debug!("read {} parcels", parcels.len());
    Ok(parcels)
}

fn outer_ring(positions: Vec<Vec<f64>>) -> SurveyResult<Vec<GeoCoordinate>> {
    positions
        .into_iter()
        .enumerate()
        .map(|(index, position)| match position.as_slice() {
            [lon, lat, ..] => Ok(GeoCoordinate::new(*lon, *lat)),
            _ => Err(SurveyError::Geometry(format!(
                "position {index} needs a longitude and a latitude"
            ))),
        })
        .collect()
}

/// `properties.id`, then `properties.khasra`, then the feature id, then the index
fn feature_id(feature: &Feature, index: usize) -> String {
    let from_properties = feature.properties.as_ref().and_then(|props| {
        ["id", "khasra"].iter().find_map(|key| props.get(*key).and_then(id_text))
    });

    from_properties
        .or_else(|| feature.id.as_ref().and_then(id_text))
        .unwrap_or_else(|| index.to_string())
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_id_fallback_order() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "id": "f1", "properties": { "id": 7, "khasra": "K-1" },
                  "geometry": { "type": "Polygon", "coordinates": [] } },
                { "type": "Feature", "id": "f2", "properties": { "khasra": "K-2" },
                  "geometry": { "type": "Polygon", "coordinates": [] } },
                { "type": "Feature", "id": "f3", "properties": null,
                  "geometry": { "type": "Polygon", "coordinates": [] } },
                { "type": "Feature", "properties": { "id": "" },
                  "geometry": { "type": "Polygon", "coordinates": [] } }
            ]
        }"#;

        let ids: Vec<String> = parse_parcels(text).unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, ["7", "K-2", "f3", "3"]);
    }

    #[test]
    fn test_outer_ring_only() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "khasra": "12/4" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [
                        [[74.0, 31.0, 210.0], [74.001, 31.0], [74.001, 31.001], [74.0, 31.0]],
                        [[74.0002, 31.0002], [74.0004, 31.0002], [74.0004, 31.0004]]
                    ]
                }
            }]
        }"#;

        let parcels = parse_parcels(text).unwrap();
        assert_eq!(parcels.len(), 1);
        assert_eq!(parcels[0].id, "12/4");
        let ring = parcels[0].ring.as_ref().unwrap();
        assert_eq!(ring.len(), 4);
        assert_eq!(ring[0], GeoCoordinate::new(74.0, 31.0));
    }

    #[test]
    fn test_non_polygon_features_are_ignored() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": {},
                  "geometry": { "type": "Point", "coordinates": [74.0, 31.0] } },
                { "type": "Feature", "properties": {}, "geometry": null }
            ]
        }"#;

        assert!(parse_parcels(text).unwrap().is_empty());
    }

    #[test]
    fn test_short_position_only_affects_its_feature() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "id": "bad" },
                  "geometry": { "type": "Polygon", "coordinates": [[[74.0], [74.1, 31.0]]] } },
                { "type": "Feature", "properties": { "id": "good" },
                  "geometry": { "type": "Polygon",
                                "coordinates": [[[74.0, 31.0], [74.001, 31.0], [74.0, 31.001]]] } }
            ]
        }"#;

        let parcels = parse_parcels(text).unwrap();
        assert_eq!(parcels.len(), 2);

        let err = parcels[0].ring.as_ref().unwrap_err();
        assert!(err.is_geometry());
        assert!(err.to_string().contains("position 0"));
        assert_eq!(parcels[1].id, "good");
        assert_eq!(parcels[1].ring.as_ref().unwrap().len(), 3);
    }
}
