//! `GeoJSON` export of every located asset for the map view.

use firewatch_asset_models::{Coordinate, EquipmentCabinet, Hydrant, Located as _};
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, json};

/// Builds a `FeatureCollection` of Point features for every hydrant and
/// cabinet that has a coordinate. Assets without one are left out rather
/// than placed at a sentinel location.
pub fn feature_collection(
    hydrants: &[Hydrant],
    cabinets: &[EquipmentCabinet],
) -> FeatureCollection {
    let mut features = Vec::with_capacity(hydrants.len() + cabinets.len());

    for hydrant in hydrants {
        if let Some(coord) = hydrant.coordinate() {
            features.push(point_feature(
                "hydrant",
                hydrant.id,
                &hydrant.name,
                hydrant.status.as_ref(),
                coord,
            ));
        }
    }
    for cabinet in cabinets {
        if let Some(coord) = cabinet.coordinate() {
            features.push(point_feature(
                "equipment_cabinet",
                cabinet.id,
                &cabinet.name,
                cabinet.status.as_ref(),
                coord,
            ));
        }
    }

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// One Point feature. `GeoJSON` positions are `[longitude, latitude]`.
fn point_feature(kind: &str, id: i64, name: &str, status: &str, coord: Coordinate) -> Feature {
    let mut properties = Map::new();
    properties.insert("type".to_string(), json!(kind));
    properties.insert("id".to_string(), json!(id));
    properties.insert("name".to_string(), json!(name));
    properties.insert("status".to_string(), json!(status));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![
            coord.longitude,
            coord.latitude,
        ]))),
        id: Some(Id::Number(id.into())),
        properties: Some(properties),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use firewatch_asset_models::HydrantStatus;

    fn hydrant(id: i64, latitude: Option<f64>, longitude: Option<f64>) -> Hydrant {
        Hydrant {
            id,
            name: format!("H-{id:03}"),
            location: "test".to_string(),
            latitude,
            longitude,
            status: HydrantStatus::Operational,
            pressure: None,
            last_inspection: None,
            notes: None,
            created_at: Utc::now(),
            nearby_cabinets: Vec::new(),
        }
    }

    #[test]
    fn skips_assets_without_coordinates() {
        let hydrants = vec![
            hydrant(1, Some(31.4117), Some(34.6667)),
            hydrant(2, None, None),
            hydrant(3, Some(31.4125), None),
        ];
        let collection = feature_collection(&hydrants, &[]);
        assert_eq!(collection.features.len(), 1);
    }

    #[test]
    fn point_positions_are_lon_lat() {
        let hydrants = vec![hydrant(1, Some(31.4117), Some(34.6667))];
        let collection = feature_collection(&hydrants, &[]);

        let geometry = collection.features[0].geometry.as_ref().unwrap();
        match &geometry.value {
            Value::Point(position) => {
                assert!((position[0] - 34.6667).abs() < f64::EPSILON);
                assert!((position[1] - 31.4117).abs() < f64::EPSILON);
            }
            other => panic!("expected a point, got {other:?}"),
        }
    }

    #[test]
    fn properties_carry_kind_and_status() {
        let hydrants = vec![hydrant(1, Some(31.4117), Some(34.6667))];
        let collection = feature_collection(&hydrants, &[]);

        let properties = collection.features[0].properties.as_ref().unwrap();
        assert_eq!(properties["type"], json!("hydrant"));
        assert_eq!(properties["status"], json!("operational"));
        assert_eq!(properties["name"], json!("H-001"));
    }
}
