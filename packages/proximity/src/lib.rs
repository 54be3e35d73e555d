#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Great-circle distance and radius queries between located assets.
//!
//! The distance calculator is a pure haversine on a spherical Earth; the
//! radius query filters a candidate set to everything within a radius of an
//! origin, sorted ascending by distance. Both are deterministic functions
//! of their inputs with no I/O, so callers can invoke them concurrently
//! without locking.

use firewatch_asset_models::{Coordinate, Located, NearbyRef};

/// Mean Earth radius in meters (spherical model).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Radius used when materializing the cached nearby lists.
pub const DEFAULT_RADIUS_M: f64 = 100.0;

/// Errors from the radius query.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ProximityError {
    /// The caller passed a negative radius. Surfaced as an error rather
    /// than an empty result so caller bugs show up early.
    #[error("invalid radius {0}: must be non-negative")]
    InvalidRadius(f64),
}

/// Haversine great-circle distance in meters between two WGS84 points.
///
/// `a = sin²(Δφ/2) + cos φ1 · cos φ2 · sin²(Δλ/2)`,
/// `d = 2R · atan2(√a, √(1−a))`. Result is unrounded; callers round for
/// display. Symmetric, and zero for identical points.
#[must_use]
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let lat1_r = lat1.to_radians();
    let lat2_r = lat2.to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1_r.cos() * lat2_r.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// Distance in meters, or `None` when any of the four fields is absent.
///
/// A value of exactly `0.0` is a real point on the equator or prime
/// meridian and is never treated as missing.
#[must_use]
pub fn distance(
    lat1: Option<f64>,
    lon1: Option<f64>,
    lat2: Option<f64>,
    lon2: Option<f64>,
) -> Option<f64> {
    match (lat1, lon1, lat2, lon2) {
        (Some(lat1), Some(lon1), Some(lat2), Some(lon2)) => {
            Some(haversine_m(lat1, lon1, lat2, lon2))
        }
        _ => None,
    }
}

/// Rounds a distance to the canonical display precision (1 decimal meter).
///
/// One rule applied everywhere a [`NearbyRef`] is built, cached or live.
#[must_use]
pub fn round_distance_m(meters: f64) -> f64 {
    (meters * 10.0).round() / 10.0
}

/// Returns the candidates within `radius_m` of `origin`, ascending by
/// distance, as denormalized [`NearbyRef`] snapshots.
///
/// Candidates without a coordinate are skipped. A candidate exactly at the
/// radius is included. Ties preserve the candidates' input order (stable
/// sort, no secondary key). Filtering and ordering use the raw distance;
/// the stored `distance_m` is rounded via [`round_distance_m`].
///
/// # Errors
///
/// Returns [`ProximityError::InvalidRadius`] if `radius_m` is negative.
pub fn nearby<T: Located>(
    origin: Coordinate,
    candidates: &[T],
    radius_m: f64,
) -> Result<Vec<NearbyRef>, ProximityError> {
    if radius_m < 0.0 {
        return Err(ProximityError::InvalidRadius(radius_m));
    }

    let mut within: Vec<(f64, NearbyRef)> = candidates
        .iter()
        .filter_map(|candidate| {
            let coord = candidate.coordinate()?;
            let meters =
                haversine_m(origin.latitude, origin.longitude, coord.latitude, coord.longitude);
            (meters <= radius_m).then(|| {
                (
                    meters,
                    NearbyRef {
                        id: candidate.id(),
                        name: candidate.label().to_string(),
                        distance_m: round_distance_m(meters),
                        latitude: coord.latitude,
                        longitude: coord.longitude,
                    },
                )
            })
        })
        .collect();

    within.sort_by(|a, b| a.0.total_cmp(&b.0));

    Ok(within.into_iter().map(|(_, nearby_ref)| nearby_ref).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Point {
        id: i64,
        name: &'static str,
        latitude: Option<f64>,
        longitude: Option<f64>,
    }

    impl Located for Point {
        fn id(&self) -> i64 {
            self.id
        }

        fn label(&self) -> &str {
            self.name
        }

        fn coordinate(&self) -> Option<Coordinate> {
            Coordinate::from_parts(self.latitude, self.longitude)
        }
    }

    fn point(id: i64, latitude: f64, longitude: f64) -> Point {
        Point {
            id,
            name: "p",
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }

    const ORIGIN: Coordinate = Coordinate {
        latitude: 31.4117,
        longitude: 34.6667,
    };

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let meters = haversine_m(0.0, 0.0, 0.0, 1.0);
        assert!(
            (meters - 111_195.0).abs() < 50.0,
            "expected ~111195m, got {meters}"
        );
    }

    #[test]
    fn seed_coordinates_are_meters_apart() {
        // ~0.0001 degrees of latitude is ~11.1m.
        let meters = haversine_m(31.4117, 34.6667, 31.4118, 34.6667);
        assert!((meters - 11.1).abs() < 1.0, "expected ~11.1m, got {meters}");
    }

    #[test]
    fn distance_is_symmetric() {
        let forward = haversine_m(31.4117, 34.6667, 31.4125, 34.6665);
        let backward = haversine_m(31.4125, 34.6665, 31.4117, 34.6667);
        assert!((forward - backward).abs() / forward < 1e-6);
    }

    #[test]
    fn distance_to_self_is_zero() {
        assert!(haversine_m(31.4117, 34.6667, 31.4117, 34.6667).abs() < 1e-9);
        assert!(haversine_m(0.0, 0.0, 0.0, 0.0).abs() < 1e-9);
    }

    #[test]
    fn absent_input_propagates() {
        assert_eq!(distance(None, Some(34.6), Some(31.4), Some(34.6)), None);
        assert_eq!(distance(Some(31.4), None, Some(31.4), Some(34.6)), None);
        assert_eq!(distance(Some(31.4), Some(34.6), None, Some(34.6)), None);
        assert_eq!(distance(Some(31.4), Some(34.6), Some(31.4), None), None);
    }

    #[test]
    fn zero_coordinates_are_not_absent() {
        let meters = distance(Some(0.0), Some(0.0), Some(0.0), Some(1.0));
        assert!(meters.is_some());
        assert!(meters.unwrap() > 100_000.0);
    }

    #[test]
    fn results_sorted_ascending_by_distance() {
        // Offsets of ~50m, ~10m, ~30m north of the origin.
        let candidates = vec![
            point(1, ORIGIN.latitude + 0.00045, ORIGIN.longitude),
            point(2, ORIGIN.latitude + 0.00009, ORIGIN.longitude),
            point(3, ORIGIN.latitude + 0.00027, ORIGIN.longitude),
        ];

        let refs = nearby(ORIGIN, &candidates, 100.0).unwrap();
        let ids: Vec<i64> = refs.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert!(refs[0].distance_m < refs[1].distance_m);
        assert!(refs[1].distance_m < refs[2].distance_m);
    }

    #[test]
    fn equal_distances_preserve_input_order() {
        // Same offset east and east again: identical latitude/longitude
        // deltas produce identical distances.
        let candidates = vec![
            point(7, ORIGIN.latitude, ORIGIN.longitude + 0.0003),
            point(8, ORIGIN.latitude, ORIGIN.longitude + 0.0003),
        ];

        let refs = nearby(ORIGIN, &candidates, 100.0).unwrap();
        let ids: Vec<i64> = refs.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![7, 8]);
    }

    #[test]
    fn candidate_exactly_at_radius_is_included() {
        let target = point(1, ORIGIN.latitude + 0.0003, ORIGIN.longitude);
        let exact = haversine_m(
            ORIGIN.latitude,
            ORIGIN.longitude,
            target.latitude.unwrap(),
            target.longitude.unwrap(),
        );

        let refs = nearby(ORIGIN, &[target], exact).unwrap();
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn candidates_without_coordinates_are_skipped() {
        let candidates = vec![
            Point {
                id: 1,
                name: "no-coords",
                latitude: None,
                longitude: None,
            },
            Point {
                id: 2,
                name: "half",
                latitude: Some(ORIGIN.latitude),
                longitude: None,
            },
            point(3, ORIGIN.latitude, ORIGIN.longitude),
        ];

        let refs = nearby(ORIGIN, &candidates, 100.0).unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].id, 3);
    }

    #[test]
    fn negative_radius_is_rejected() {
        let candidates = vec![point(1, ORIGIN.latitude, ORIGIN.longitude)];
        let err = nearby(ORIGIN, &candidates, -1.0).unwrap_err();
        assert_eq!(err, ProximityError::InvalidRadius(-1.0));
    }

    #[test]
    fn distances_round_to_one_decimal() {
        assert!((round_distance_m(11.14999) - 11.1).abs() < f64::EPSILON);
        assert!((round_distance_m(11.15001) - 11.2).abs() < f64::EPSILON);
        assert!((round_distance_m(0.0) - 0.0).abs() < f64::EPSILON);
    }
}
