#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Located-asset domain types for the firewatch system.
//!
//! Hydrants and equipment cabinets are the two kinds of physically located
//! assets. Both carry an optional WGS84 coordinate and a denormalized list
//! of nearby assets of the opposite kind, recomputed whenever the asset's
//! own coordinate is written. Consumable items belong to a cabinet and are
//! evaluated by the alert engine for expiry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A WGS84 point in decimal degrees.
///
/// A coordinate either exists in full or not at all: assets store latitude
/// and longitude as separate optional fields and only yield a `Coordinate`
/// when both are present. `0.0` is a legitimate value (equator / prime
/// meridian), never a missing-value sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Combines two optional fields into a coordinate.
    ///
    /// Returns `None` unless both fields are present — a record with only
    /// one of the pair set is treated as having no location.
    #[must_use]
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Self {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

/// Capability shared by every located-asset kind.
///
/// Gives the proximity layer a uniform way to read an asset's identity,
/// canonical display label, and location without probing per-type fields.
pub trait Located {
    /// Stable record id.
    fn id(&self) -> i64;

    /// Canonical display label for nearby-asset listings.
    fn label(&self) -> &str;

    /// The asset's location, if both coordinate fields are set.
    fn coordinate(&self) -> Option<Coordinate>;
}

/// A denormalized reference to a nearby asset of the opposite kind.
///
/// This is a point-in-time snapshot taken when the *owning* asset's
/// coordinate was last written. It is not kept consistent with later moves
/// of the referenced asset; callers needing current data use the live
/// nearby query instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyRef {
    /// Id of the referenced asset.
    pub id: i64,
    /// Display label of the referenced asset at snapshot time.
    pub name: String,
    /// Distance in meters, rounded to 1 decimal. Always >= 0.
    pub distance_m: f64,
    /// Referenced asset's latitude at snapshot time.
    pub latitude: f64,
    /// Referenced asset's longitude at snapshot time.
    pub longitude: f64,
}

/// Operational status of a hydrant.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HydrantStatus {
    /// Fully functional.
    Operational,
    /// Functional but flagged for service.
    NeedsMaintenance,
    /// Not usable.
    OutOfService,
}

/// Readiness status of an equipment cabinet.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CabinetStatus {
    /// Fully stocked and usable.
    Ready,
    /// Missing equipment.
    Incomplete,
    /// Due for a stock check.
    NeedsCheck,
}

/// Kind of consumable equipment stored in a cabinet.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ItemType {
    /// Fire extinguisher — the only kind with expiry tracking.
    Extinguisher,
    /// Fire hose.
    Hose,
    /// Hose nozzle.
    Nozzle,
    /// First aid kit.
    FirstAidKit,
    /// Anything else.
    Other,
}

/// Condition of a consumable item.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ItemStatus {
    /// Present and serviceable.
    Good,
    /// Present but should be replaced.
    NeedsReplacement,
    /// Not found in the cabinet.
    Missing,
}

/// A fire hydrant record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hydrant {
    /// Primary key.
    pub id: i64,
    /// Short identifier, e.g. "H-001".
    pub name: String,
    /// Free-text location description.
    pub location: String,
    /// Latitude in decimal degrees, if surveyed.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees, if surveyed.
    pub longitude: Option<f64>,
    /// Operational status.
    pub status: HydrantStatus,
    /// Last measured pressure, free text (e.g. "5 bar").
    pub pressure: Option<String>,
    /// When the hydrant was last inspected.
    pub last_inspection: Option<DateTime<Utc>>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Record creation time.
    pub created_at: DateTime<Utc>,
    /// Cached nearby cabinets, recomputed when this hydrant's own
    /// coordinate is written.
    pub nearby_cabinets: Vec<NearbyRef>,
}

impl Located for Hydrant {
    fn id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.latitude, self.longitude)
    }
}

/// An equipment cabinet record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentCabinet {
    /// Primary key.
    pub id: i64,
    /// Short identifier, e.g. "Cabinet 7".
    pub name: String,
    /// Free-text location description.
    pub location: String,
    /// Latitude in decimal degrees, if surveyed.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees, if surveyed.
    pub longitude: Option<f64>,
    /// Readiness status.
    pub status: CabinetStatus,
    /// When the cabinet was last inspected.
    pub last_inspection: Option<DateTime<Utc>>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Record creation time.
    pub created_at: DateTime<Utc>,
    /// Cached nearby hydrants, recomputed when this cabinet's own
    /// coordinate is written.
    pub nearby_hydrants: Vec<NearbyRef>,
}

impl Located for EquipmentCabinet {
    fn id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.latitude, self.longitude)
    }
}

/// A consumable item stored in one equipment cabinet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumableItem {
    /// Primary key.
    pub id: i64,
    /// Owning cabinet id.
    pub cabinet_id: i64,
    /// Kind of item.
    pub item_type: ItemType,
    /// Display name, e.g. "Extinguisher 6kg".
    pub name: String,
    /// Expiry date, if the item has one.
    pub expiry_date: Option<DateTime<Utc>>,
    /// Condition.
    pub status: ItemStatus,
    /// Record creation time.
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a hydrant.
#[derive(Debug, Clone, Deserialize)]
pub struct NewHydrant {
    /// Short identifier.
    pub name: String,
    /// Free-text location description.
    pub location: String,
    /// Latitude in decimal degrees.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    pub longitude: Option<f64>,
    /// Operational status, defaults to operational.
    pub status: Option<HydrantStatus>,
    /// Last measured pressure.
    pub pressure: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Partial update for a hydrant. Absent fields keep their current value;
/// the coordinate fields distinguish absent (keep) from explicit `null`
/// (clear).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HydrantPatch {
    /// New name.
    pub name: Option<String>,
    /// New location description.
    pub location: Option<String>,
    /// `Some(None)` clears the latitude.
    #[serde(default, with = "double_option")]
    pub latitude: Option<Option<f64>>,
    /// `Some(None)` clears the longitude.
    #[serde(default, with = "double_option")]
    pub longitude: Option<Option<f64>>,
    /// New status.
    pub status: Option<HydrantStatus>,
    /// New pressure reading.
    pub pressure: Option<String>,
    /// New last-inspection time.
    pub last_inspection: Option<DateTime<Utc>>,
    /// New notes.
    pub notes: Option<String>,
}

/// Payload for creating an equipment cabinet.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCabinet {
    /// Short identifier.
    pub name: String,
    /// Free-text location description.
    pub location: String,
    /// Latitude in decimal degrees.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    pub longitude: Option<f64>,
    /// Readiness status, defaults to ready.
    pub status: Option<CabinetStatus>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Partial update for an equipment cabinet. Same absent-vs-null semantics
/// as [`HydrantPatch`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CabinetPatch {
    /// New name.
    pub name: Option<String>,
    /// New location description.
    pub location: Option<String>,
    /// `Some(None)` clears the latitude.
    #[serde(default, with = "double_option")]
    pub latitude: Option<Option<f64>>,
    /// `Some(None)` clears the longitude.
    #[serde(default, with = "double_option")]
    pub longitude: Option<Option<f64>>,
    /// New status.
    pub status: Option<CabinetStatus>,
    /// New last-inspection time.
    pub last_inspection: Option<DateTime<Utc>>,
    /// New notes.
    pub notes: Option<String>,
}

/// Payload for adding a consumable item to a cabinet.
#[derive(Debug, Clone, Deserialize)]
pub struct NewItem {
    /// Kind of item.
    pub item_type: ItemType,
    /// Display name.
    pub name: String,
    /// Expiry date, if tracked.
    pub expiry_date: Option<DateTime<Utc>>,
    /// Condition, defaults to good.
    pub status: Option<ItemStatus>,
}

/// Partial update for a consumable item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemPatch {
    /// New kind.
    pub item_type: Option<ItemType>,
    /// New display name.
    pub name: Option<String>,
    /// `Some(None)` clears the expiry date.
    #[serde(default, with = "double_option")]
    pub expiry_date: Option<Option<DateTime<Utc>>>,
    /// New condition.
    pub status: Option<ItemStatus>,
}

/// Deserializes `Option<Option<T>>` so a missing key stays `None` while an
/// explicit JSON `null` becomes `Some(None)`.
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
