#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! In-memory record store for the firewatch system.
//!
//! Owns the asset, task, and personnel collections behind a single
//! `RwLock` and exposes typed CRUD operations with the partial-update
//! semantics of the original API (absent payload fields keep current
//! values). The store is also where the write-time geospatial hooks live:
//! writing an asset's coordinate rematerializes that asset's cached
//! nearby list against the current set of the opposite asset kind. The
//! proximity and alert computations themselves stay in their own crates;
//! the store only hands them snapshots.

mod stats;

pub use stats::{
    CabinetStats, DashboardStats, HydrantStats, MaintenanceStats, TaskStats, TeamStats,
    VolunteerStats,
};

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use firewatch_asset_models::{
    CabinetPatch, CabinetStatus, ConsumableItem, EquipmentCabinet, Hydrant,
    HydrantPatch, HydrantStatus, ItemPatch, ItemStatus, Located as _, NearbyRef, NewCabinet,
    NewHydrant, NewItem,
};
use firewatch_ops_models::{
    Activity, ActivityPatch, ActivityStatus, ActivityType, MaintenanceRecord,
    MaintenanceRecordPatch, MaintenanceType, NewActivity, NewMaintenanceRecord, NewTask, NewTeam,
    NewVolunteer, SubjectKind, Task, TaskPatch, TaskStatus, Team, TeamPatch, TeamStatus,
    Volunteer, VolunteerPatch, VolunteerStatus,
};
use firewatch_proximity::{DEFAULT_RADIUS_M, ProximityError};
use serde::Deserialize;

/// Errors from store operations.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StoreError {
    /// No record of the named kind with the given id.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind, e.g. "hydrant".
        entity: &'static str,
        /// The missing id.
        id: i64,
    },

    /// The origin asset of a nearby query has no coordinates. Distinct
    /// from a query that finds zero neighbors.
    #[error("{entity} {id} has no coordinates")]
    NoCoordinates {
        /// Entity kind.
        entity: &'static str,
        /// The asset id.
        id: i64,
    },

    /// Invalid radius passed to a nearby query.
    #[error(transparent)]
    Proximity(#[from] ProximityError),
}

/// An inspection submission for a hydrant.
///
/// Stamps the hydrant's last-inspection time and appends a maintenance
/// record in one operation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InspectionReport {
    /// New operational status, if it changed.
    pub status: Option<HydrantStatus>,
    /// Measured pressure, free text.
    pub pressure: Option<String>,
    /// What was checked.
    pub description: Option<String>,
    /// Who performed the inspection.
    pub performed_by: Option<String>,
}

/// Read-only snapshot of the collections the alert engine evaluates.
#[derive(Debug, Clone)]
pub struct AlertSnapshot {
    /// All hydrants, id order.
    pub hydrants: Vec<Hydrant>,
    /// All consumable items, id order.
    pub items: Vec<ConsumableItem>,
    /// All equipment cabinets, id order.
    pub cabinets: Vec<EquipmentCabinet>,
    /// All tasks, id order.
    pub tasks: Vec<Task>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    teams: BTreeMap<i64, Team>,
    volunteers: BTreeMap<i64, Volunteer>,
    hydrants: BTreeMap<i64, Hydrant>,
    cabinets: BTreeMap<i64, EquipmentCabinet>,
    items: BTreeMap<i64, ConsumableItem>,
    tasks: BTreeMap<i64, Task>,
    maintenance: BTreeMap<i64, MaintenanceRecord>,
    activities: BTreeMap<i64, Activity>,
}

impl Inner {
    fn alloc(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Rebuilds one hydrant's cached nearby-cabinet list from its current
    /// coordinate. Called only when that hydrant's own coordinate was
    /// written; other writes leave the cache as a documented-stale
    /// snapshot.
    fn refresh_hydrant_cache(&mut self, id: i64) {
        let Some(hydrant) = self.hydrants.get(&id) else {
            return;
        };
        let refs = hydrant.coordinate().map_or_else(Vec::new, |coord| {
            let candidates: Vec<EquipmentCabinet> = self.cabinets.values().cloned().collect();
            // The default radius is non-negative, so this cannot fail.
            firewatch_proximity::nearby(coord, &candidates, DEFAULT_RADIUS_M).unwrap_or_default()
        });
        if let Some(hydrant) = self.hydrants.get_mut(&id) {
            log::debug!("recomputed nearby cache for hydrant {id}: {} refs", refs.len());
            hydrant.nearby_cabinets = refs;
        }
    }

    /// Mirror of [`Self::refresh_hydrant_cache`] for cabinets.
    fn refresh_cabinet_cache(&mut self, id: i64) {
        let Some(cabinet) = self.cabinets.get(&id) else {
            return;
        };
        let refs = cabinet.coordinate().map_or_else(Vec::new, |coord| {
            let candidates: Vec<Hydrant> = self.hydrants.values().cloned().collect();
            firewatch_proximity::nearby(coord, &candidates, DEFAULT_RADIUS_M).unwrap_or_default()
        });
        if let Some(cabinet) = self.cabinets.get_mut(&id) {
            log::debug!("recomputed nearby cache for cabinet {id}: {} refs", refs.len());
            cabinet.nearby_hydrants = refs;
        }
    }
}

/// The in-memory record store.
///
/// Cheap to share behind an `Arc`; all methods take `&self`. Reads return
/// cloned records so callers never hold the lock across their own work.
#[derive(Default)]
pub struct Store {
    inner: RwLock<Inner>,
}

impl Store {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().expect("store lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().expect("store lock poisoned")
    }

    // ── Teams ───────────────────────────────────────────

    /// Lists all teams in id order.
    #[must_use]
    pub fn list_teams(&self) -> Vec<Team> {
        self.read().teams.values().cloned().collect()
    }

    /// Fetches one team.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub fn get_team(&self, id: i64) -> Result<Team, StoreError> {
        self.read()
            .teams
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { entity: "team", id })
    }

    /// Creates a team.
    pub fn create_team(&self, new: NewTeam, now: DateTime<Utc>) -> Team {
        let mut inner = self.write();
        let id = inner.alloc();
        let team = Team {
            id,
            name: new.name,
            leader: new.leader,
            members: new.members,
            status: new.status.unwrap_or(TeamStatus::Available),
            phone: new.phone,
            created_at: now,
        };
        inner.teams.insert(id, team.clone());
        team
    }

    /// Applies a partial update to a team.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub fn update_team(&self, id: i64, patch: TeamPatch) -> Result<Team, StoreError> {
        let mut inner = self.write();
        let team = inner
            .teams
            .get_mut(&id)
            .ok_or(StoreError::NotFound { entity: "team", id })?;
        if let Some(name) = patch.name {
            team.name = name;
        }
        if let Some(leader) = patch.leader {
            team.leader = leader;
        }
        if let Some(members) = patch.members {
            team.members = Some(members);
        }
        if let Some(status) = patch.status {
            team.status = status;
        }
        if let Some(phone) = patch.phone {
            team.phone = Some(phone);
        }
        Ok(team.clone())
    }

    /// Deletes a team.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub fn delete_team(&self, id: i64) -> Result<(), StoreError> {
        self.write()
            .teams
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound { entity: "team", id })
    }

    // ── Volunteers ──────────────────────────────────────

    /// Lists volunteers, optionally filtered by status.
    #[must_use]
    pub fn list_volunteers(&self, status: Option<VolunteerStatus>) -> Vec<Volunteer> {
        self.read()
            .volunteers
            .values()
            .filter(|v| status.is_none_or(|s| v.status == s))
            .cloned()
            .collect()
    }

    /// Fetches one volunteer.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub fn get_volunteer(&self, id: i64) -> Result<Volunteer, StoreError> {
        self.read().volunteers.get(&id).cloned().ok_or(StoreError::NotFound {
            entity: "volunteer",
            id,
        })
    }

    /// Creates a volunteer.
    pub fn create_volunteer(&self, new: NewVolunteer, now: DateTime<Utc>) -> Volunteer {
        let mut inner = self.write();
        let id = inner.alloc();
        let volunteer = Volunteer {
            id,
            name: new.name,
            phone: new.phone,
            email: new.email,
            specialization: new.specialization,
            status: new.status.unwrap_or(VolunteerStatus::Available),
            skills: new.skills,
            availability_hours: new.availability_hours,
            notes: new.notes,
            created_at: now,
        };
        inner.volunteers.insert(id, volunteer.clone());
        volunteer
    }

    /// Applies a partial update to a volunteer.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub fn update_volunteer(&self, id: i64, patch: VolunteerPatch) -> Result<Volunteer, StoreError> {
        let mut inner = self.write();
        let volunteer = inner.volunteers.get_mut(&id).ok_or(StoreError::NotFound {
            entity: "volunteer",
            id,
        })?;
        if let Some(name) = patch.name {
            volunteer.name = name;
        }
        if let Some(phone) = patch.phone {
            volunteer.phone = Some(phone);
        }
        if let Some(email) = patch.email {
            volunteer.email = Some(email);
        }
        if let Some(specialization) = patch.specialization {
            volunteer.specialization = Some(specialization);
        }
        if let Some(status) = patch.status {
            volunteer.status = status;
        }
        if let Some(skills) = patch.skills {
            volunteer.skills = Some(skills);
        }
        if let Some(hours) = patch.availability_hours {
            volunteer.availability_hours = Some(hours);
        }
        if let Some(notes) = patch.notes {
            volunteer.notes = Some(notes);
        }
        Ok(volunteer.clone())
    }

    /// Deletes a volunteer.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub fn delete_volunteer(&self, id: i64) -> Result<(), StoreError> {
        self.write().volunteers.remove(&id).map(|_| ()).ok_or(StoreError::NotFound {
            entity: "volunteer",
            id,
        })
    }

    // ── Hydrants ────────────────────────────────────────

    /// Lists all hydrants in id order.
    #[must_use]
    pub fn list_hydrants(&self) -> Vec<Hydrant> {
        self.read().hydrants.values().cloned().collect()
    }

    /// Fetches one hydrant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub fn get_hydrant(&self, id: i64) -> Result<Hydrant, StoreError> {
        self.read().hydrants.get(&id).cloned().ok_or(StoreError::NotFound {
            entity: "hydrant",
            id,
        })
    }

    /// Creates a hydrant. A coordinate in the payload materializes the
    /// nearby-cabinet cache immediately.
    pub fn create_hydrant(&self, new: NewHydrant, now: DateTime<Utc>) -> Hydrant {
        let mut inner = self.write();
        let id = inner.alloc();
        let hydrant = Hydrant {
            id,
            name: new.name,
            location: new.location,
            latitude: new.latitude,
            longitude: new.longitude,
            status: new.status.unwrap_or(HydrantStatus::Operational),
            pressure: new.pressure,
            last_inspection: None,
            notes: new.notes,
            created_at: now,
            nearby_cabinets: Vec::new(),
        };
        inner.hydrants.insert(id, hydrant);
        inner.refresh_hydrant_cache(id);
        inner.hydrants[&id].clone()
    }

    /// Applies a partial update to a hydrant. A write that touches either
    /// coordinate field recomputes the nearby-cabinet cache; clearing the
    /// coordinate (explicit `null`) clears the cache.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub fn update_hydrant(&self, id: i64, patch: HydrantPatch) -> Result<Hydrant, StoreError> {
        let mut inner = self.write();
        let hydrant = inner.hydrants.get_mut(&id).ok_or(StoreError::NotFound {
            entity: "hydrant",
            id,
        })?;

        let coordinate_written = patch.latitude.is_some() || patch.longitude.is_some();

        if let Some(name) = patch.name {
            hydrant.name = name;
        }
        if let Some(location) = patch.location {
            hydrant.location = location;
        }
        if let Some(latitude) = patch.latitude {
            hydrant.latitude = latitude;
        }
        if let Some(longitude) = patch.longitude {
            hydrant.longitude = longitude;
        }
        if let Some(status) = patch.status {
            hydrant.status = status;
        }
        if let Some(pressure) = patch.pressure {
            hydrant.pressure = Some(pressure);
        }
        if let Some(last_inspection) = patch.last_inspection {
            hydrant.last_inspection = Some(last_inspection);
        }
        if let Some(notes) = patch.notes {
            hydrant.notes = Some(notes);
        }

        if coordinate_written {
            inner.refresh_hydrant_cache(id);
        }
        Ok(inner.hydrants[&id].clone())
    }

    /// Deletes a hydrant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub fn delete_hydrant(&self, id: i64) -> Result<(), StoreError> {
        self.write().hydrants.remove(&id).map(|_| ()).ok_or(StoreError::NotFound {
            entity: "hydrant",
            id,
        })
    }

    /// Live nearby-cabinet query for one hydrant.
    ///
    /// Unlike the cached list this always reflects the current cabinet
    /// set. `radius_m` defaults to [`DEFAULT_RADIUS_M`] at the API layer.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown hydrant,
    /// [`StoreError::NoCoordinates`] when it has no location (distinct
    /// from zero neighbors), or [`StoreError::Proximity`] for a negative
    /// radius.
    pub fn nearby_cabinets(&self, id: i64, radius_m: f64) -> Result<Vec<NearbyRef>, StoreError> {
        let inner = self.read();
        let hydrant = inner.hydrants.get(&id).ok_or(StoreError::NotFound {
            entity: "hydrant",
            id,
        })?;
        let coord = hydrant.coordinate().ok_or(StoreError::NoCoordinates {
            entity: "hydrant",
            id,
        })?;
        let candidates: Vec<EquipmentCabinet> = inner.cabinets.values().cloned().collect();
        Ok(firewatch_proximity::nearby(coord, &candidates, radius_m)?)
    }

    /// Records an inspection: stamps `last_inspection = now`, applies the
    /// optional status/pressure, and appends a maintenance record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the hydrant id is unknown.
    pub fn record_inspection(
        &self,
        id: i64,
        report: InspectionReport,
        now: DateTime<Utc>,
    ) -> Result<(Hydrant, MaintenanceRecord), StoreError> {
        let mut inner = self.write();
        let hydrant = inner.hydrants.get_mut(&id).ok_or(StoreError::NotFound {
            entity: "hydrant",
            id,
        })?;

        hydrant.last_inspection = Some(now);
        if let Some(status) = report.status {
            hydrant.status = status;
        }
        if let Some(pressure) = report.pressure {
            hydrant.pressure = Some(pressure);
        }
        let hydrant = hydrant.clone();

        let record_id = inner.alloc();
        let record = MaintenanceRecord {
            id: record_id,
            subject_kind: SubjectKind::Hydrant,
            subject_id: Some(id),
            subject_name: hydrant.name.clone(),
            maintenance_type: MaintenanceType::Inspection,
            description: report.description,
            performed_by: report.performed_by,
            date: now,
            cost: None,
            notes: None,
            created_at: now,
        };
        inner.maintenance.insert(record_id, record.clone());

        Ok((hydrant, record))
    }

    // ── Equipment cabinets ──────────────────────────────

    /// Lists all cabinets in id order.
    #[must_use]
    pub fn list_cabinets(&self) -> Vec<EquipmentCabinet> {
        self.read().cabinets.values().cloned().collect()
    }

    /// Fetches one cabinet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub fn get_cabinet(&self, id: i64) -> Result<EquipmentCabinet, StoreError> {
        self.read().cabinets.get(&id).cloned().ok_or(StoreError::NotFound {
            entity: "cabinet",
            id,
        })
    }

    /// Creates a cabinet. A coordinate in the payload materializes the
    /// nearby-hydrant cache immediately.
    pub fn create_cabinet(&self, new: NewCabinet, now: DateTime<Utc>) -> EquipmentCabinet {
        let mut inner = self.write();
        let id = inner.alloc();
        let cabinet = EquipmentCabinet {
            id,
            name: new.name,
            location: new.location,
            latitude: new.latitude,
            longitude: new.longitude,
            status: new.status.unwrap_or(CabinetStatus::Ready),
            last_inspection: None,
            notes: new.notes,
            created_at: now,
            nearby_hydrants: Vec::new(),
        };
        inner.cabinets.insert(id, cabinet);
        inner.refresh_cabinet_cache(id);
        inner.cabinets[&id].clone()
    }

    /// Applies a partial update to a cabinet, with the same coordinate /
    /// cache semantics as [`Self::update_hydrant`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub fn update_cabinet(&self, id: i64, patch: CabinetPatch) -> Result<EquipmentCabinet, StoreError> {
        let mut inner = self.write();
        let cabinet = inner.cabinets.get_mut(&id).ok_or(StoreError::NotFound {
            entity: "cabinet",
            id,
        })?;

        let coordinate_written = patch.latitude.is_some() || patch.longitude.is_some();

        if let Some(name) = patch.name {
            cabinet.name = name;
        }
        if let Some(location) = patch.location {
            cabinet.location = location;
        }
        if let Some(latitude) = patch.latitude {
            cabinet.latitude = latitude;
        }
        if let Some(longitude) = patch.longitude {
            cabinet.longitude = longitude;
        }
        if let Some(status) = patch.status {
            cabinet.status = status;
        }
        if let Some(last_inspection) = patch.last_inspection {
            cabinet.last_inspection = Some(last_inspection);
        }
        if let Some(notes) = patch.notes {
            cabinet.notes = Some(notes);
        }

        if coordinate_written {
            inner.refresh_cabinet_cache(id);
        }
        Ok(inner.cabinets[&id].clone())
    }

    /// Deletes a cabinet and the consumable items it holds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub fn delete_cabinet(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.write();
        inner.cabinets.remove(&id).ok_or(StoreError::NotFound {
            entity: "cabinet",
            id,
        })?;
        inner.items.retain(|_, item| item.cabinet_id != id);
        Ok(())
    }

    /// Live nearby-hydrant query for one cabinet. Mirror of
    /// [`Self::nearby_cabinets`].
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::nearby_cabinets`].
    pub fn nearby_hydrants(&self, id: i64, radius_m: f64) -> Result<Vec<NearbyRef>, StoreError> {
        let inner = self.read();
        let cabinet = inner.cabinets.get(&id).ok_or(StoreError::NotFound {
            entity: "cabinet",
            id,
        })?;
        let coord = cabinet.coordinate().ok_or(StoreError::NoCoordinates {
            entity: "cabinet",
            id,
        })?;
        let candidates: Vec<Hydrant> = inner.hydrants.values().cloned().collect();
        Ok(firewatch_proximity::nearby(coord, &candidates, radius_m)?)
    }

    // ── Consumable items ────────────────────────────────

    /// Lists the items in one cabinet, id order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the cabinet id is unknown.
    pub fn list_items(&self, cabinet_id: i64) -> Result<Vec<ConsumableItem>, StoreError> {
        let inner = self.read();
        if !inner.cabinets.contains_key(&cabinet_id) {
            return Err(StoreError::NotFound {
                entity: "cabinet",
                id: cabinet_id,
            });
        }
        Ok(inner
            .items
            .values()
            .filter(|item| item.cabinet_id == cabinet_id)
            .cloned()
            .collect())
    }

    /// Adds a consumable item to a cabinet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the cabinet id is unknown.
    pub fn create_item(
        &self,
        cabinet_id: i64,
        new: NewItem,
        now: DateTime<Utc>,
    ) -> Result<ConsumableItem, StoreError> {
        let mut inner = self.write();
        if !inner.cabinets.contains_key(&cabinet_id) {
            return Err(StoreError::NotFound {
                entity: "cabinet",
                id: cabinet_id,
            });
        }
        let id = inner.alloc();
        let item = ConsumableItem {
            id,
            cabinet_id,
            item_type: new.item_type,
            name: new.name,
            expiry_date: new.expiry_date,
            status: new.status.unwrap_or(ItemStatus::Good),
            created_at: now,
        };
        inner.items.insert(id, item.clone());
        Ok(item)
    }

    /// Applies a partial update to a consumable item.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub fn update_item(&self, id: i64, patch: ItemPatch) -> Result<ConsumableItem, StoreError> {
        let mut inner = self.write();
        let item = inner
            .items
            .get_mut(&id)
            .ok_or(StoreError::NotFound { entity: "item", id })?;
        if let Some(item_type) = patch.item_type {
            item.item_type = item_type;
        }
        if let Some(name) = patch.name {
            item.name = name;
        }
        if let Some(expiry_date) = patch.expiry_date {
            item.expiry_date = expiry_date;
        }
        if let Some(status) = patch.status {
            item.status = status;
        }
        Ok(item.clone())
    }

    /// Deletes a consumable item.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub fn delete_item(&self, id: i64) -> Result<(), StoreError> {
        self.write()
            .items
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound { entity: "item", id })
    }

    // ── Tasks ───────────────────────────────────────────

    /// Lists tasks, optionally filtered by status.
    #[must_use]
    pub fn list_tasks(&self, status: Option<TaskStatus>) -> Vec<Task> {
        self.read()
            .tasks
            .values()
            .filter(|t| status.is_none_or(|s| t.status == s))
            .cloned()
            .collect()
    }

    /// Fetches one task.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub fn get_task(&self, id: i64) -> Result<Task, StoreError> {
        self.read()
            .tasks
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { entity: "task", id })
    }

    /// Creates a task.
    pub fn create_task(&self, new: NewTask, now: DateTime<Utc>) -> Task {
        let mut inner = self.write();
        let id = inner.alloc();
        let task = Task {
            id,
            title: new.title,
            description: new.description,
            priority: new.priority.unwrap_or(firewatch_ops_models::TaskPriority::Medium),
            status: new.status.unwrap_or(TaskStatus::New),
            assigned_to: new.assigned_to,
            due_date: new.due_date,
            completed_date: None,
            notes: new.notes,
            created_at: now,
        };
        inner.tasks.insert(id, task.clone());
        task
    }

    /// Applies a partial update to a task. Transitioning to completed
    /// without an explicit completion time stamps `now`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub fn update_task(
        &self,
        id: i64,
        patch: TaskPatch,
        now: DateTime<Utc>,
    ) -> Result<Task, StoreError> {
        let mut inner = self.write();
        let task = inner
            .tasks
            .get_mut(&id)
            .ok_or(StoreError::NotFound { entity: "task", id })?;
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = Some(description);
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(assigned_to) = patch.assigned_to {
            task.assigned_to = Some(assigned_to);
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if let Some(completed_date) = patch.completed_date {
            task.completed_date = Some(completed_date);
        } else if task.status == TaskStatus::Completed && task.completed_date.is_none() {
            task.completed_date = Some(now);
        }
        Ok(task.clone())
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub fn delete_task(&self, id: i64) -> Result<(), StoreError> {
        self.write()
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound { entity: "task", id })
    }

    // ── Maintenance records ─────────────────────────────

    /// Lists maintenance records, newest first, optionally filtered by
    /// subject kind and id.
    #[must_use]
    pub fn list_maintenance(
        &self,
        subject_kind: Option<SubjectKind>,
        subject_id: Option<i64>,
    ) -> Vec<MaintenanceRecord> {
        let mut records: Vec<MaintenanceRecord> = self
            .read()
            .maintenance
            .values()
            .filter(|r| subject_kind.is_none_or(|k| r.subject_kind == k))
            .filter(|r| subject_id.is_none_or(|i| r.subject_id == Some(i)))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        records
    }

    /// Fetches one maintenance record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub fn get_maintenance(&self, id: i64) -> Result<MaintenanceRecord, StoreError> {
        self.read().maintenance.get(&id).cloned().ok_or(StoreError::NotFound {
            entity: "maintenance record",
            id,
        })
    }

    /// Logs a maintenance record.
    pub fn create_maintenance(
        &self,
        new: NewMaintenanceRecord,
        now: DateTime<Utc>,
    ) -> MaintenanceRecord {
        let mut inner = self.write();
        let id = inner.alloc();
        let record = MaintenanceRecord {
            id,
            subject_kind: new.subject_kind,
            subject_id: new.subject_id,
            subject_name: new.subject_name,
            maintenance_type: new.maintenance_type.unwrap_or(MaintenanceType::Routine),
            description: new.description,
            performed_by: new.performed_by,
            date: new.date.unwrap_or(now),
            cost: new.cost,
            notes: new.notes,
            created_at: now,
        };
        inner.maintenance.insert(id, record.clone());
        record
    }

    /// Applies a partial update to a maintenance record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub fn update_maintenance(
        &self,
        id: i64,
        patch: MaintenanceRecordPatch,
    ) -> Result<MaintenanceRecord, StoreError> {
        let mut inner = self.write();
        let record = inner.maintenance.get_mut(&id).ok_or(StoreError::NotFound {
            entity: "maintenance record",
            id,
        })?;
        if let Some(subject_kind) = patch.subject_kind {
            record.subject_kind = subject_kind;
        }
        if let Some(subject_id) = patch.subject_id {
            record.subject_id = Some(subject_id);
        }
        if let Some(subject_name) = patch.subject_name {
            record.subject_name = subject_name;
        }
        if let Some(maintenance_type) = patch.maintenance_type {
            record.maintenance_type = maintenance_type;
        }
        if let Some(description) = patch.description {
            record.description = Some(description);
        }
        if let Some(performed_by) = patch.performed_by {
            record.performed_by = Some(performed_by);
        }
        if let Some(date) = patch.date {
            record.date = date;
        }
        if let Some(cost) = patch.cost {
            record.cost = Some(cost);
        }
        if let Some(notes) = patch.notes {
            record.notes = Some(notes);
        }
        Ok(record.clone())
    }

    /// Deletes a maintenance record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub fn delete_maintenance(&self, id: i64) -> Result<(), StoreError> {
        self.write().maintenance.remove(&id).map(|_| ()).ok_or(StoreError::NotFound {
            entity: "maintenance record",
            id,
        })
    }

    // ── Activities ──────────────────────────────────────

    /// Lists activities, optionally filtered by type and status.
    #[must_use]
    pub fn list_activities(
        &self,
        activity_type: Option<ActivityType>,
        status: Option<ActivityStatus>,
    ) -> Vec<Activity> {
        self.read()
            .activities
            .values()
            .filter(|a| activity_type.is_none_or(|t| a.activity_type == t))
            .filter(|a| status.is_none_or(|s| a.status == s))
            .cloned()
            .collect()
    }

    /// Fetches one activity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub fn get_activity(&self, id: i64) -> Result<Activity, StoreError> {
        self.read().activities.get(&id).cloned().ok_or(StoreError::NotFound {
            entity: "activity",
            id,
        })
    }

    /// Creates an activity.
    pub fn create_activity(&self, new: NewActivity, now: DateTime<Utc>) -> Activity {
        let mut inner = self.write();
        let id = inner.alloc();
        let activity = Activity {
            id,
            title: new.title,
            description: new.description,
            activity_type: new.activity_type.unwrap_or(ActivityType::Training),
            participants: new.participants,
            location: new.location,
            date: new.date,
            duration: new.duration,
            outcome: new.outcome,
            improvements_needed: new.improvements_needed,
            status: new.status.unwrap_or(ActivityStatus::Planned),
            created_by: new.created_by,
            created_at: now,
        };
        inner.activities.insert(id, activity.clone());
        activity
    }

    /// Applies a partial update to an activity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub fn update_activity(&self, id: i64, patch: ActivityPatch) -> Result<Activity, StoreError> {
        let mut inner = self.write();
        let activity = inner.activities.get_mut(&id).ok_or(StoreError::NotFound {
            entity: "activity",
            id,
        })?;
        if let Some(title) = patch.title {
            activity.title = title;
        }
        if let Some(description) = patch.description {
            activity.description = Some(description);
        }
        if let Some(activity_type) = patch.activity_type {
            activity.activity_type = activity_type;
        }
        if let Some(participants) = patch.participants {
            activity.participants = Some(participants);
        }
        if let Some(location) = patch.location {
            activity.location = Some(location);
        }
        if let Some(date) = patch.date {
            activity.date = Some(date);
        }
        if let Some(duration) = patch.duration {
            activity.duration = Some(duration);
        }
        if let Some(outcome) = patch.outcome {
            activity.outcome = Some(outcome);
        }
        if let Some(improvements) = patch.improvements_needed {
            activity.improvements_needed = Some(improvements);
        }
        if let Some(status) = patch.status {
            activity.status = status;
        }
        if let Some(created_by) = patch.created_by {
            activity.created_by = Some(created_by);
        }
        Ok(activity.clone())
    }

    /// Deletes an activity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub fn delete_activity(&self, id: i64) -> Result<(), StoreError> {
        self.write().activities.remove(&id).map(|_| ()).ok_or(StoreError::NotFound {
            entity: "activity",
            id,
        })
    }

    // ── Dashboard ───────────────────────────────────────

    /// Snapshot of the collections the alert engine needs.
    #[must_use]
    pub fn alert_snapshot(&self) -> AlertSnapshot {
        let inner = self.read();
        AlertSnapshot {
            hydrants: inner.hydrants.values().cloned().collect(),
            items: inner.items.values().cloned().collect(),
            cabinets: inner.cabinets.values().cloned().collect(),
            tasks: inner.tasks.values().cloned().collect(),
        }
    }

    /// Per-collection totals and status breakdowns for the dashboard.
    #[must_use]
    pub fn dashboard_stats(&self, now: DateTime<Utc>) -> DashboardStats {
        stats::compute(&self.read(), now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn seed_hydrant(latitude: Option<f64>, longitude: Option<f64>) -> NewHydrant {
        NewHydrant {
            name: "H-001".to_string(),
            location: "Near dining hall".to_string(),
            latitude,
            longitude,
            status: None,
            pressure: Some("5 bar".to_string()),
            notes: None,
        }
    }

    fn seed_cabinet(name: &str, latitude: f64, longitude: f64) -> NewCabinet {
        NewCabinet {
            name: name.to_string(),
            location: "test".to_string(),
            latitude: Some(latitude),
            longitude: Some(longitude),
            status: None,
            notes: None,
        }
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let store = Store::new();
        let first = store.create_hydrant(seed_hydrant(None, None), now());
        let second = store.create_hydrant(seed_hydrant(None, None), now());
        assert!(second.id > first.id);
    }

    #[test]
    fn partial_update_keeps_absent_fields() {
        let store = Store::new();
        let hydrant = store.create_hydrant(seed_hydrant(Some(31.4117), Some(34.6667)), now());

        let patch = HydrantPatch {
            status: Some(HydrantStatus::NeedsMaintenance),
            ..HydrantPatch::default()
        };
        let updated = store.update_hydrant(hydrant.id, patch).unwrap();

        assert_eq!(updated.status, HydrantStatus::NeedsMaintenance);
        assert_eq!(updated.name, "H-001");
        assert_eq!(updated.pressure.as_deref(), Some("5 bar"));
        assert_eq!(updated.latitude, Some(31.4117));
    }

    #[test]
    fn creating_hydrant_with_coordinates_materializes_cache() {
        let store = Store::new();
        // ~11m and ~90m from the hydrant below.
        store.create_cabinet(seed_cabinet("Cabinet 7", 31.4118, 34.6667), now());
        store.create_cabinet(seed_cabinet("Cabinet 12", 31.4125, 34.6667), now());

        let hydrant = store.create_hydrant(seed_hydrant(Some(31.4117), Some(34.6667)), now());

        assert_eq!(hydrant.nearby_cabinets.len(), 2);
        assert_eq!(hydrant.nearby_cabinets[0].name, "Cabinet 7");
        assert!(hydrant.nearby_cabinets[0].distance_m < hydrant.nearby_cabinets[1].distance_m);
    }

    #[test]
    fn cache_is_stale_until_own_coordinate_rewritten() {
        let store = Store::new();
        let hydrant = store.create_hydrant(seed_hydrant(Some(31.4117), Some(34.6667)), now());
        assert!(hydrant.nearby_cabinets.is_empty());

        // A cabinet appearing later does not touch the hydrant's cache...
        store.create_cabinet(seed_cabinet("Cabinet 7", 31.4118, 34.6667), now());
        assert!(store.get_hydrant(hydrant.id).unwrap().nearby_cabinets.is_empty());

        // ...until the hydrant's own coordinate is written again.
        let patch = HydrantPatch {
            latitude: Some(Some(31.4117)),
            ..HydrantPatch::default()
        };
        let updated = store.update_hydrant(hydrant.id, patch).unwrap();
        assert_eq!(updated.nearby_cabinets.len(), 1);

        // The live query sees the cabinet either way.
        let live = store.nearby_cabinets(hydrant.id, DEFAULT_RADIUS_M).unwrap();
        assert_eq!(live.len(), 1);
    }

    #[test]
    fn clearing_coordinate_clears_cache() {
        let store = Store::new();
        store.create_cabinet(seed_cabinet("Cabinet 7", 31.4118, 34.6667), now());
        let hydrant = store.create_hydrant(seed_hydrant(Some(31.4117), Some(34.6667)), now());
        assert_eq!(hydrant.nearby_cabinets.len(), 1);

        let patch = HydrantPatch {
            latitude: Some(None),
            ..HydrantPatch::default()
        };
        let updated = store.update_hydrant(hydrant.id, patch).unwrap();
        assert!(updated.nearby_cabinets.is_empty());
    }

    #[test]
    fn nearby_query_distinguishes_no_coordinates_from_no_neighbors() {
        let store = Store::new();
        let located = store.create_hydrant(seed_hydrant(Some(31.4117), Some(34.6667)), now());
        let unlocated = store.create_hydrant(seed_hydrant(None, None), now());

        assert_eq!(store.nearby_cabinets(located.id, 100.0), Ok(Vec::new()));
        assert_eq!(
            store.nearby_cabinets(unlocated.id, 100.0),
            Err(StoreError::NoCoordinates {
                entity: "hydrant",
                id: unlocated.id,
            })
        );
        assert!(matches!(
            store.nearby_cabinets(9999, 100.0),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn negative_radius_surfaces_validation_error() {
        let store = Store::new();
        let hydrant = store.create_hydrant(seed_hydrant(Some(31.4117), Some(34.6667)), now());
        assert!(matches!(
            store.nearby_cabinets(hydrant.id, -5.0),
            Err(StoreError::Proximity(ProximityError::InvalidRadius(_)))
        ));
    }

    #[test]
    fn inspection_stamps_hydrant_and_logs_maintenance() {
        let store = Store::new();
        let hydrant = store.create_hydrant(seed_hydrant(None, None), now());

        let report = InspectionReport {
            status: Some(HydrantStatus::Operational),
            pressure: Some("4.5 bar".to_string()),
            description: Some("routine check".to_string()),
            performed_by: Some("dispatcher".to_string()),
        };
        let (updated, record) = store.record_inspection(hydrant.id, report, now()).unwrap();

        assert_eq!(updated.last_inspection, Some(now()));
        assert_eq!(updated.pressure.as_deref(), Some("4.5 bar"));
        assert_eq!(record.subject_kind, SubjectKind::Hydrant);
        assert_eq!(record.subject_id, Some(hydrant.id));
        assert_eq!(record.maintenance_type, MaintenanceType::Inspection);
        assert_eq!(
            store.list_maintenance(Some(SubjectKind::Hydrant), Some(hydrant.id)).len(),
            1
        );
    }

    #[test]
    fn completing_task_stamps_completion_time() {
        let store = Store::new();
        let task = store.create_task(
            NewTask {
                title: "hose check".to_string(),
                description: None,
                priority: None,
                status: None,
                assigned_to: None,
                due_date: None,
                notes: None,
            },
            now(),
        );
        assert_eq!(task.completed_date, None);

        let patch = TaskPatch {
            status: Some(TaskStatus::Completed),
            ..TaskPatch::default()
        };
        let updated = store.update_task(task.id, patch, now()).unwrap();
        assert_eq!(updated.completed_date, Some(now()));
    }

    #[test]
    fn deleting_cabinet_removes_its_items() {
        let store = Store::new();
        let cabinet = store.create_cabinet(seed_cabinet("Cabinet 7", 31.4118, 34.6667), now());
        let item = store
            .create_item(
                cabinet.id,
                NewItem {
                    item_type: firewatch_asset_models::ItemType::Extinguisher,
                    name: "Extinguisher 6kg".to_string(),
                    expiry_date: None,
                    status: None,
                },
                now(),
            )
            .unwrap();

        store.delete_cabinet(cabinet.id).unwrap();
        assert!(matches!(
            store.update_item(item.id, ItemPatch::default()),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn task_list_filters_by_status() {
        let store = Store::new();
        let new_task = |status| NewTask {
            title: "t".to_string(),
            description: None,
            priority: None,
            status: Some(status),
            assigned_to: None,
            due_date: None,
            notes: None,
        };
        store.create_task(new_task(TaskStatus::New), now());
        store.create_task(new_task(TaskStatus::Completed), now());

        assert_eq!(store.list_tasks(None).len(), 2);
        assert_eq!(store.list_tasks(Some(TaskStatus::New)).len(), 1);
        assert_eq!(store.list_tasks(Some(TaskStatus::Cancelled)).len(), 0);
    }
}
