//! HTTP handler functions for the firewatch API.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use firewatch_asset_models::{CabinetPatch, HydrantPatch, ItemPatch, NewCabinet, NewHydrant, NewItem};
use firewatch_ops_models::{
    ActivityPatch, MaintenanceRecordPatch, NewActivity, NewMaintenanceRecord, NewTask, NewTeam,
    NewVolunteer, TaskPatch, TeamPatch, VolunteerPatch,
};
use firewatch_proximity::{DEFAULT_RADIUS_M, ProximityError};
use firewatch_server_models::{
    ActivityQueryParams, ApiAlertSummary, ApiHealth, ApiMessage, MaintenanceQueryParams,
    NearbyQueryParams, TaskQueryParams, VolunteerQueryParams,
};
use firewatch_store::{InspectionReport, StoreError};
use serde::Serialize;

use crate::{AppState, map};

/// How many alerts the dashboard summary carries. Truncation is
/// presentation only; the totals always cover the full list.
const ALERT_DISPLAY_LIMIT: usize = 20;

fn error_response(err: &StoreError) -> HttpResponse {
    let body = serde_json::json!({ "error": err.to_string() });
    match err {
        StoreError::NotFound { .. } => HttpResponse::NotFound().json(body),
        StoreError::NoCoordinates { .. } => HttpResponse::Conflict().json(body),
        StoreError::Proximity(ProximityError::InvalidRadius(_)) => {
            HttpResponse::BadRequest().json(body)
        }
    }
}

fn respond<T: Serialize>(result: Result<T, StoreError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(err) => error_response(&err),
    }
}

fn respond_deleted(result: Result<(), StoreError>, entity: &str) -> HttpResponse {
    match result {
        Ok(()) => HttpResponse::Ok().json(ApiMessage {
            message: format!("{entity} deleted"),
        }),
        Err(err) => error_response(&err),
    }
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ── Teams ───────────────────────────────────────────────

/// `GET /api/teams`
pub async fn list_teams(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.store.list_teams())
}

/// `POST /api/teams`
pub async fn create_team(state: web::Data<AppState>, body: web::Json<NewTeam>) -> HttpResponse {
    HttpResponse::Created().json(state.store.create_team(body.into_inner(), Utc::now()))
}

/// `GET /api/teams/{id}`
pub async fn get_team(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    respond(state.store.get_team(path.into_inner()))
}

/// `PUT /api/teams/{id}`
pub async fn update_team(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<TeamPatch>,
) -> HttpResponse {
    respond(state.store.update_team(path.into_inner(), body.into_inner()))
}

/// `DELETE /api/teams/{id}`
pub async fn delete_team(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    respond_deleted(state.store.delete_team(path.into_inner()), "team")
}

// ── Volunteers ──────────────────────────────────────────

/// `GET /api/volunteers`
pub async fn list_volunteers(
    state: web::Data<AppState>,
    params: web::Query<VolunteerQueryParams>,
) -> HttpResponse {
    HttpResponse::Ok().json(state.store.list_volunteers(params.status))
}

/// `POST /api/volunteers`
pub async fn create_volunteer(
    state: web::Data<AppState>,
    body: web::Json<NewVolunteer>,
) -> HttpResponse {
    HttpResponse::Created().json(state.store.create_volunteer(body.into_inner(), Utc::now()))
}

/// `GET /api/volunteers/{id}`
pub async fn get_volunteer(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    respond(state.store.get_volunteer(path.into_inner()))
}

/// `PUT /api/volunteers/{id}`
pub async fn update_volunteer(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<VolunteerPatch>,
) -> HttpResponse {
    respond(
        state
            .store
            .update_volunteer(path.into_inner(), body.into_inner()),
    )
}

/// `DELETE /api/volunteers/{id}`
pub async fn delete_volunteer(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    respond_deleted(state.store.delete_volunteer(path.into_inner()), "volunteer")
}

// ── Hydrants ────────────────────────────────────────────

/// `GET /api/hydrants`
pub async fn list_hydrants(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.store.list_hydrants())
}

/// `POST /api/hydrants`
pub async fn create_hydrant(
    state: web::Data<AppState>,
    body: web::Json<NewHydrant>,
) -> HttpResponse {
    HttpResponse::Created().json(state.store.create_hydrant(body.into_inner(), Utc::now()))
}

/// `GET /api/hydrants/map`
///
/// `GeoJSON` export of every located hydrant and cabinet.
pub async fn map_features(state: web::Data<AppState>) -> HttpResponse {
    let collection =
        map::feature_collection(&state.store.list_hydrants(), &state.store.list_cabinets());
    HttpResponse::Ok().json(collection)
}

/// `GET /api/hydrants/{id}`
pub async fn get_hydrant(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    respond(state.store.get_hydrant(path.into_inner()))
}

/// `PUT /api/hydrants/{id}`
pub async fn update_hydrant(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<HydrantPatch>,
) -> HttpResponse {
    respond(
        state
            .store
            .update_hydrant(path.into_inner(), body.into_inner()),
    )
}

/// `DELETE /api/hydrants/{id}`
pub async fn delete_hydrant(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    respond_deleted(state.store.delete_hydrant(path.into_inner()), "hydrant")
}

/// `GET /api/hydrants/{id}/nearby-cabinets?radius=`
///
/// Live proximity query, as opposed to the cached `nearby_cabinets` list
/// on the hydrant record itself.
pub async fn nearby_cabinets(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    params: web::Query<NearbyQueryParams>,
) -> HttpResponse {
    let radius_m = params.radius.unwrap_or(DEFAULT_RADIUS_M);
    respond(state.store.nearby_cabinets(path.into_inner(), radius_m))
}

/// `POST /api/hydrants/{id}/inspection`
pub async fn record_inspection(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<InspectionReport>,
) -> HttpResponse {
    match state
        .store
        .record_inspection(path.into_inner(), body.into_inner(), Utc::now())
    {
        Ok((hydrant, record)) => HttpResponse::Created().json(serde_json::json!({
            "hydrant": hydrant,
            "record": record,
        })),
        Err(err) => error_response(&err),
    }
}

// ── Equipment cabinets ──────────────────────────────────

/// `GET /api/equipment-cabinets`
pub async fn list_cabinets(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.store.list_cabinets())
}

/// `POST /api/equipment-cabinets`
pub async fn create_cabinet(
    state: web::Data<AppState>,
    body: web::Json<NewCabinet>,
) -> HttpResponse {
    HttpResponse::Created().json(state.store.create_cabinet(body.into_inner(), Utc::now()))
}

/// `GET /api/equipment-cabinets/{id}`
pub async fn get_cabinet(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    respond(state.store.get_cabinet(path.into_inner()))
}

/// `PUT /api/equipment-cabinets/{id}`
pub async fn update_cabinet(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<CabinetPatch>,
) -> HttpResponse {
    respond(
        state
            .store
            .update_cabinet(path.into_inner(), body.into_inner()),
    )
}

/// `DELETE /api/equipment-cabinets/{id}`
pub async fn delete_cabinet(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    respond_deleted(state.store.delete_cabinet(path.into_inner()), "cabinet")
}

/// `GET /api/equipment-cabinets/{id}/nearby-hydrants?radius=`
pub async fn nearby_hydrants(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    params: web::Query<NearbyQueryParams>,
) -> HttpResponse {
    let radius_m = params.radius.unwrap_or(DEFAULT_RADIUS_M);
    respond(state.store.nearby_hydrants(path.into_inner(), radius_m))
}

// ── Consumable items ────────────────────────────────────

/// `GET /api/equipment-cabinets/{id}/items`
pub async fn list_items(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    respond(state.store.list_items(path.into_inner()))
}

/// `POST /api/equipment-cabinets/{id}/items`
pub async fn create_item(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<NewItem>,
) -> HttpResponse {
    match state
        .store
        .create_item(path.into_inner(), body.into_inner(), Utc::now())
    {
        Ok(item) => HttpResponse::Created().json(item),
        Err(err) => error_response(&err),
    }
}

/// `PUT /api/items/{id}`
pub async fn update_item(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<ItemPatch>,
) -> HttpResponse {
    respond(state.store.update_item(path.into_inner(), body.into_inner()))
}

/// `DELETE /api/items/{id}`
pub async fn delete_item(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    respond_deleted(state.store.delete_item(path.into_inner()), "item")
}

// ── Tasks ───────────────────────────────────────────────

/// `GET /api/tasks?status=`
pub async fn list_tasks(
    state: web::Data<AppState>,
    params: web::Query<TaskQueryParams>,
) -> HttpResponse {
    HttpResponse::Ok().json(state.store.list_tasks(params.status))
}

/// `POST /api/tasks`
pub async fn create_task(state: web::Data<AppState>, body: web::Json<NewTask>) -> HttpResponse {
    HttpResponse::Created().json(state.store.create_task(body.into_inner(), Utc::now()))
}

/// `GET /api/tasks/{id}`
pub async fn get_task(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    respond(state.store.get_task(path.into_inner()))
}

/// `PUT /api/tasks/{id}`
pub async fn update_task(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<TaskPatch>,
) -> HttpResponse {
    respond(
        state
            .store
            .update_task(path.into_inner(), body.into_inner(), Utc::now()),
    )
}

/// `DELETE /api/tasks/{id}`
pub async fn delete_task(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    respond_deleted(state.store.delete_task(path.into_inner()), "task")
}

// ── Maintenance log ─────────────────────────────────────

/// `GET /api/maintenance?subjectKind=&subjectId=`
pub async fn list_maintenance(
    state: web::Data<AppState>,
    params: web::Query<MaintenanceQueryParams>,
) -> HttpResponse {
    HttpResponse::Ok().json(
        state
            .store
            .list_maintenance(params.subject_kind, params.subject_id),
    )
}

/// `POST /api/maintenance`
pub async fn create_maintenance(
    state: web::Data<AppState>,
    body: web::Json<NewMaintenanceRecord>,
) -> HttpResponse {
    HttpResponse::Created().json(state.store.create_maintenance(body.into_inner(), Utc::now()))
}

/// `GET /api/maintenance/{id}`
pub async fn get_maintenance(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    respond(state.store.get_maintenance(path.into_inner()))
}

/// `PUT /api/maintenance/{id}`
pub async fn update_maintenance(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<MaintenanceRecordPatch>,
) -> HttpResponse {
    respond(
        state
            .store
            .update_maintenance(path.into_inner(), body.into_inner()),
    )
}

/// `DELETE /api/maintenance/{id}`
pub async fn delete_maintenance(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    respond_deleted(
        state.store.delete_maintenance(path.into_inner()),
        "maintenance record",
    )
}

// ── Activities ──────────────────────────────────────────

/// `GET /api/activities?activityType=&status=`
pub async fn list_activities(
    state: web::Data<AppState>,
    params: web::Query<ActivityQueryParams>,
) -> HttpResponse {
    HttpResponse::Ok().json(
        state
            .store
            .list_activities(params.activity_type, params.status),
    )
}

/// `POST /api/activities`
pub async fn create_activity(
    state: web::Data<AppState>,
    body: web::Json<NewActivity>,
) -> HttpResponse {
    HttpResponse::Created().json(state.store.create_activity(body.into_inner(), Utc::now()))
}

/// `GET /api/activities/{id}`
pub async fn get_activity(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    respond(state.store.get_activity(path.into_inner()))
}

/// `PUT /api/activities/{id}`
pub async fn update_activity(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<ActivityPatch>,
) -> HttpResponse {
    respond(
        state
            .store
            .update_activity(path.into_inner(), body.into_inner()),
    )
}

/// `DELETE /api/activities/{id}`
pub async fn delete_activity(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    respond_deleted(state.store.delete_activity(path.into_inner()), "activity")
}

// ── Dashboard ───────────────────────────────────────────

/// `GET /api/dashboard/stats`
pub async fn dashboard_stats(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.store.dashboard_stats(Utc::now()))
}

/// `GET /api/dashboard/alerts`
///
/// Runs the rule engine over a store snapshot and returns severity totals
/// plus a display-bounded alert list.
pub async fn dashboard_alerts(state: web::Data<AppState>) -> HttpResponse {
    let snapshot = state.store.alert_snapshot();
    let alerts = firewatch_alerts::evaluate(
        &snapshot.hydrants,
        &snapshot.items,
        &snapshot.cabinets,
        &snapshot.tasks,
        Utc::now(),
    );
    HttpResponse::Ok().json(ApiAlertSummary::from_alerts(alerts, ALERT_DISPLAY_LIMIT))
}
