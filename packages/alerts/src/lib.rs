#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Maintenance-alert rule engine.
//!
//! Evaluates three independent rules over snapshots of the hydrant,
//! consumable-item, and task collections and returns a severity-tagged
//! alert list for the dashboard. The engine is a pure function of its
//! inputs and the injected `now`: it performs no I/O, never reads the
//! clock, never mutates its inputs, and yields identical output for
//! identical calls. Alerts are transient and recomputed on every request;
//! there is no alert store.

use chrono::{DateTime, Duration, Utc};
use firewatch_asset_models::{ConsumableItem, EquipmentCabinet, Hydrant, ItemType};
use firewatch_ops_models::{Task, TaskPriority};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A hydrant is due for inspection this many days after its last one.
pub const INSPECTION_DUE_DAYS: i64 = 165;

/// Extinguishers expiring within this many days raise an alert.
pub const EXPIRY_WINDOW_DAYS: i64 = 30;

/// How urgent an alert is.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlertSeverity {
    /// Needs attention soon.
    Warning,
    /// Needs attention now.
    Critical,
}

/// Which rule produced an alert.
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
pub enum AlertKind {
    /// Hydrant inspection overdue or never recorded.
    HydrantInspection,
    /// Extinguisher expired or expiring soon.
    EquipmentExpiry,
    /// Open task past its due date.
    TaskOverdue,
}

/// A transient operational alert. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Which rule fired.
    pub kind: AlertKind,
    /// How urgent.
    pub severity: AlertSeverity,
    /// Id of the asset, item, or task the alert is about.
    pub subject_id: i64,
    /// Human-readable description.
    pub message: String,
}

/// Evaluates all three rules and returns the concatenated alert list.
///
/// Pass order is fixed: hydrant inspections, then consumable expiry, then
/// overdue tasks. Within a pass, alerts follow the input collection's
/// iteration order; no additional sorting is applied.
#[must_use]
pub fn evaluate(
    hydrants: &[Hydrant],
    items: &[ConsumableItem],
    cabinets: &[EquipmentCabinet],
    tasks: &[Task],
    now: DateTime<Utc>,
) -> Vec<Alert> {
    let mut alerts = inspection_alerts(hydrants, now);
    alerts.extend(expiry_alerts(items, cabinets, now));
    alerts.extend(overdue_alerts(tasks, now));
    alerts
}

/// Rule 1: a hydrant with no recorded inspection, or one at least
/// [`INSPECTION_DUE_DAYS`] old, gets a warning.
fn inspection_alerts(hydrants: &[Hydrant], now: DateTime<Utc>) -> Vec<Alert> {
    let threshold = Duration::days(INSPECTION_DUE_DAYS);

    hydrants
        .iter()
        .filter_map(|hydrant| {
            let message = match hydrant.last_inspection {
                None => format!("Hydrant {} has no recorded inspection", hydrant.name),
                Some(last) if now - last >= threshold => {
                    let days = (now - last).num_days();
                    format!(
                        "Hydrant {} last inspected {days} days ago (due every {INSPECTION_DUE_DAYS} days)",
                        hydrant.name
                    )
                }
                Some(_) => return None,
            };

            Some(Alert {
                kind: AlertKind::HydrantInspection,
                severity: AlertSeverity::Warning,
                subject_id: hydrant.id,
                message,
            })
        })
        .collect()
}

/// Rule 2: an extinguisher expiring within [`EXPIRY_WINDOW_DAYS`] gets a
/// warning; one already expired gets a critical. Other item types are
/// exempt, as are extinguishers with no expiry date.
fn expiry_alerts(
    items: &[ConsumableItem],
    cabinets: &[EquipmentCabinet],
    now: DateTime<Utc>,
) -> Vec<Alert> {
    let window_end = now + Duration::days(EXPIRY_WINDOW_DAYS);

    items
        .iter()
        .filter(|item| item.item_type == ItemType::Extinguisher)
        .filter_map(|item| {
            let expiry = item.expiry_date?;
            if expiry > window_end {
                return None;
            }

            // A dangling cabinet reference degrades to a placeholder so one
            // bad record cannot suppress the rest of the pass.
            let cabinet_name = cabinets
                .iter()
                .find(|cabinet| cabinet.id == item.cabinet_id)
                .map_or("unknown cabinet", |cabinet| cabinet.name.as_str());

            let (severity, message) = if expiry <= now {
                (
                    AlertSeverity::Critical,
                    format!(
                        "{} in {cabinet_name} expired on {}",
                        item.name,
                        expiry.format("%Y-%m-%d")
                    ),
                )
            } else {
                (
                    AlertSeverity::Warning,
                    format!(
                        "{} in {cabinet_name} expires on {}",
                        item.name,
                        expiry.format("%Y-%m-%d")
                    ),
                )
            };

            Some(Alert {
                kind: AlertKind::EquipmentExpiry,
                severity,
                subject_id: item.id,
                message,
            })
        })
        .collect()
}

/// Rule 3: an open task past its due date gets an alert; critical when the
/// task priority is high or critical.
fn overdue_alerts(tasks: &[Task], now: DateTime<Utc>) -> Vec<Alert> {
    tasks
        .iter()
        .filter(|task| task.status.is_open())
        .filter_map(|task| {
            let due = task.due_date?;
            if due >= now {
                return None;
            }

            let severity = if matches!(task.priority, TaskPriority::High | TaskPriority::Critical)
            {
                AlertSeverity::Critical
            } else {
                AlertSeverity::Warning
            };

            Some(Alert {
                kind: AlertKind::TaskOverdue,
                severity,
                subject_id: task.id,
                message: format!(
                    "Task \"{}\" was due {}",
                    task.title,
                    due.format("%Y-%m-%d %H:%M")
                ),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use firewatch_asset_models::{CabinetStatus, HydrantStatus, ItemStatus};
    use firewatch_ops_models::TaskStatus;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn hydrant(id: i64, last_inspection: Option<DateTime<Utc>>) -> Hydrant {
        Hydrant {
            id,
            name: format!("H-{id:03}"),
            location: "test".to_string(),
            latitude: None,
            longitude: None,
            status: HydrantStatus::Operational,
            pressure: None,
            last_inspection,
            notes: None,
            created_at: now(),
            nearby_cabinets: Vec::new(),
        }
    }

    fn cabinet(id: i64, name: &str) -> EquipmentCabinet {
        EquipmentCabinet {
            id,
            name: name.to_string(),
            location: "test".to_string(),
            latitude: None,
            longitude: None,
            status: CabinetStatus::Ready,
            last_inspection: None,
            notes: None,
            created_at: now(),
            nearby_hydrants: Vec::new(),
        }
    }

    fn extinguisher(id: i64, cabinet_id: i64, expiry: Option<DateTime<Utc>>) -> ConsumableItem {
        ConsumableItem {
            id,
            cabinet_id,
            item_type: ItemType::Extinguisher,
            name: "Extinguisher 6kg".to_string(),
            expiry_date: expiry,
            status: ItemStatus::Good,
            created_at: now(),
        }
    }

    fn task(
        id: i64,
        status: TaskStatus,
        priority: TaskPriority,
        due: Option<DateTime<Utc>>,
    ) -> Task {
        Task {
            id,
            title: format!("task {id}"),
            description: None,
            priority,
            status,
            assigned_to: None,
            due_date: due,
            completed_date: None,
            notes: None,
            created_at: now(),
        }
    }

    #[test]
    fn hydrant_inspected_200_days_ago_alerts() {
        let hydrants = vec![hydrant(1, Some(now() - Duration::days(200)))];
        let alerts = evaluate(&hydrants, &[], &[], &[], now());

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::HydrantInspection);
        assert_eq!(alerts[0].severity, AlertSeverity::Warning);
        assert_eq!(alerts[0].subject_id, 1);
    }

    #[test]
    fn hydrant_with_no_inspection_alerts() {
        let hydrants = vec![hydrant(2, None)];
        let alerts = evaluate(&hydrants, &[], &[], &[], now());

        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].message.contains("no recorded inspection"));
    }

    #[test]
    fn recently_inspected_hydrant_is_quiet() {
        let hydrants = vec![hydrant(3, Some(now() - Duration::days(164)))];
        assert!(evaluate(&hydrants, &[], &[], &[], now()).is_empty());
    }

    #[test]
    fn inspection_exactly_at_threshold_alerts() {
        let hydrants = vec![hydrant(4, Some(now() - Duration::days(165)))];
        assert_eq!(evaluate(&hydrants, &[], &[], &[], now()).len(), 1);
    }

    #[test]
    fn expired_extinguisher_is_critical() {
        let cabinets = vec![cabinet(1, "Cabinet 7")];
        let items = vec![extinguisher(10, 1, Some(now() - Duration::days(1)))];
        let alerts = evaluate(&[], &items, &cabinets, &[], now());

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::EquipmentExpiry);
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);
        assert!(alerts[0].message.contains("Cabinet 7"));
    }

    #[test]
    fn expiring_extinguisher_is_warning() {
        let cabinets = vec![cabinet(1, "Cabinet 7")];
        let items = vec![extinguisher(11, 1, Some(now() + Duration::days(10)))];
        let alerts = evaluate(&[], &items, &cabinets, &[], now());

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, AlertSeverity::Warning);
    }

    #[test]
    fn extinguisher_outside_window_is_quiet() {
        let cabinets = vec![cabinet(1, "Cabinet 7")];
        let items = vec![extinguisher(12, 1, Some(now() + Duration::days(60)))];
        assert!(evaluate(&[], &items, &cabinets, &[], now()).is_empty());
    }

    #[test]
    fn non_extinguisher_items_are_exempt() {
        let cabinets = vec![cabinet(1, "Cabinet 7")];
        let mut item = extinguisher(13, 1, Some(now() - Duration::days(1)));
        item.item_type = ItemType::Hose;
        assert!(evaluate(&[], &[item], &cabinets, &[], now()).is_empty());
    }

    #[test]
    fn dangling_cabinet_reference_uses_placeholder() {
        let items = vec![extinguisher(14, 99, Some(now() - Duration::days(1)))];
        let alerts = evaluate(&[], &items, &[], &[], now());

        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].message.contains("unknown cabinet"));
    }

    #[test]
    fn overdue_critical_task_is_critical() {
        let tasks = vec![task(
            20,
            TaskStatus::InProgress,
            TaskPriority::Critical,
            Some(now() - Duration::hours(1)),
        )];
        let alerts = evaluate(&[], &[], &[], &tasks, now());

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::TaskOverdue);
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);
    }

    #[test]
    fn completed_task_is_never_overdue() {
        let tasks = vec![task(
            21,
            TaskStatus::Completed,
            TaskPriority::Critical,
            Some(now() - Duration::hours(1)),
        )];
        assert!(evaluate(&[], &[], &[], &tasks, now()).is_empty());
    }

    #[test]
    fn overdue_medium_task_is_warning() {
        let tasks = vec![task(
            22,
            TaskStatus::Waiting,
            TaskPriority::Medium,
            Some(now() - Duration::days(2)),
        )];
        let alerts = evaluate(&[], &[], &[], &tasks, now());
        assert_eq!(alerts[0].severity, AlertSeverity::Warning);
    }

    #[test]
    fn task_without_due_date_is_quiet() {
        let tasks = vec![task(23, TaskStatus::New, TaskPriority::High, None)];
        assert!(evaluate(&[], &[], &[], &tasks, now()).is_empty());
    }

    #[test]
    fn passes_concatenate_in_fixed_order() {
        let hydrants = vec![hydrant(1, None)];
        let cabinets = vec![cabinet(2, "Cabinet 12")];
        let items = vec![extinguisher(3, 2, Some(now() - Duration::days(1)))];
        let tasks = vec![task(
            4,
            TaskStatus::New,
            TaskPriority::Low,
            Some(now() - Duration::days(1)),
        )];

        let alerts = evaluate(&hydrants, &items, &cabinets, &tasks, now());
        let kinds: Vec<AlertKind> = alerts.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AlertKind::HydrantInspection,
                AlertKind::EquipmentExpiry,
                AlertKind::TaskOverdue,
            ]
        );
    }

    #[test]
    fn evaluation_is_idempotent() {
        let hydrants = vec![hydrant(1, None), hydrant(2, Some(now() - Duration::days(400)))];
        let cabinets = vec![cabinet(3, "Cabinet 7")];
        let items = vec![extinguisher(4, 3, Some(now() + Duration::days(5)))];
        let tasks = vec![task(
            5,
            TaskStatus::Waiting,
            TaskPriority::High,
            Some(now() - Duration::days(3)),
        )];

        let first = evaluate(&hydrants, &items, &cabinets, &tasks, now());
        let second = evaluate(&hydrants, &items, &cabinets, &tasks, now());
        assert_eq!(first, second);

        let first_json = serde_json::to_string(&first).unwrap();
        let second_json = serde_json::to_string(&second).unwrap();
        assert_eq!(first_json, second_json);
    }
}
