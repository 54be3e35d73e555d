//! Dashboard counters computed over the full collections.

use chrono::{DateTime, Datelike as _, TimeZone as _, Utc};
use firewatch_asset_models::{CabinetStatus, HydrantStatus};
use firewatch_ops_models::{TaskPriority, TaskStatus, TeamStatus, VolunteerStatus};
use serde::Serialize;

use crate::Inner;

/// Team counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamStats {
    /// All teams.
    pub total: usize,
    /// Teams with available status.
    pub available: usize,
    /// Teams currently deployed.
    pub on_duty: usize,
}

/// Volunteer counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VolunteerStats {
    /// All volunteers.
    pub total: usize,
    /// Volunteers with available status.
    pub available: usize,
}

/// Hydrant counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HydrantStats {
    /// All hydrants.
    pub total: usize,
    /// Operational hydrants.
    pub operational: usize,
    /// Hydrants flagged for service.
    pub needs_maintenance: usize,
    /// Unusable hydrants.
    pub out_of_service: usize,
}

/// Equipment cabinet counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CabinetStats {
    /// All cabinets.
    pub total: usize,
    /// Fully stocked cabinets.
    pub ready: usize,
    /// Cabinets due a stock check.
    pub needs_check: usize,
}

/// Task counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    /// All tasks.
    pub total: usize,
    /// Tasks in an open state.
    pub open: usize,
    /// Tasks being worked on.
    pub in_progress: usize,
    /// Completed tasks.
    pub completed: usize,
    /// Tasks with critical priority, regardless of state.
    pub critical: usize,
}

/// Maintenance log counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaintenanceStats {
    /// All records.
    pub total: usize,
    /// Records dated in the current calendar month.
    pub this_month: usize,
}

/// The full dashboard stats payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Team counters.
    pub teams: TeamStats,
    /// Volunteer counters.
    pub volunteers: VolunteerStats,
    /// Hydrant counters.
    pub hydrants: HydrantStats,
    /// Cabinet counters.
    pub equipment_cabinets: CabinetStats,
    /// Task counters.
    pub tasks: TaskStats,
    /// Maintenance log counters.
    pub maintenance: MaintenanceStats,
}

/// Start of the calendar month containing `now`, in UTC.
fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

pub(crate) fn compute(inner: &Inner, now: DateTime<Utc>) -> DashboardStats {
    let count_teams =
        |s: TeamStatus| inner.teams.values().filter(|t| t.status == s).count();
    let count_hydrants =
        |s: HydrantStatus| inner.hydrants.values().filter(|h| h.status == s).count();
    let count_cabinets =
        |s: CabinetStatus| inner.cabinets.values().filter(|c| c.status == s).count();
    let count_tasks =
        |s: TaskStatus| inner.tasks.values().filter(|t| t.status == s).count();

    let since = month_start(now);

    DashboardStats {
        teams: TeamStats {
            total: inner.teams.len(),
            available: count_teams(TeamStatus::Available),
            on_duty: count_teams(TeamStatus::OnDuty),
        },
        volunteers: VolunteerStats {
            total: inner.volunteers.len(),
            available: inner
                .volunteers
                .values()
                .filter(|v| v.status == VolunteerStatus::Available)
                .count(),
        },
        hydrants: HydrantStats {
            total: inner.hydrants.len(),
            operational: count_hydrants(HydrantStatus::Operational),
            needs_maintenance: count_hydrants(HydrantStatus::NeedsMaintenance),
            out_of_service: count_hydrants(HydrantStatus::OutOfService),
        },
        equipment_cabinets: CabinetStats {
            total: inner.cabinets.len(),
            ready: count_cabinets(CabinetStatus::Ready),
            needs_check: count_cabinets(CabinetStatus::NeedsCheck),
        },
        tasks: TaskStats {
            total: inner.tasks.len(),
            open: inner.tasks.values().filter(|t| t.status.is_open()).count(),
            in_progress: count_tasks(TaskStatus::InProgress),
            completed: count_tasks(TaskStatus::Completed),
            critical: inner
                .tasks
                .values()
                .filter(|t| t.priority == TaskPriority::Critical)
                .count(),
        },
        maintenance: MaintenanceStats {
            total: inner.maintenance.len(),
            this_month: inner.maintenance.values().filter(|r| r.date >= since).count(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Store;
    use firewatch_asset_models::NewHydrant;
    use firewatch_ops_models::{NewMaintenanceRecord, NewTask, SubjectKind};

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 10, 0, 0).unwrap()
    }

    #[test]
    fn month_start_truncates_to_first_of_month() {
        assert_eq!(month_start(at(2025, 6, 15)), Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn counts_hydrants_by_status() {
        let store = Store::new();
        let hydrant = |status| NewHydrant {
            name: "h".to_string(),
            location: "l".to_string(),
            latitude: None,
            longitude: None,
            status,
            pressure: None,
            notes: None,
        };
        store.create_hydrant(hydrant(None), at(2025, 6, 1));
        store.create_hydrant(hydrant(Some(HydrantStatus::OutOfService)), at(2025, 6, 1));

        let stats = store.dashboard_stats(at(2025, 6, 15));
        assert_eq!(stats.hydrants.total, 2);
        assert_eq!(stats.hydrants.operational, 1);
        assert_eq!(stats.hydrants.out_of_service, 1);
    }

    #[test]
    fn maintenance_this_month_excludes_older_records() {
        let store = Store::new();
        let record = |date| NewMaintenanceRecord {
            subject_kind: SubjectKind::Hydrant,
            subject_id: None,
            subject_name: "H-001".to_string(),
            maintenance_type: None,
            description: None,
            performed_by: None,
            date: Some(date),
            cost: None,
            notes: None,
        };
        store.create_maintenance(record(at(2025, 6, 2)), at(2025, 6, 2));
        store.create_maintenance(record(at(2025, 5, 28)), at(2025, 5, 28));

        let stats = store.dashboard_stats(at(2025, 6, 15));
        assert_eq!(stats.maintenance.total, 2);
        assert_eq!(stats.maintenance.this_month, 1);
    }

    #[test]
    fn open_task_count_spans_open_states() {
        let store = Store::new();
        let task = |status| NewTask {
            title: "t".to_string(),
            description: None,
            priority: Some(TaskPriority::Critical),
            status: Some(status),
            assigned_to: None,
            due_date: None,
            notes: None,
        };
        store.create_task(task(TaskStatus::New), at(2025, 6, 1));
        store.create_task(task(TaskStatus::Waiting), at(2025, 6, 1));
        store.create_task(task(TaskStatus::Completed), at(2025, 6, 1));

        let stats = store.dashboard_stats(at(2025, 6, 15));
        assert_eq!(stats.tasks.open, 2);
        assert_eq!(stats.tasks.completed, 1);
        assert_eq!(stats.tasks.critical, 3);
    }
}
