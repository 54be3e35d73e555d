#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Operational record types for the firewatch system.
//!
//! Tasks, teams, volunteers, maintenance records, and activities. These are
//! plain CRUD records; the only one with rule-engine semantics is [`Task`],
//! whose open/closed lifecycle split drives overdue evaluation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Lifecycle state of a task.
///
/// New, in-progress, and waiting are the *open* states: the task is still
/// eligible for overdue evaluation. Completed and cancelled are closed.
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
pub enum TaskStatus {
    /// Created, not yet started.
    New,
    /// Being worked on.
    InProgress,
    /// Blocked on something external.
    Waiting,
    /// Done.
    Completed,
    /// Abandoned.
    Cancelled,
}

impl TaskStatus {
    /// Whether a task in this state is still eligible for overdue
    /// evaluation.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::New | Self::InProgress | Self::Waiting)
    }
}

/// Priority of a task, from low to critical.
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
pub enum TaskPriority {
    /// Can wait indefinitely.
    Low,
    /// Normal scheduling.
    Medium,
    /// Should be handled soon.
    High,
    /// Drop everything.
    Critical,
}

/// A work item for the brigade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Primary key.
    pub id: i64,
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: Option<String>,
    /// Priority.
    pub priority: TaskPriority,
    /// Lifecycle state.
    pub status: TaskStatus,
    /// Who the task is assigned to, free text.
    pub assigned_to: Option<String>,
    /// When the task is due.
    pub due_date: Option<DateTime<Utc>>,
    /// When the task was completed, stamped on transition to completed.
    pub completed_date: Option<DateTime<Utc>>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Record creation time.
    pub created_at: DateTime<Utc>,
}

/// Availability status of a team.
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
pub enum TeamStatus {
    /// Can be called out.
    Available,
    /// Currently deployed.
    OnDuty,
    /// Not reachable.
    Unavailable,
}

/// A response team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// Primary key.
    pub id: i64,
    /// Team name.
    pub name: String,
    /// Team leader, free text.
    pub leader: String,
    /// Member list, free text.
    pub members: Option<String>,
    /// Availability status.
    pub status: TeamStatus,
    /// Contact phone.
    pub phone: Option<String>,
    /// Record creation time.
    pub created_at: DateTime<Utc>,
}

/// Availability status of a volunteer.
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
pub enum VolunteerStatus {
    /// Can be called out.
    Available,
    /// Temporarily occupied.
    Busy,
    /// No longer active.
    Inactive,
}

/// A brigade volunteer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volunteer {
    /// Primary key.
    pub id: i64,
    /// Full name.
    pub name: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Specialization, free text (e.g. "first aid").
    pub specialization: Option<String>,
    /// Availability status.
    pub status: VolunteerStatus,
    /// Skills, free text.
    pub skills: Option<String>,
    /// Typical availability hours, free text.
    pub availability_hours: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Record creation time.
    pub created_at: DateTime<Utc>,
}

/// Which asset kind a maintenance record refers to.
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
pub enum SubjectKind {
    /// A hydrant.
    Hydrant,
    /// An equipment cabinet.
    EquipmentCabinet,
}

/// Kind of maintenance performed.
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
pub enum MaintenanceType {
    /// Scheduled upkeep.
    Routine,
    /// Fixing a fault.
    Repair,
    /// Periodic inspection.
    Inspection,
    /// Unplanned urgent work.
    Emergency,
}

/// A log entry for maintenance performed on an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    /// Primary key.
    pub id: i64,
    /// Asset kind this record refers to.
    pub subject_kind: SubjectKind,
    /// Asset id, if the asset still exists.
    pub subject_id: Option<i64>,
    /// Asset display name at the time of the work.
    pub subject_name: String,
    /// Kind of work performed.
    pub maintenance_type: MaintenanceType,
    /// What was done.
    pub description: Option<String>,
    /// Who did the work, free text.
    pub performed_by: Option<String>,
    /// When the work was done.
    pub date: DateTime<Utc>,
    /// Cost, if tracked.
    pub cost: Option<f64>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Record creation time.
    pub created_at: DateTime<Utc>,
}

/// Kind of brigade activity.
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
pub enum ActivityType {
    /// Skills training.
    Training,
    /// Practice drill.
    Drill,
    /// Planning or review meeting.
    Meeting,
    /// Outreach / community event.
    CommunityEvent,
    /// Anything else.
    Other,
}

/// Lifecycle state of an activity.
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
pub enum ActivityStatus {
    /// Scheduled but not held yet.
    Planned,
    /// Took place.
    Completed,
    /// Called off.
    Cancelled,
}

/// A brigade activity (training, drill, meeting, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Primary key.
    pub id: i64,
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: Option<String>,
    /// Kind of activity.
    pub activity_type: ActivityType,
    /// Participants, free text.
    pub participants: Option<String>,
    /// Where it takes place, free text.
    pub location: Option<String>,
    /// When it takes place.
    pub date: Option<DateTime<Utc>>,
    /// Duration, free text (e.g. "2h").
    pub duration: Option<String>,
    /// What came out of it.
    pub outcome: Option<String>,
    /// Follow-ups identified.
    pub improvements_needed: Option<String>,
    /// Lifecycle state.
    pub status: ActivityStatus,
    /// Who logged the activity.
    pub created_by: Option<String>,
    /// Record creation time.
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a task.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: Option<String>,
    /// Priority, defaults to medium.
    pub priority: Option<TaskPriority>,
    /// Lifecycle state, defaults to new.
    pub status: Option<TaskStatus>,
    /// Assignee, free text.
    pub assigned_to: Option<String>,
    /// Due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Partial update for a task. Absent fields keep their current value; the
/// due date distinguishes absent (keep) from explicit `null` (clear).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New priority.
    pub priority: Option<TaskPriority>,
    /// New lifecycle state.
    pub status: Option<TaskStatus>,
    /// New assignee.
    pub assigned_to: Option<String>,
    /// `Some(None)` clears the due date.
    #[serde(default, with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    /// New completion time. Transitioning to completed without one stamps
    /// the current time.
    pub completed_date: Option<DateTime<Utc>>,
    /// New notes.
    pub notes: Option<String>,
}

/// Payload for creating a team.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTeam {
    /// Team name.
    pub name: String,
    /// Team leader.
    pub leader: String,
    /// Member list, free text.
    pub members: Option<String>,
    /// Availability status, defaults to available.
    pub status: Option<TeamStatus>,
    /// Contact phone.
    pub phone: Option<String>,
}

/// Partial update for a team.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamPatch {
    /// New name.
    pub name: Option<String>,
    /// New leader.
    pub leader: Option<String>,
    /// New member list.
    pub members: Option<String>,
    /// New status.
    pub status: Option<TeamStatus>,
    /// New phone.
    pub phone: Option<String>,
}

/// Payload for creating a volunteer.
#[derive(Debug, Clone, Deserialize)]
pub struct NewVolunteer {
    /// Full name.
    pub name: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Specialization.
    pub specialization: Option<String>,
    /// Availability status, defaults to available.
    pub status: Option<VolunteerStatus>,
    /// Skills.
    pub skills: Option<String>,
    /// Availability hours.
    pub availability_hours: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Partial update for a volunteer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VolunteerPatch {
    /// New name.
    pub name: Option<String>,
    /// New phone.
    pub phone: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New specialization.
    pub specialization: Option<String>,
    /// New status.
    pub status: Option<VolunteerStatus>,
    /// New skills.
    pub skills: Option<String>,
    /// New availability hours.
    pub availability_hours: Option<String>,
    /// New notes.
    pub notes: Option<String>,
}

/// Payload for logging a maintenance record.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMaintenanceRecord {
    /// Asset kind.
    pub subject_kind: SubjectKind,
    /// Asset id, if it still exists.
    pub subject_id: Option<i64>,
    /// Asset display name.
    pub subject_name: String,
    /// Kind of work, defaults to routine.
    pub maintenance_type: Option<MaintenanceType>,
    /// What was done.
    pub description: Option<String>,
    /// Who did the work.
    pub performed_by: Option<String>,
    /// When the work was done, defaults to now.
    pub date: Option<DateTime<Utc>>,
    /// Cost, if tracked.
    pub cost: Option<f64>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Partial update for a maintenance record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaintenanceRecordPatch {
    /// New asset kind.
    pub subject_kind: Option<SubjectKind>,
    /// New asset id.
    pub subject_id: Option<i64>,
    /// New asset display name.
    pub subject_name: Option<String>,
    /// New kind of work.
    pub maintenance_type: Option<MaintenanceType>,
    /// New description.
    pub description: Option<String>,
    /// New performer.
    pub performed_by: Option<String>,
    /// New work date.
    pub date: Option<DateTime<Utc>>,
    /// New cost.
    pub cost: Option<f64>,
    /// New notes.
    pub notes: Option<String>,
}

/// Payload for creating an activity.
#[derive(Debug, Clone, Deserialize)]
pub struct NewActivity {
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: Option<String>,
    /// Kind of activity, defaults to training.
    pub activity_type: Option<ActivityType>,
    /// Participants.
    pub participants: Option<String>,
    /// Location.
    pub location: Option<String>,
    /// When it takes place.
    pub date: Option<DateTime<Utc>>,
    /// Duration.
    pub duration: Option<String>,
    /// Outcome.
    pub outcome: Option<String>,
    /// Follow-ups identified.
    pub improvements_needed: Option<String>,
    /// Lifecycle state, defaults to planned.
    pub status: Option<ActivityStatus>,
    /// Who logged it.
    pub created_by: Option<String>,
}

/// Partial update for an activity.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New kind.
    pub activity_type: Option<ActivityType>,
    /// New participants.
    pub participants: Option<String>,
    /// New location.
    pub location: Option<String>,
    /// New date.
    pub date: Option<DateTime<Utc>>,
    /// New duration.
    pub duration: Option<String>,
    /// New outcome.
    pub outcome: Option<String>,
    /// New follow-ups.
    pub improvements_needed: Option<String>,
    /// New lifecycle state.
    pub status: Option<ActivityStatus>,
    /// New creator.
    pub created_by: Option<String>,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_states_exclude_completed_and_cancelled() {
        assert!(TaskStatus::New.is_open());
        assert!(TaskStatus::InProgress.is_open());
        assert!(TaskStatus::Waiting.is_open());
        assert!(!TaskStatus::Completed.is_open());
        assert!(!TaskStatus::Cancelled.is_open());
    }

    #[test]
    fn priority_ordering() {
        assert!(TaskPriority::Critical > TaskPriority::High);
        assert!(TaskPriority::High > TaskPriority::Medium);
        assert!(TaskPriority::Medium > TaskPriority::Low);
    }

    #[test]
    fn task_patch_due_date_absent_vs_null() {
        let patch: TaskPatch = serde_json::from_str(r#"{"title": "x"}"#).unwrap();
        assert_eq!(patch.due_date, None);

        let patch: TaskPatch = serde_json::from_str(r#"{"due_date": null}"#).unwrap();
        assert_eq!(patch.due_date, Some(None));
    }

    #[test]
    fn status_parses_from_snake_case() {
        let status: TaskStatus = "in_progress".parse().unwrap();
        assert_eq!(status, TaskStatus::InProgress);
        let kind: SubjectKind = "equipment_cabinet".parse().unwrap();
        assert_eq!(kind, SubjectKind::EquipmentCabinet);
    }
}
