#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the firewatch server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the domain types to allow independent evolution of the API
//! contract; field names are camelCase on the wire.

use firewatch_alerts::{Alert, AlertKind, AlertSeverity};
use firewatch_ops_models::{ActivityStatus, ActivityType, SubjectKind, TaskStatus, VolunteerStatus};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Confirmation body for delete endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMessage {
    /// Human-readable confirmation.
    pub message: String,
}

/// Query parameters for the nearby-asset endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyQueryParams {
    /// Search radius in meters. Defaults to the standard cache radius.
    pub radius: Option<f64>,
}

/// Query parameters for the task list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQueryParams {
    /// Only return tasks in this state.
    pub status: Option<TaskStatus>,
}

/// Query parameters for the volunteer list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerQueryParams {
    /// Only return volunteers in this state.
    pub status: Option<VolunteerStatus>,
}

/// Query parameters for the maintenance log endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceQueryParams {
    /// Only return records about this asset kind.
    pub subject_kind: Option<SubjectKind>,
    /// Only return records about this asset id.
    pub subject_id: Option<i64>,
}

/// Query parameters for the activity list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityQueryParams {
    /// Only return activities of this kind.
    pub activity_type: Option<ActivityType>,
    /// Only return activities in this state.
    pub status: Option<ActivityStatus>,
}

/// An alert as returned by the dashboard endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAlert {
    /// Which rule fired.
    pub kind: AlertKind,
    /// How urgent.
    pub severity: AlertSeverity,
    /// Id of the asset, item, or task the alert is about.
    pub subject_id: i64,
    /// Human-readable description.
    pub message: String,
}

impl From<Alert> for ApiAlert {
    fn from(alert: Alert) -> Self {
        Self {
            kind: alert.kind,
            severity: alert.severity,
            subject_id: alert.subject_id,
            message: alert.message,
        }
    }
}

/// Alert counts by severity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAlertTotals {
    /// Critical alerts across the whole list.
    pub critical: usize,
    /// Warning alerts across the whole list.
    pub warning: usize,
}

/// Dashboard alert summary: full-list totals plus a bounded display list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAlertSummary {
    /// Counts over the *full* alert list, not the truncated one.
    pub totals: ApiAlertTotals,
    /// The first alerts in engine order, truncated for display.
    pub alerts: Vec<ApiAlert>,
}

impl ApiAlertSummary {
    /// Builds a summary from the full engine output, keeping at most
    /// `limit` alerts for display. Totals always cover the full list.
    #[must_use]
    pub fn from_alerts(alerts: Vec<Alert>, limit: usize) -> Self {
        let totals = ApiAlertTotals {
            critical: alerts
                .iter()
                .filter(|a| a.severity == AlertSeverity::Critical)
                .count(),
            warning: alerts
                .iter()
                .filter(|a| a.severity == AlertSeverity::Warning)
                .count(),
        };
        Self {
            totals,
            alerts: alerts.into_iter().take(limit).map(ApiAlert::from).collect(),
        }
    }
}
