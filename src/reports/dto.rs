use serde::{Deserialize, Serialize};

use crate::reports::repo_types::{ReportCategory, ReportLocation, ReportStatus};

/// Body of `POST /reports`; also the input of the lifecycle `create`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    pub category: ReportCategory,
    pub title: String,
    pub description: String,
    pub location: ReportLocation,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub audio_recording: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: ReportStatus,
    #[serde(default)]
    pub admin_notes: Option<String>,
}

/// Optional list filters, `?status=resolved&category=pothole`.
#[derive(Debug, Default, Deserialize)]
pub struct ReportFilter {
    pub status: Option<ReportStatus>,
    pub category: Option<ReportCategory>,
}

/// Per-status counts shown on the dashboard and admin panel.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub total: usize,
    pub submitted: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub rejected: usize,
}
