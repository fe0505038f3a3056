use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::persist::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportCategory {
    Pothole,
    IllegalDumping,
}

/// No transition graph is enforced: staff may move a report between any
/// two states, including reopening a resolved one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Submitted,
    InProgress,
    Resolved,
    Rejected,
}

impl ReportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Submitted => "submitted",
            ReportStatus::InProgress => "in_progress",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// One element of the `reports` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub user_id: String,
    pub category: ReportCategory,
    pub title: String,
    pub description: String,
    pub location: ReportLocation,
    pub photos: Vec<String>, // data URLs, in upload order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_recording: Option<String>,
    pub status: ReportStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
}

impl Record for Report {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), String> {
        if self.id.is_empty() {
            return Err("empty report id".into());
        }
        if self.updated_at < self.submitted_at {
            return Err(format!("report `{}` updated before it was submitted", self.id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::datetime;

    use super::*;

    fn sample() -> Report {
        Report {
            id: "r-1".into(),
            user_id: "u-1".into(),
            category: ReportCategory::IllegalDumping,
            title: "Rubble on the verge".into(),
            description: "Builders' rubble dumped overnight".into(),
            location: ReportLocation {
                latitude: -25.7479,
                longitude: 28.2293,
                address: None,
            },
            photos: vec!["data:image/png;base64,AAAA".into()],
            audio_recording: None,
            status: ReportStatus::InProgress,
            submitted_at: datetime!(2024-02-01 08:00:00.123 UTC),
            updated_at: datetime!(2024-02-02 10:15 UTC),
            admin_notes: Some("crew booked".into()),
        }
    }

    #[test]
    fn wire_shape_matches_stored_layout() {
        let v = serde_json::to_value(sample()).unwrap();
        assert_eq!(v["userId"], "u-1");
        assert_eq!(v["category"], "illegal_dumping");
        assert_eq!(v["status"], "in_progress");
        assert_eq!(v["submittedAt"], "2024-02-01T08:00:00.123Z");
        assert_eq!(v["adminNotes"], "crew booked");
        assert!(v.get("audioRecording").is_none());
        assert!(v["location"].get("address").is_none());
    }

    #[test]
    fn reads_records_written_by_older_clients() {
        let raw = json!({
            "id": "demo-2",
            "userId": "demo-user-2",
            "category": "pothole",
            "title": "t",
            "description": "d",
            "location": { "latitude": -25.76, "longitude": 28.19, "address": "Wonderpark" },
            "photos": [],
            "status": "submitted",
            "submittedAt": "2024-01-29T07:00:00.000Z",
            "updatedAt": "2024-01-29T07:00:00.000Z"
        });
        let r: Report = serde_json::from_value(raw).unwrap();
        assert_eq!(r.location.address.as_deref(), Some("Wonderpark"));
        assert_eq!(r.admin_notes, None);
        assert!(r.validate().is_ok());
    }

    #[test]
    fn rejects_update_before_submission() {
        let mut r = sample();
        r.updated_at = datetime!(2024-01-01 00:00 UTC);
        assert!(r.validate().is_err());
    }

    #[test]
    fn status_names_match_wire_names() {
        for st in [
            ReportStatus::Submitted,
            ReportStatus::InProgress,
            ReportStatus::Resolved,
            ReportStatus::Rejected,
        ] {
            assert_eq!(serde_json::to_value(st).unwrap(), st.as_str());
            assert_eq!(st.to_string(), st.as_str());
        }
        assert!(serde_json::from_value::<ReportStatus>(json!("closed")).is_err());
    }
}
