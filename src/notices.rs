//! City notices shown beside the dashboard. The set is built in and
//! read-only; timestamps are relative to the moment of the request.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use time::{Duration, OffsetDateTime};

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticePriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Info,
    Warning,
    Success,
    Urgent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityNotice {
    pub id: String,
    pub title: String,
    pub message: String,
    pub priority: NoticePriority,
    #[serde(rename = "type")]
    pub kind: NoticeKind,
    #[serde(with = "time::serde::rfc3339")]
    pub published_at: OffsetDateTime,
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires_at: Option<OffsetDateTime>,
}

fn notice(
    id: &str,
    title: &str,
    message: &str,
    priority: NoticePriority,
    kind: NoticeKind,
    published_at: OffsetDateTime,
) -> CityNotice {
    CityNotice {
        id: id.into(),
        title: title.into(),
        message: message.into(),
        priority,
        kind,
        published_at,
        expires_at: None,
    }
}

pub fn builtin_notices(now: OffsetDateTime) -> Vec<CityNotice> {
    vec![
        notice(
            "1",
            "Scheduled Water Maintenance",
            "Water supply will be temporarily interrupted in the Centurion area on Saturday from 09:00 to 15:00 for routine maintenance.",
            NoticePriority::High,
            NoticeKind::Warning,
            now - Duration::days(2),
        ),
        notice(
            "2",
            "Community Clean-Up Campaign",
            "Join the monthly community clean-up in Mamelodi on Sunday. Registration starts at 07:00 at the community centre.",
            NoticePriority::Medium,
            NoticeKind::Info,
            now - Duration::days(1),
        ),
        notice(
            "3",
            "Road Repairs Completed",
            "Pothole repairs on Steve Biko Road have been completed. Thank you for your patience during the construction period.",
            NoticePriority::Low,
            NoticeKind::Success,
            now - Duration::hours(3),
        ),
        CityNotice {
            expires_at: Some(now + Duration::days(1)),
            ..notice(
                "4",
                "Load Shedding Schedule Update",
                "Stage 2 load shedding is currently in effect. Please check your area schedule on the City Power website for specific times.",
                NoticePriority::High,
                NoticeKind::Urgent,
                now - Duration::minutes(30),
            )
        },
    ]
}

/// Unexpired notices, newest first.
pub fn active_notices(mut notices: Vec<CityNotice>, now: OffsetDateTime) -> Vec<CityNotice> {
    notices.retain(|n| n.expires_at.map_or(true, |exp| exp > now));
    notices.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    notices
}

pub fn router() -> Router<AppState> {
    Router::new().route("/notices", get(list_notices))
}

pub async fn list_notices(State(state): State<AppState>) -> Json<Vec<CityNotice>> {
    let now = state.clock.now();
    Json(active_notices(builtin_notices(now), now))
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn newest_first_and_expired_dropped() {
        let now = datetime!(2024-02-03 12:00 UTC);
        let mut notices = builtin_notices(now);
        notices[1].expires_at = Some(now - Duration::minutes(1));

        let active = active_notices(notices, now);
        let ids: Vec<&str> = active.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["4", "3", "1"]);
    }

    #[test]
    fn serializes_kind_as_type() {
        let now = datetime!(2024-02-03 12:00 UTC);
        let v = serde_json::to_value(&builtin_notices(now)[3]).unwrap();
        assert_eq!(v["type"], "urgent");
        assert_eq!(v["priority"], "high");
        assert_eq!(v["publishedAt"], "2024-02-03T11:30:00Z");
        assert_eq!(v["expiresAt"], "2024-02-04T12:00:00Z");

        let v = serde_json::to_value(&builtin_notices(now)[0]).unwrap();
        assert!(v.get("expiresAt").is_none());
    }
}
