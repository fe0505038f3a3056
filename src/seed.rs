use time::{Duration, OffsetDateTime};

use crate::reports::repo_types::{Report, ReportCategory, ReportLocation, ReportStatus};

struct Demo {
    n: u8,
    category: ReportCategory,
    title: &'static str,
    description: &'static str,
    at: (f64, f64, &'static str),
    status: ReportStatus,
    submitted_days_ago: i64,
    updated_days_ago: i64,
    notes: Option<&'static str>,
}

const DEMOS: [Demo; 5] = [
    Demo {
        n: 1,
        category: ReportCategory::Pothole,
        title: "Large Pothole on Main Road",
        description: "Deep pothole causing damage to vehicles near the traffic intersection. Water collects here during rain making it dangerous for motorcycles.",
        at: (-25.7479, 28.2293, "Main Road, Pretoria Central"),
        status: ReportStatus::InProgress,
        submitted_days_ago: 5,
        updated_days_ago: 2,
        notes: Some("Repair crew has been dispatched. Expected completion by end of week."),
    },
    Demo {
        n: 2,
        category: ReportCategory::IllegalDumping,
        title: "Illegal Dumping Behind Shopping Centre",
        description: "Large pile of construction debris and household waste dumped illegally. Creating health hazard and attracting vermin.",
        at: (-25.7615, 28.1949, "Behind Wonderpark Shopping Centre"),
        status: ReportStatus::Submitted,
        submitted_days_ago: 3,
        updated_days_ago: 3,
        notes: None,
    },
    Demo {
        n: 3,
        category: ReportCategory::Pothole,
        title: "Multiple Potholes on Residential Street",
        description: "Several medium-sized potholes along residential street affecting daily commute. Street lighting also needs attention.",
        at: (-25.7069, 28.2294, "Rodewald Street, New Muckleneuk"),
        status: ReportStatus::Resolved,
        submitted_days_ago: 10,
        updated_days_ago: 1,
        notes: Some("Potholes filled and road surface restored. Street lighting repair scheduled separately."),
    },
    Demo {
        n: 4,
        category: ReportCategory::IllegalDumping,
        title: "Abandoned Appliances in Park",
        description: "Old refrigerator and washing machine dumped in public park area. Needs immediate removal for safety.",
        at: (-25.7308, 28.2137, "Venning Park, Arcadia"),
        status: ReportStatus::InProgress,
        submitted_days_ago: 7,
        updated_days_ago: 4,
        notes: Some("Removal team scheduled for this week. Investigating illegal dumping source."),
    },
    Demo {
        n: 5,
        category: ReportCategory::Pothole,
        title: "Dangerous Pothole Near School",
        description: "Very deep pothole near school entrance creating safety hazard for children and parents. Urgent attention required.",
        at: (-25.7190, 28.2773, "Church Street, near Primary School"),
        status: ReportStatus::Submitted,
        submitted_days_ago: 1,
        updated_days_ago: 1,
        notes: None,
    },
];

/// Sample reports around Pretoria, dated relative to `now`.
pub fn demo_reports(now: OffsetDateTime) -> Vec<Report> {
    DEMOS
        .iter()
        .map(|d| Report {
            id: format!("demo-{}", d.n),
            user_id: format!("demo-user-{}", d.n),
            category: d.category,
            title: d.title.into(),
            description: d.description.into(),
            location: ReportLocation {
                latitude: d.at.0,
                longitude: d.at.1,
                address: Some(d.at.2.into()),
            },
            photos: Vec::new(),
            audio_recording: None,
            status: d.status,
            submitted_at: now - Duration::days(d.submitted_days_ago),
            updated_at: now - Duration::days(d.updated_days_ago),
            admin_notes: d.notes.map(Into::into),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::{persist::Record, reports::services::summarize};

    #[test]
    fn demo_set_is_valid_and_mixed() {
        let now = datetime!(2024-02-10 12:00 UTC);
        let reports = demo_reports(now);
        assert_eq!(reports.len(), 5);
        assert!(reports.iter().all(|r| r.validate().is_ok()));
        assert!(reports.iter().all(|r| r.submitted_at < now));

        let s = summarize(&reports);
        assert_eq!((s.submitted, s.in_progress, s.resolved, s.rejected), (2, 2, 1, 0));
        assert_eq!(reports[2].id, "demo-3");
        assert_eq!(reports[2].updated_at, datetime!(2024-02-09 12:00 UTC));
    }
}
