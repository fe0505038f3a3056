use std::sync::Arc;

use time::Duration;
use tracing::{debug, info, warn};

use crate::{
    auth::{repo::UserRepo, repo_types::SessionUser},
    clock::{new_id, Clock},
    error::{AppError, AppResult},
    media::{check_attachment, MediaKind},
    reports::{
        dto::{NewReport, ReportFilter, StatusSummary},
        repo::{filter_by_category, filter_by_status, ReportRepo},
        repo_types::{Report, ReportStatus},
    },
};

/// Lifecycle manager over the report collection.
pub struct ReportService {
    repo: ReportRepo,
    users: UserRepo,
    clock: Arc<dyn Clock>,
}

impl ReportService {
    pub fn new(repo: ReportRepo, users: UserRepo, clock: Arc<dyn Clock>) -> Self {
        Self { repo, users, clock }
    }

    pub async fn list_all(&self) -> AppResult<Vec<Report>> {
        self.repo.load_all().await
    }

    pub async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<Report>> {
        let mut reports = self.list_all().await?;
        reports.retain(|r| r.user_id == user_id);
        Ok(reports)
    }

    pub async fn get(&self, report_id: &str) -> AppResult<Report> {
        self.list_all()
            .await?
            .into_iter()
            .find(|r| r.id == report_id)
            .ok_or_else(|| AppError::NotFound(format!("report {report_id}")))
    }

    pub async fn create(&self, draft: NewReport, author_id: Option<&str>) -> AppResult<Report> {
        let Some(author_id) = author_id else {
            return Err(AppError::Unauthenticated);
        };
        let draft = validate_draft(draft)?;
        if self.users.find_by_id(author_id).await?.is_none() {
            warn!(user_id = %author_id, "report author is not a registered user");
            return Err(AppError::Unauthenticated);
        }

        let held = self.repo.lock().await;
        let mut reports = self.repo.load_held(&held).await?;

        let mut id = new_id();
        while reports.iter().any(|r| r.id == id) {
            id = new_id();
        }
        let now = self.clock.now();
        let report = Report {
            id,
            user_id: author_id.to_string(),
            category: draft.category,
            title: draft.title,
            description: draft.description,
            location: draft.location,
            photos: draft.photos,
            audio_recording: draft.audio_recording,
            status: ReportStatus::Submitted,
            submitted_at: now,
            updated_at: now,
            admin_notes: None,
        };
        reports.push(report.clone());
        self.repo.save_held(&held, &reports).await?;

        info!(
            report_id = %report.id,
            user_id = %report.user_id,
            category = ?report.category,
            photos = report.photos.len(),
            "report submitted"
        );
        Ok(report)
    }

    /// Staff-only. Any status may follow any other.
    pub async fn update_status(
        &self,
        report_id: &str,
        status: ReportStatus,
        admin_notes: Option<String>,
        acting: &SessionUser,
    ) -> AppResult<Report> {
        if !acting.role.can_triage() {
            warn!(user_id = %acting.id, role = ?acting.role, %report_id, "status change refused");
            return Err(AppError::Forbidden);
        }

        let held = self.repo.lock().await;
        let mut reports = self.repo.load_held(&held).await?;
        let Some(report) = reports.iter_mut().find(|r| r.id == report_id) else {
            return Err(AppError::NotFound(format!("report {report_id}")));
        };

        let previous = report.status;
        let now = self.clock.now();
        // updatedAt only moves forward, even when the clock has not
        report.updated_at = if now > report.updated_at {
            now
        } else {
            report.updated_at + Duration::milliseconds(1)
        };
        report.status = status;
        report.admin_notes = admin_notes.filter(|n| !n.trim().is_empty());
        let updated = report.clone();
        self.repo.save_held(&held, &reports).await?;

        info!(
            %report_id,
            user_id = %acting.id,
            from = %previous,
            to = %status,
            "report status updated"
        );
        Ok(updated)
    }

    /// `list_all` narrowed by the optional filters.
    pub async fn query(&self, filter: &ReportFilter) -> AppResult<Vec<Report>> {
        Ok(apply_filter(self.list_all().await?, filter))
    }

    /// Writes `reports` only when the collection is empty. Returns how many
    /// were written.
    pub async fn seed_if_empty(&self, reports: Vec<Report>) -> AppResult<usize> {
        let held = self.repo.lock().await;
        if !self.repo.load_held(&held).await?.is_empty() {
            debug!("reports present; skipping demo seed");
            return Ok(0);
        }
        self.repo.save_held(&held, &reports).await?;
        info!(count = reports.len(), "demo reports seeded");
        Ok(reports.len())
    }
}

pub fn apply_filter(reports: Vec<Report>, filter: &ReportFilter) -> Vec<Report> {
    let reports = match filter.status {
        Some(st) => filter_by_status(&reports, st),
        None => reports,
    };
    match filter.category {
        Some(cat) => filter_by_category(&reports, cat),
        None => reports,
    }
}

pub fn summarize(reports: &[Report]) -> StatusSummary {
    let mut s = StatusSummary {
        total: reports.len(),
        ..StatusSummary::default()
    };
    for r in reports {
        match r.status {
            ReportStatus::Submitted => s.submitted += 1,
            ReportStatus::InProgress => s.in_progress += 1,
            ReportStatus::Resolved => s.resolved += 1,
            ReportStatus::Rejected => s.rejected += 1,
        }
    }
    s
}

/// Blank checks look at trimmed text; the stored text is kept as typed.
fn validate_draft(mut draft: NewReport) -> AppResult<NewReport> {
    if draft.title.trim().is_empty() {
        return Err(AppError::InvalidInput("title is required".into()));
    }
    if draft.description.trim().is_empty() {
        return Err(AppError::InvalidInput("description is required".into()));
    }

    let loc = &draft.location;
    if !(-90.0..=90.0).contains(&loc.latitude) {
        return Err(AppError::InvalidInput(format!(
            "latitude {} out of range",
            loc.latitude
        )));
    }
    if !(-180.0..=180.0).contains(&loc.longitude) {
        return Err(AppError::InvalidInput(format!(
            "longitude {} out of range",
            loc.longitude
        )));
    }

    for (i, photo) in draft.photos.iter().enumerate() {
        check_attachment(photo, MediaKind::Image)
            .map_err(|e| AppError::InvalidInput(format!("photo {i}: {e}")))?;
    }
    draft.audio_recording = draft.audio_recording.filter(|a| !a.is_empty());
    if let Some(audio) = &draft.audio_recording {
        check_attachment(audio, MediaKind::Audio)
            .map_err(|e| AppError::InvalidInput(format!("audio recording: {e}")))?;
    }
    Ok(draft)
}
