use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::{
    error::AppResult,
    persist,
    reports::repo_types::{Report, ReportCategory, ReportStatus},
    storage::KeyValueStore,
};

pub const REPORTS_KEY: &str = "reports";

/// The flat `reports` collection. Every write replaces the whole entry.
///
/// Loading may itself rewrite the entry (quarantine), so reads and writes
/// both go through `lock`. Clones share the lock.
#[derive(Clone)]
pub struct ReportRepo {
    kv: Arc<dyn KeyValueStore>,
    lock: Arc<Mutex<()>>,
}

impl ReportRepo {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Held across a read-modify-write of the collection.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }

    pub async fn load_all(&self) -> AppResult<Vec<Report>> {
        let held = self.lock().await;
        self.load_held(&held).await
    }

    pub async fn load_held(&self, _held: &MutexGuard<'_, ()>) -> AppResult<Vec<Report>> {
        persist::load_collection_or_reset(self.kv.as_ref(), REPORTS_KEY).await
    }

    pub async fn save_held(&self, _held: &MutexGuard<'_, ()>, reports: &[Report]) -> AppResult<()> {
        persist::save_collection(self.kv.as_ref(), REPORTS_KEY, reports).await
    }
}

pub fn filter_by_status(reports: &[Report], status: ReportStatus) -> Vec<Report> {
    reports.iter().filter(|r| r.status == status).cloned().collect()
}

pub fn filter_by_category(reports: &[Report], category: ReportCategory) -> Vec<Report> {
    reports
        .iter()
        .filter(|r| r.category == category)
        .cloned()
        .collect()
}
