use std::sync::Arc;

use anyhow::Context;

use crate::{
    auth::{repo::UserRepo, services::IdentityStore},
    clock::{Clock, SystemClock},
    config::{AppConfig, StorageBackend},
    reports::{repo::ReportRepo, services::ReportService},
    seed,
    storage::{FileStore, KeyValueStore, MemoryStore},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub clock: Arc<dyn Clock>,
    pub identity: Arc<IdentityStore>,
    pub reports: Arc<ReportService>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let kv: Arc<dyn KeyValueStore> = match config.storage {
            StorageBackend::File => Arc::new(FileStore::open(&config.data_dir).await?),
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
        };
        let state = Self::from_parts(config, kv, Arc::new(SystemClock)).await?;

        if state.config.seed_demo_reports {
            state
                .reports
                .seed_if_empty(seed::demo_reports(state.clock.now()))
                .await
                .context("seed demo reports")?;
        }
        Ok(state)
    }

    /// Wires both stores over one key-value backend. Restores the session.
    pub async fn from_parts(
        config: Arc<AppConfig>,
        kv: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> anyhow::Result<Self> {
        let users = UserRepo::new(kv.clone());
        let identity = IdentityStore::restore(users.clone(), clock.clone(), config.credential_scheme)
            .await
            .context("restore session")?;
        let reports = ReportService::new(ReportRepo::new(kv), users, clock.clone());

        Ok(Self {
            config,
            clock,
            identity: Arc::new(identity),
            reports: Arc::new(reports),
        })
    }

    #[cfg(test)]
    pub async fn fake() -> Self {
        use crate::{auth::password::CredentialScheme, clock::testing::ManualClock};
        use time::macros::datetime;

        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            storage: StorageBackend::Memory,
            data_dir: std::env::temp_dir(),
            credential_scheme: CredentialScheme::Plaintext,
            seed_demo_reports: false,
        });
        let kv = Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>;
        let clock = Arc::new(ManualClock::new(datetime!(2024-02-01 08:00 UTC))) as Arc<dyn Clock>;
        Self::from_parts(config, kv, clock)
            .await
            .expect("in-memory state")
    }
}
