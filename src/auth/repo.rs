use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::{
    auth::repo_types::{SessionUser, User},
    error::AppResult,
    persist,
    storage::KeyValueStore,
};

pub const USERS_KEY: &str = "users";
pub const SESSION_KEY: &str = "session-user";

/// Accounts and the stored session. The `users` entry is guarded like
/// `reports`: loading may rewrite it, so every access takes `lock`.
#[derive(Clone)]
pub struct UserRepo {
    kv: Arc<dyn KeyValueStore>,
    lock: Arc<Mutex<()>>,
}

impl UserRepo {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }

    /// All accounts. A corrupt entry is quarantined and reads as empty.
    pub async fn load_all(&self) -> AppResult<Vec<User>> {
        let held = self.lock().await;
        self.load_held(&held).await
    }

    pub async fn load_held(&self, _held: &MutexGuard<'_, ()>) -> AppResult<Vec<User>> {
        persist::load_collection_or_reset(self.kv.as_ref(), USERS_KEY).await
    }

    pub async fn save_held(&self, _held: &MutexGuard<'_, ()>, users: &[User]) -> AppResult<()> {
        persist::save_collection(self.kv.as_ref(), USERS_KEY, users).await
    }

    /// Exact, case-sensitive match.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.load_all().await?.into_iter().find(|u| u.email == email))
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.load_all().await?.into_iter().find(|u| u.id == id))
    }

    /// Strict read: corrupt data comes back as `MalformedPersistedData`.
    pub async fn load_session(&self) -> AppResult<Option<SessionUser>> {
        persist::load_single(self.kv.as_ref(), SESSION_KEY).await
    }

    pub async fn save_session(&self, user: &SessionUser) -> AppResult<()> {
        persist::save_single(self.kv.as_ref(), SESSION_KEY, user).await
    }

    pub async fn clear_session(&self) -> AppResult<()> {
        self.kv.remove(SESSION_KEY).await?;
        Ok(())
    }
}
