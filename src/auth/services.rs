use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::{
    auth::{
        password::CredentialScheme,
        repo::UserRepo,
        repo_types::{Role, SessionUser, User},
    },
    clock::{new_id, Clock},
    error::{AppError, AppResult},
};

/// Registered accounts plus the single current session.
pub struct IdentityStore {
    repo: UserRepo,
    clock: Arc<dyn Clock>,
    scheme: CredentialScheme,
    session: RwLock<Option<SessionUser>>,
}

impl IdentityStore {
    /// Builds the store and restores the persisted session. A corrupt
    /// session entry, or one whose account is gone from `users`, is dropped
    /// and the process starts signed out.
    pub async fn restore(
        repo: UserRepo,
        clock: Arc<dyn Clock>,
        scheme: CredentialScheme,
    ) -> AppResult<Self> {
        let mut session = match repo.load_session().await {
            Ok(s) => s,
            Err(AppError::MalformedPersistedData { key, reason }) => {
                warn!(%key, %reason, "discarding unreadable session");
                repo.clear_session().await?;
                None
            }
            Err(e) => return Err(e),
        };
        if let Some(s) = &session {
            if repo.find_by_id(&s.id).await?.is_none() {
                warn!(user_id = %s.id, "session user no longer registered; discarding");
                repo.clear_session().await?;
                session = None;
            }
        }
        if let Some(s) = &session {
            debug!(user_id = %s.id, "session restored");
        }
        Ok(Self {
            repo,
            clock,
            scheme,
            session: RwLock::new(session),
        })
    }

    /// Creates an account and signs it in.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
        role: Role,
    ) -> AppResult<SessionUser> {
        let held = self.repo.lock().await;
        let mut users = self.repo.load_held(&held).await?;

        if users.iter().any(|u| u.email == email) {
            warn!(%email, "email already registered");
            return Err(AppError::DuplicateEmail);
        }

        let mut id = new_id();
        while users.iter().any(|u| u.id == id) {
            id = new_id();
        }

        let user = User {
            id,
            email: email.to_string(),
            password: self.scheme.protect(password)?,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            role,
            registered_at: self.clock.now(),
        };
        let session = SessionUser::from(&user);
        users.push(user);
        self.repo.save_held(&held, &users).await?;
        self.establish(session.clone()).await?;

        info!(user_id = %session.id, email = %session.email, role = ?session.role, "user registered");
        Ok(session)
    }

    pub async fn login(&self, email: &str, password: &str) -> AppResult<SessionUser> {
        let Some(user) = self.repo.find_by_email(email).await? else {
            warn!(%email, "login unknown email");
            return Err(AppError::InvalidCredentials);
        };
        if !self.scheme.verify(password, &user.password)? {
            warn!(%email, user_id = %user.id, "login invalid password");
            return Err(AppError::InvalidCredentials);
        }

        let session = SessionUser::from(&user);
        self.establish(session.clone()).await?;
        info!(user_id = %session.id, "user logged in");
        Ok(session)
    }

    /// Always succeeds; a failed delete of the stored entry is only logged.
    pub async fn logout(&self) {
        let previous = self.session.write().await.take();
        if let Err(e) = self.repo.clear_session().await {
            warn!(error = %e, "could not remove stored session");
        }
        if let Some(u) = previous {
            info!(user_id = %u.id, "user logged out");
        }
    }

    pub async fn current_session(&self) -> Option<SessionUser> {
        self.session.read().await.clone()
    }

    async fn establish(&self, user: SessionUser) -> AppResult<()> {
        self.repo.save_session(&user).await?;
        *self.session.write().await = Some(user);
        Ok(())
    }
}

#[cfg(test)]
mod identity_tests {
    use time::macros::datetime;

    use super::*;
    use crate::{
        auth::repo::{SESSION_KEY, USERS_KEY},
        clock::testing::ManualClock,
        storage::{KeyValueStore, MemoryStore},
    };

    async fn store_on(kv: Arc<MemoryStore>, scheme: CredentialScheme) -> IdentityStore {
        let clock = Arc::new(ManualClock::new(datetime!(2024-02-01 08:00 UTC)));
        IdentityStore::restore(UserRepo::new(kv), clock, scheme)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn register_signs_in_and_login_succeeds() {
        let kv = Arc::new(MemoryStore::new());
        let ids = store_on(kv.clone(), CredentialScheme::Plaintext).await;

        let alice = ids
            .register("alice@example.com", "pw-alice", "Alice", "Mokoena", Role::Resident)
            .await
            .unwrap();
        assert_eq!(alice.email, "alice@example.com");
        assert_eq!(alice.registered_at, datetime!(2024-02-01 08:00 UTC));
        assert_eq!(ids.current_session().await, Some(alice.clone()));

        ids.logout().await;
        assert_eq!(ids.current_session().await, None);
        assert_eq!(kv.get(SESSION_KEY).await.unwrap(), None);

        let again = ids.login("alice@example.com", "pw-alice").await.unwrap();
        assert_eq!(again, alice);
        assert_eq!(ids.current_session().await, Some(alice));
    }

    #[tokio::test]
    async fn duplicate_email_leaves_original_untouched() {
        let kv = Arc::new(MemoryStore::new());
        let ids = store_on(kv.clone(), CredentialScheme::Plaintext).await;

        let first = ids
            .register("bob@example.com", "first", "Bob", "Nkosi", Role::Resident)
            .await
            .unwrap();
        let before = kv.get(USERS_KEY).await.unwrap();

        let err = ids
            .register("bob@example.com", "second", "Robert", "Other", Role::Admin)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
        assert_eq!(kv.get(USERS_KEY).await.unwrap(), before);

        let back = ids.login("bob@example.com", "first").await.unwrap();
        assert_eq!(back, first);
        assert!(matches!(
            ids.login("bob@example.com", "second").await,
            Err(AppError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn email_match_is_case_sensitive() {
        let kv = Arc::new(MemoryStore::new());
        let ids = store_on(kv, CredentialScheme::Plaintext).await;
        ids.register("Case@Example.com", "pw", "C", "S", Role::Resident)
            .await
            .unwrap();
        assert!(ids
            .register("case@example.com", "pw", "C", "S", Role::Resident)
            .await
            .is_ok());
        assert!(matches!(
            ids.login("CASE@EXAMPLE.COM", "pw").await,
            Err(AppError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn unknown_email_is_invalid_credentials() {
        let kv = Arc::new(MemoryStore::new());
        let ids = store_on(kv, CredentialScheme::Plaintext).await;
        assert!(matches!(
            ids.login("nobody@example.com", "pw").await,
            Err(AppError::InvalidCredentials)
        ));
        assert_eq!(ids.current_session().await, None);
    }

    #[tokio::test]
    async fn session_survives_restart() {
        let kv = Arc::new(MemoryStore::new());
        let ids = store_on(kv.clone(), CredentialScheme::Plaintext).await;
        let admin = ids
            .register("ops@tshwane.gov.za", "pw", "Thabo", "Dlamini", Role::Admin)
            .await
            .unwrap();
        drop(ids);

        let restarted = store_on(kv, CredentialScheme::Plaintext).await;
        assert_eq!(restarted.current_session().await, Some(admin));
    }

    #[tokio::test]
    async fn malformed_session_is_cleared_on_restore() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(SESSION_KEY, "{\"id\": 42").await.unwrap();

        let ids = store_on(kv.clone(), CredentialScheme::Plaintext).await;
        assert_eq!(ids.current_session().await, None);
        assert_eq!(kv.get(SESSION_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn session_without_account_is_dropped_on_restore() {
        let kv = Arc::new(MemoryStore::new());
        let ids = store_on(kv.clone(), CredentialScheme::Plaintext).await;
        ids.register("alice@example.com", "pw", "Alice", "Mokoena", Role::Resident)
            .await
            .unwrap();
        drop(ids);
        kv.set(USERS_KEY, "[{\"id\": ").await.unwrap();

        let restarted = store_on(kv.clone(), CredentialScheme::Plaintext).await;
        assert_eq!(restarted.current_session().await, None);
        assert_eq!(kv.get(SESSION_KEY).await.unwrap(), None);
        assert!(kv.get("users.quarantine").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn argon2_scheme_never_stores_plaintext() {
        let kv = Arc::new(MemoryStore::new());
        let ids = store_on(kv.clone(), CredentialScheme::Argon2).await;
        ids.register("dee@example.com", "s3cret-pw", "Dee", "Z", Role::MunicipalWorker)
            .await
            .unwrap();

        let raw = kv.get(USERS_KEY).await.unwrap().unwrap();
        assert!(!raw.contains("s3cret-pw"));
        assert!(raw.contains("$argon2"));
        assert!(ids.login("dee@example.com", "s3cret-pw").await.is_ok());
    }
}
