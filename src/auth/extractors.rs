use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};

use crate::{auth::repo_types::SessionUser, error::AppError, state::AppState};

/// The signed-in user, or 401 when nobody is.
pub struct CurrentUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state
            .identity
            .current_session()
            .await
            .map(CurrentUser)
            .ok_or_else(|| {
                let e = AppError::Unauthenticated;
                (e.status_code(), e.to_string())
            })
    }
}
