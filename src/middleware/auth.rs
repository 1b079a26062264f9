use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    error::AppError,
    middleware::session::{SessionData, VisitorSession},
    state::AppState,
};

pub struct AdminSession(pub VisitorSession);

pub fn ensure_admin(session: &SessionData) -> Result<(), AppError> {
    if !session.admin {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = match VisitorSession::from_request_parts(parts, state).await {
            Ok(session) => session,
            Err(never) => match never {},
        };
        ensure_admin(&session.data)?;
        Ok(AdminSession(session))
    }
}
