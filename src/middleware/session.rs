use std::{convert::Infallible, sync::Arc};

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    cart::Cart,
    error::{AppError, AppResult},
    state::AppState,
};

pub const SESSION_COOKIE_NAME: &str = "vb_session";

const SESSION_TTL_HOURS: i64 = 7 * 24;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default)]
    pub cart: Cart,
    #[serde(default)]
    pub admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionClaims {
    #[serde(default)]
    cart: Cart,
    #[serde(default)]
    admin: bool,
    exp: usize,
}

#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    secure: bool,
}

impl SessionKeys {
    pub fn new(secret: &[u8], secure: bool) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            secure,
        }
    }

    pub fn encode(&self, data: &SessionData) -> AppResult<String> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::hours(SESSION_TTL_HOURS))
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

        let claims = SessionClaims {
            cart: data.cart.clone(),
            admin: data.admin,
            exp: expiration.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
    }

    pub fn decode(&self, token: &str) -> Option<SessionData> {
        match decode::<SessionClaims>(token, &self.decoding, &Validation::default()) {
            Ok(data) => Some(SessionData {
                cart: data.claims.cart,
                admin: data.claims.admin,
            }),
            Err(err) => {
                tracing::debug!(error = %err, "discarding unreadable session cookie");
                None
            }
        }
    }

    pub fn cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE_NAME, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(time::Duration::hours(SESSION_TTL_HOURS))
            .build()
    }
}

pub struct VisitorSession {
    pub data: SessionData,
    jar: CookieJar,
    keys: Arc<SessionKeys>,
}

impl VisitorSession {
    pub fn from_jar(jar: CookieJar, keys: Arc<SessionKeys>) -> Self {
        let data = jar
            .get(SESSION_COOKIE_NAME)
            .and_then(|cookie| keys.decode(cookie.value()))
            .unwrap_or_default();
        Self { data, jar, keys }
    }

    pub fn save(self) -> AppResult<CookieJar> {
        let token = self.keys.encode(&self.data)?;
        Ok(self.jar.add(self.keys.cookie(token)))
    }
}

impl FromRequestParts<AppState> for VisitorSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(Self::from_jar(jar, state.sessions.clone()))
    }
}
