use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{
    AppState,
    config::{Config, JwtConfig},
    error::AppError,
};

pub const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

pub fn generate_token(config: &JwtConfig, sub: impl Into<String>) -> anyhow::Result<String> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let claims = Claims {
        sub: sub.into(),
        iat: now,
        exp: now + config.expiration_days * 24 * 60 * 60,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(token)
}

/// Check signature and expiry.
pub fn verify_token(config: &JwtConfig, token: &str) -> jsonwebtoken::errors::Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

fn base_cookie(config: &Config, name: &'static str, value: String) -> Cookie<'static> {
    let production = config.server.is_production();

    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(production)
        .same_site(if production {
            SameSite::None
        } else {
            SameSite::Lax
        })
        .build()
}

/// Session cookie carrying a fresh token for `user_id`.
pub fn session_cookie(config: &Config, user_id: &str) -> Result<Cookie<'static>, AppError> {
    let token = generate_token(&config.jwt, user_id)
        .map_err(|e| AppError::internal("Server error", e))?;

    let mut cookie = base_cookie(config, TOKEN_COOKIE, token);
    cookie.set_max_age(Duration::days(config.jwt.expiration_days as i64));

    Ok(cookie)
}

/// Overwrites the session cookie with an already expired empty one.
pub fn clear_session_cookie(config: &Config) -> Cookie<'static> {
    let mut cookie = base_cookie(config, TOKEN_COOKIE, String::new());
    cookie.set_max_age(Duration::ZERO);
    cookie.set_expires(OffsetDateTime::UNIX_EPOCH);

    cookie
}

/// Token from the session cookie, else from `Authorization: Bearer`.
fn read_token(jar: &CookieJar, parts: &Parts) -> Option<String> {
    if let Some(cookie) = jar.get(TOKEN_COOKIE).filter(|c| !c.value().is_empty()) {
        return Some(cookie.value().to_owned());
    }

    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_owned())
        .filter(|token| !token.is_empty())
}

/// The authenticated user of a request. Handlers that take this extractor
/// are protected.
pub struct AuthUser(pub peerstake_user::User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let Some(token) = read_token(&jar, parts) else {
            return Err(AppError::from(peerstake_shared::Error::Unauthorized(
                "Authentication required".to_owned(),
            ))
            .into_response());
        };

        let claims = match verify_token(&state.config.jwt, &token) {
            Ok(claims) => claims,
            Err(err) => {
                tracing::debug!(err = %err, "rejected session token");

                return Err((
                    jar.add(clear_session_cookie(&state.config)),
                    AppError::from(peerstake_shared::Error::Unauthorized(
                        "Invalid token".to_owned(),
                    )),
                )
                    .into_response());
            }
        };

        match state.user_command.find(&claims.sub).await {
            Ok(Some(user)) => Ok(AuthUser(user)),
            Ok(None) => Err(AppError::from(peerstake_shared::Error::Unauthorized(
                "User not found".to_owned(),
            ))
            .into_response()),
            Err(err) => Err(
                AppError::internal("Server error during authentication", err).into_response(),
            ),
        }
    }
}
