use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use serde::Deserialize;
use serde_json::json;
use time::Duration;
use ulid::Ulid;

use crate::{AppState, auth::session_cookie};

const STATE_COOKIE: &str = "oauth_state";
const STATE_COOKIE_PATH: &str = "/api/auth/github";

fn state_cookie(state: &AppState, value: String) -> Cookie<'static> {
    let production = state.config.server.is_production();

    Cookie::build((STATE_COOKIE, value))
        .path(STATE_COOKIE_PATH)
        .http_only(true)
        .secure(production)
        .same_site(SameSite::Lax)
        .max_age(Duration::minutes(10))
        .build()
}

fn clear_state_cookie(state: &AppState) -> Cookie<'static> {
    let mut cookie = state_cookie(state, String::new());
    cookie.set_max_age(Duration::ZERO);
    cookie
}

/// GET /api/auth/github
pub async fn start(State(state): State<AppState>, jar: CookieJar) -> Response {
    let Some(provider) = state.identity_provider.as_ref() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "message": "GitHub authentication is not configured on the server",
                "error": "Missing GitHub OAuth credentials",
            })),
        )
            .into_response();
    };

    let csrf = Ulid::new().to_string();
    match provider.authorize_url(&state.config.github_callback_url(), &csrf) {
        Ok(url) => (
            jar.add(state_cookie(&state, csrf)),
            Redirect::to(url.as_str()),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(err = %err, "failed to build github authorize url");
            Redirect::to(&state.config.client_page("/login?error=github_auth_failed"))
                .into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// GET /api/auth/github/callback
#[tracing::instrument(skip_all)]
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    params: Result<Query<CallbackParams>, QueryRejection>,
) -> Response {
    let expected = jar.get(STATE_COOKIE).map(|c| c.value().to_owned());
    let jar = jar.add(clear_state_cookie(&state));
    let fail = |jar: CookieJar, query: &str| {
        (
            jar,
            Redirect::to(&state.config.client_page(&format!("/login?{query}"))),
        )
            .into_response()
    };

    let Some(provider) = state.identity_provider.as_ref() else {
        return fail(jar, "error=github_not_configured");
    };

    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => {
            tracing::warn!(err = %rejection, "malformed github callback query");
            return fail(jar, "error=github_auth_failed");
        }
    };

    if let Some(error) = params.error {
        tracing::warn!(error = %error, "github denied authorization");
        return fail(jar, "error=github_auth_failed");
    }

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return fail(jar, "error=github_auth_failed");
    };

    if expected.is_none() || params.state != expected {
        tracing::warn!("github callback state mismatch");
        return fail(jar, "error=github_auth_failed");
    }

    let profile = match provider
        .fetch_profile(&code, &state.config.github_callback_url())
        .await
    {
        Ok(profile) => profile,
        Err(err) => {
            tracing::warn!(err = %err, "github authentication failed");
            return fail(jar, "error=github_auth_failed");
        }
    };

    if profile.id.trim().is_empty() {
        return fail(jar, "error=user_id_missing");
    }

    let user = match state.user_command.federate(profile).await {
        Ok(user) => user,
        Err(err) => {
            tracing::error!(err = %err, "github federation failed");
            let message = urlencoding::encode(&err.to_string()).into_owned();
            return fail(jar, &format!("error=server_error&message={message}"));
        }
    };

    let cookie = match session_cookie(&state.config, &user.id) {
        Ok(cookie) => cookie,
        Err(err) => {
            let message = urlencoding::encode(&err.to_string()).into_owned();
            return fail(jar, &format!("error=server_error&message={message}"));
        }
    };

    tracing::info!(user_id = %user.id, "github login");

    (
        jar.add(cookie),
        Redirect::to(&state.config.client_page("/challenges")),
    )
        .into_response()
}
