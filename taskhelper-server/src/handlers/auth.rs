use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::fmt;
use taskhelper_core::routes::redirects;
use tracing::{info, warn};

use crate::{
    infra::{
        app_state::AppState,
        errors::{AppError, AppResult},
    },
    middleware::{clear_session_cookie, create_session_cookie, extract_cookie},
};

/// Login form body. Absent fields deserialize as empty and fail
/// authentication like any other bad credential.
#[derive(Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<LoginForm>, FormRejection>,
) -> AppResult<Response> {
    let LoginForm { username, password } = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!(reason = %rejection.body_text(), "unreadable login form");
            LoginForm::default()
        }
    };

    if username.is_empty() || password.is_empty() {
        warn!(username = %username, "login attempt with missing credentials");
        return Ok(Redirect::to(redirects::LOGIN_FAILURE).into_response());
    }

    let Some(principal) = state.authenticate(username.clone(), password).await? else {
        warn!(username = %username, "login failed");
        return Ok(Redirect::to(redirects::LOGIN_FAILURE).into_response());
    };

    let session_config = &state.config.session;
    if let Some(previous) = extract_cookie(&headers, &session_config.cookie_name) {
        state.sessions.invalidate(&previous);
    }

    let (token, session) = state
        .sessions
        .create(principal)
        .map_err(|err| AppError::internal(format!("Failed to issue session: {err}")))?;
    info!(username = %username, session_id = %session.id, "login succeeded");

    let cookie = create_session_cookie(session_config, token.as_str());
    Ok((
        [(header::SET_COOKIE, cookie)],
        Redirect::to(redirects::LOGIN_SUCCESS),
    )
        .into_response())
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session_config = &state.config.session;
    let ended = extract_cookie(&headers, &session_config.cookie_name)
        .and_then(|token| state.sessions.invalidate(&token));

    match ended {
        Some(session) => info!(
            username = %session.principal.username,
            session_id = %session.id,
            "logout"
        ),
        None => info!("logout without an active session"),
    }

    (
        [(header::SET_COOKIE, clear_session_cookie(session_config))],
        Redirect::to(redirects::LOGOUT_SUCCESS),
    )
        .into_response()
}
