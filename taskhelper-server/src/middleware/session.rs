use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use std::{convert::Infallible, future::ready, time::Duration};
use taskhelper_core::auth::{Principal, Session};

use crate::infra::{app_state::AppState, config::SessionConfig};

/// Session resolved from the request cookie, if any. Inserted by
/// [`session_middleware`]; extracting it never fails.
#[derive(Debug, Clone, Default)]
pub struct CurrentSession(pub Option<Session>);

impl CurrentSession {
    pub fn principal(&self) -> Option<&Principal> {
        self.0.as_ref().map(|session| &session.principal)
    }

    pub fn username(&self) -> Option<&str> {
        self.principal().map(|principal| principal.username.as_str())
    }
}

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        ready(Ok(parts
            .extensions
            .get::<CurrentSession>()
            .cloned()
            .unwrap_or_default()))
    }
}

pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let session = extract_cookie(request.headers(), &state.config.session.cookie_name)
        .and_then(|token| state.sessions.resolve(&token));

    request.extensions_mut().insert(CurrentSession(session));
    next.run(request).await
}

pub fn create_session_cookie(config: &SessionConfig, token: &str) -> String {
    cookie_string(&config.cookie_name, token, config.ttl, config.secure_cookie)
}

/// Expire the session cookie on the client.
pub fn clear_session_cookie(config: &SessionConfig) -> String {
    cookie_string(&config.cookie_name, "", Duration::ZERO, config.secure_cookie)
}

fn cookie_string(name: &str, value: &str, max_age: Duration, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        name,
        value,
        max_age.as_secs()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name && !value.is_empty()).then(|| value.to_string())
        })
}
