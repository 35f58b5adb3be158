use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use taskhelper_core::{auth::AccessDecision, routes::redirects};
use tracing::debug;

use super::session::CurrentSession;
use crate::infra::{app_state::AppState, errors::AppError};

/// Apply the configured access policy to the matched route. Must run after
/// `session_middleware`, which supplies [`CurrentSession`].
pub async fn access_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(route) = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
    else {
        return next.run(request).await;
    };

    let session = request
        .extensions()
        .get::<CurrentSession>()
        .cloned()
        .unwrap_or_default();

    match state.policy.decide(&route, session.principal()) {
        AccessDecision::Allow => next.run(request).await,
        AccessDecision::LoginRequired => {
            debug!(route = %route, "anonymous request redirected to login");
            Redirect::to(redirects::LOGIN_REQUIRED).into_response()
        }
        AccessDecision::Forbidden { required } => {
            debug!(
                route = %route,
                username = session.username().unwrap_or_default(),
                required = %required,
                "request rejected by access policy"
            );
            AppError::forbidden(format!("Role '{required}' required")).into_response()
        }
    }
}
