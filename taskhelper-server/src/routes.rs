use axum::{Router, middleware, routing::get};
use taskhelper_core::routes::{self as paths, helper, tasks};

use crate::{
    handlers::{self, auth, pages},
    infra::app_state::AppState,
    middleware::{access_middleware, session_middleware},
};

/// Create the page and security routes. Each path is registered once;
/// axum panics on a duplicate registration.
pub fn create_router(state: AppState) -> Router<AppState> {
    Router::new()
        // Pages
        .route(paths::INDEX, get(pages::index))
        .route(paths::REGISTER, get(pages::register))
        .route(paths::LOGIN, get(pages::login_form).post(auth::login))
        .route(paths::LOGOUT, get(auth::logout).post(auth::logout))
        .route(paths::DASHBOARD, get(pages::dashboard))
        // Tasks
        .route(tasks::LIST, get(handlers::tasks::list))
        .route(tasks::CREATE, get(handlers::tasks::create))
        .route(tasks::DETAIL, get(handlers::tasks::detail))
        .route(tasks::MY, get(handlers::tasks::my_tasks))
        .route(tasks::HELPER, get(handlers::tasks::helper_tasks))
        .route(tasks::APPLICATION, get(handlers::tasks::application))
        // Helper
        .route(helper::EARNINGS, get(handlers::helper::earnings))
        // Layers added last run first: resolve the session, then check access
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            access_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(state, session_middleware))
        .fallback(handlers::not_found)
}
