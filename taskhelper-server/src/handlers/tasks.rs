//! Task pages. Handlers with an `{id}` segment only validate and log it;
//! nothing is looked up.

use axum::extract::{Path, rejection::PathRejection};
use taskhelper_core::ViewId;
use tracing::debug;

use crate::{infra::errors::AppResult, middleware::CurrentSession, views::View};

pub async fn list(session: CurrentSession) -> View {
    View::for_session(ViewId::TaskList, &session)
}

pub async fn create(session: CurrentSession) -> View {
    View::for_session(ViewId::TaskCreate, &session)
}

pub async fn detail(
    session: CurrentSession,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<View> {
    let Path(id) = id?;
    debug!(task_id = id, "task detail requested");
    Ok(View::for_session(ViewId::TaskDetail, &session))
}

pub async fn my_tasks(session: CurrentSession) -> View {
    View::for_session(ViewId::TaskMy, &session)
}

pub async fn helper_tasks(session: CurrentSession) -> View {
    View::for_session(ViewId::TaskHelper, &session)
}

pub async fn application(
    session: CurrentSession,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<View> {
    let Path(id) = id?;
    debug!(task_id = id, "task application requested");
    Ok(View::for_session(ViewId::TaskApplication, &session))
}
