use taskhelper_core::ViewId;

use crate::{middleware::CurrentSession, views::View};

pub async fn index(session: CurrentSession) -> View {
    View::for_session(ViewId::Index, &session)
}

pub async fn register(session: CurrentSession) -> View {
    View::for_session(ViewId::Register, &session)
}

pub async fn login_form(session: CurrentSession) -> View {
    View::for_session(ViewId::Login, &session)
}

pub async fn dashboard(session: CurrentSession) -> View {
    View::for_session(ViewId::Dashboard, &session)
}
