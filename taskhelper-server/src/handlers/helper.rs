use taskhelper_core::ViewId;

use crate::{middleware::CurrentSession, views::View};

pub async fn earnings(session: CurrentSession) -> View {
    View::for_session(ViewId::Earnings, &session)
}
