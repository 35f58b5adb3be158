use axum::{
    http::{HeaderName, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use taskhelper_core::ViewId;

use crate::middleware::CurrentSession;

pub const VIEW_ID_HEADER: HeaderName = HeaderName::from_static("x-view-id");

/// Response naming the template a page route renders. The body is a
/// minimal HTML shell; template rendering lives outside this server.
#[derive(Debug, Clone)]
pub struct View {
    pub id: ViewId,
    pub username: Option<String>,
}

impl View {
    pub fn new(id: ViewId) -> Self {
        Self { id, username: None }
    }

    pub fn for_session(id: ViewId, session: &CurrentSession) -> Self {
        Self {
            id,
            username: session.username().map(str::to_string),
        }
    }

    fn render(&self) -> String {
        let user_attr = self
            .username
            .as_deref()
            .map(|name| format!(" data-user=\"{}\"", escape_attr(name)))
            .unwrap_or_default();

        format!(
            "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>{id}</title></head>\
             <body data-view=\"{id}\"{user_attr}></body></html>\n",
            id = self.id.as_str(),
        )
    }
}

impl IntoResponse for View {
    fn into_response(self) -> Response {
        let body = self.render();
        (
            StatusCode::OK,
            [
                (VIEW_ID_HEADER, HeaderValue::from_static(self.id.as_str())),
                (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
            ],
            Html(body),
        )
            .into_response()
    }
}

fn escape_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
