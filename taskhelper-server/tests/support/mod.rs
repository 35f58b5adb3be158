#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Result, anyhow};
use axum::http::header;
use axum_test::{TestResponse, TestServer};
use taskhelper_server::{
    AppState, create_app,
    infra::{
        config::Config,
        startup::{NoopStartupHooks, StartupHooks},
    },
};

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

pub fn build_test_app(config: Config) -> Result<TestApp> {
    let state = AppState::bootstrap(Arc::new(config))?;
    NoopStartupHooks.run(&state)?;
    let make_service = create_app(state.clone()).into_make_service_with_connect_info::<SocketAddr>();
    let server = TestServer::builder()
        .http_transport()
        .build(make_service)
        .map_err(|err| anyhow!(err.to_string()))?;
    Ok(TestApp { server, state })
}

pub async fn login(server: &TestServer, username: &str, password: &str) -> TestResponse {
    server
        .post("/login")
        .form(&[("username", username), ("password", password)])
        .await
}

/// Raw `Set-Cookie` header of a response, if any.
pub fn set_cookie(response: &TestResponse) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// `name=value` pair of the session cookie set by a response, suitable for
/// a `Cookie` request header.
pub fn session_cookie_pair(response: &TestResponse) -> Option<String> {
    set_cookie(response)?
        .split(';')
        .next()
        .map(str::trim)
        .filter(|pair| pair.split_once('=').is_some_and(|(_, value)| !value.is_empty()))
        .map(str::to_string)
}

pub fn session_token(cookie_pair: &str) -> &str {
    cookie_pair
        .split_once('=')
        .map(|(_, token)| token)
        .unwrap_or_default()
}

pub fn location(response: &TestResponse) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
