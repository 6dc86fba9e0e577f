/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use fimage::{Client, ClientBuilder};
use std::time::Duration;
use wiremock::{MockServer, Request};

#[allow(dead_code)]
pub(crate) const TEST_TOKEN: &str = "fimg_test_token";

#[allow(dead_code)]
pub(crate) const TEST_USER_AGENT: &str = "fimage-tests/1.0";

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Client pointed at the mock server
#[allow(dead_code)]
pub(crate) fn mock_client(server: &MockServer) -> Client {
    mock_client_with_timeout(server, Duration::from_secs(5))
}

#[allow(dead_code)]
pub(crate) fn mock_client_with_timeout(server: &MockServer, timeout: Duration) -> Client {
    init_logging();
    Client::builder(TEST_TOKEN)
        .base_url(server.uri())
        .user_agent(TEST_USER_AGENT)
        .timeout(timeout)
        .build()
        .unwrap()
}

/// Every request the mock server has seen so far
#[allow(dead_code)]
pub(crate) async fn received(server: &MockServer) -> Vec<Request> {
    server.received_requests().await.unwrap_or_default()
}

#[allow(dead_code)]
pub(crate) fn header<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|v| v.to_str().ok())
}

/// Client for the real service, configured from the environment (or a `.env` file)
#[allow(dead_code)]
pub(crate) fn live_client() -> anyhow::Result<Client> {
    dotenvy::dotenv().ok();
    init_logging();
    Ok(ClientBuilder::from_env()?.build()?)
}
