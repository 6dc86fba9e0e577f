/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::errors::{FImageError, classify_api_error};
use bytes::Bytes;
use log::{debug, trace, warn};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// Root F-Image API
pub const API_ORIGIN: &str = "https://f-image.com";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Query parameters appended to a request path
pub type ApiParams<'a> = [(&'a str, String)];

/// Directly communicates with the API.
///
/// Every request carries the bearer token, the user agent and
/// `Accept: application/json`. Non-2xx responses are turned into
/// [`FImageError::Api`] by [`classify_api_error`].
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    token: ApiToken,
    user_agent: String,
    timeout: Duration,
    https_client: reqwest::Client,
}

impl ApiClient {
    pub(crate) fn new(
        base_url: String,
        token: ApiToken,
        user_agent: String,
        timeout: Duration,
        https_client: reqwest::Client,
    ) -> Self {
        Self {
            base_url,
            token,
            user_agent,
            timeout,
            https_client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Performs a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, FImageError> {
        self.send::<(), T>(Method::GET, path, None).await
    }

    /// Performs a GET request, appending `params` as a query string when non-empty
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &ApiParams<'_>,
    ) -> Result<Option<T>, FImageError> {
        let path = with_query(path, params);
        self.get(&path).await
    }

    /// Performs a POST request with an optional JSON body
    pub async fn post<B, T>(&self, path: &str, body: Option<&B>) -> Result<Option<T>, FImageError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, path, body).await
    }

    /// Performs a PUT request with an optional JSON body
    pub async fn put<B, T>(&self, path: &str, body: Option<&B>) -> Result<Option<T>, FImageError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::PUT, path, body).await
    }

    /// Performs a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, FImageError> {
        self.send::<(), T>(Method::DELETE, path, None).await
    }

    /// Performs a DELETE request carrying a JSON body
    pub async fn delete_with_body<B, T>(&self, path: &str, body: &B) -> Result<Option<T>, FImageError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::DELETE, path, Some(body)).await
    }

    /// Sends one request and decodes the JSON response.
    ///
    /// `path` is appended to the base URL as is, so it must start with `/` and
    /// carry any query string already encoded. A 2xx response with an empty body
    /// yields `Ok(None)`.
    pub async fn send<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Option<T>, FImageError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        // Serialize before touching the network
        let data = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(FImageError::JsonSerialization)?;

        let mut req = self.build_request(method, path);
        if let Some(data) = data {
            req = req.header(CONTENT_TYPE, "application/json").body(data);
        }

        let resp_body = self.execute(req).await?;
        if resp_body.is_empty() {
            return Ok(None);
        }
        serde_json::from_slice::<T>(&resp_body)
            .map(Some)
            .map_err(FImageError::ApiResponseMalformed)
    }

    /// Uploads `file` as a multipart form and returns the raw response body.
    ///
    /// The form holds a single part named `file` followed by one text part per
    /// entry of `fields`. The file body is streamed as is and read only once.
    pub async fn upload_multipart(
        &self,
        path: &str,
        file: impl Into<Body>,
        filename: &str,
        fields: &[(String, String)],
    ) -> Result<Bytes, FImageError> {
        let part = Part::stream(file)
            .file_name(filename.to_string())
            .mime_str("application/octet-stream")?;

        let mut form = Form::new().part("file", part);
        for (name, value) in fields {
            trace!("multipart field {name}");
            form = form.text(name.clone(), value.clone());
        }

        let req = self.build_request(Method::POST, path).multipart(form);
        self.execute(req).await
    }

    fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{method} {url}");
        self.https_client
            .request(method, url)
            .timeout(self.timeout)
            .header(AUTHORIZATION, format!("Bearer {}", self.token.as_str()))
            .header(USER_AGENT, self.user_agent.as_str())
            .header(ACCEPT, "application/json")
    }

    // Sends the request and reads the whole body, classifying non-2xx statuses
    async fn execute(&self, req: RequestBuilder) -> Result<Bytes, FImageError> {
        let resp = req.send().await?;
        let status = resp.status();
        debug!("response status {status}");
        let body = resp.bytes().await?;

        if !status.is_success() {
            let err = classify_api_error(status.as_u16(), &body);
            warn!("{err}");
            return Err(err.into());
        }
        Ok(body)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Bearer credential sent with every request. Never validated locally.
#[derive(Default, Clone)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiToken(xxx)")
    }
}

// Appends an encoded query string when there is anything to append
pub(crate) fn with_query(path: &str, params: &ApiParams<'_>) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
        .finish();
    format!("{path}?{query}")
}

/// Plain acknowledgement returned by most mutating endpoints
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub info: String,
}

/// Counts reported by a batch soft delete
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct BatchDeleteResponse {
    #[serde(default)]
    pub deleted: u64,

    #[serde(default)]
    pub failed: u64,

    #[serde(default)]
    pub message: String,
}
