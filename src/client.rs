/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::api::{API_ORIGIN, ApiClient, ApiToken, DEFAULT_TIMEOUT};
use crate::errors::FImageError;
use crate::{AlbumsService, FilesService, ShareService, TagsService, TrashService};
use std::sync::Arc;
use std::time::Duration;

/// Environment variable holding the API token
pub const ENV_API_TOKEN: &str = "FIMAGE_API_TOKEN";

/// Environment variable overriding the base URL
pub const ENV_BASE_URL: &str = "FIMAGE_BASE_URL";

/// Environment variable overriding the timeout, in whole seconds
pub const ENV_TIMEOUT_SECS: &str = "FIMAGE_TIMEOUT_SECS";

/// Entry point to the F-Image API.
///
/// Cloning is cheap; clones share the same connection pool.
///
/// ```rust,no_run
/// # async fn run() -> Result<(), fimage::FImageError> {
/// use fimage::{AlbumProps, Client};
/// use std::time::Duration;
///
/// let client = Client::builder("fimg_live_your_token_here")
///     .timeout(Duration::from_secs(60))
///     .build()?;
/// let album = client.albums().create(AlbumProps::new("Vacation Photos")).await?;
/// println!("Created album {}", album.id);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    api_client: Arc<ApiClient>,
    files: FilesService,
    albums: AlbumsService,
    share: ShareService,
    tags: TagsService,
    trash: TrashService,
}

impl Client {
    /// Creates a client for the production API with default settings
    pub fn new(api_token: impl Into<String>) -> Result<Self, FImageError> {
        Self::builder(api_token).build()
    }

    /// Starts configuring a client
    pub fn builder(api_token: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_token)
    }

    fn from_api_client(api_client: ApiClient) -> Self {
        let api_client = Arc::new(api_client);
        Self {
            files: FilesService::new(api_client.clone()),
            albums: AlbumsService::new(api_client.clone()),
            share: ShareService::new(api_client.clone()),
            tags: TagsService::new(api_client.clone()),
            trash: TrashService::new(api_client.clone()),
            api_client,
        }
    }

    /// Lower level access for endpoints not covered by the services
    pub fn api_client(&self) -> &ApiClient {
        &self.api_client
    }

    pub fn base_url(&self) -> &str {
        self.api_client.base_url()
    }

    pub fn timeout(&self) -> Duration {
        self.api_client.timeout()
    }

    /// Returns a client sharing this one's connection pool but using another timeout
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let mut api_client = (*self.api_client).clone();
        api_client.set_timeout(timeout);
        Self::from_api_client(api_client)
    }

    pub fn files(&self) -> &FilesService {
        &self.files
    }

    pub fn albums(&self) -> &AlbumsService {
        &self.albums
    }

    pub fn share(&self) -> &ShareService {
        &self.share
    }

    pub fn tags(&self) -> &TagsService {
        &self.tags
    }

    pub fn trash(&self) -> &TrashService {
        &self.trash
    }
}

/// Builder for [`Client`]. For every setting the last call wins.
///
/// Defaults:
/// - Base URL: `https://f-image.com`
/// - Timeout: 30 seconds
/// - User agent: `f-image-rust/<crate version>`
#[derive(Debug)]
pub struct ClientBuilder {
    api_token: ApiToken,
    base_url: String,
    timeout: Duration,
    user_agent: String,
    https_client: Option<reqwest::Client>,
}

impl ClientBuilder {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: ApiToken::new(api_token),
            base_url: API_ORIGIN.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
            https_client: None,
        }
    }

    /// Reads `FIMAGE_API_TOKEN` (required), `FIMAGE_BASE_URL` and `FIMAGE_TIMEOUT_SECS`.
    ///
    /// Load a `.env` file first (e.g. with `dotenvy`) if settings live there.
    pub fn from_env() -> Result<Self, FImageError> {
        let token = std::env::var(ENV_API_TOKEN)
            .map_err(|_| FImageError::Config(format!("{ENV_API_TOKEN} is not set")))?;
        let mut builder = Self::new(token);

        if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
            builder = builder.base_url(base_url);
        }
        if let Ok(secs) = std::env::var(ENV_TIMEOUT_SECS) {
            let secs = secs.trim().parse::<u64>().map_err(|e| {
                FImageError::Config(format!("{ENV_TIMEOUT_SECS} is not a number of seconds: {e}"))
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(builder)
    }

    /// API origin; a trailing slash is dropped
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Deadline for a whole request, response body included
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Use a preconfigured reqwest client (proxies, TLS settings, ...)
    pub fn http_client(mut self, https_client: reqwest::Client) -> Self {
        self.https_client = Some(https_client);
        self
    }

    pub fn build(self) -> Result<Client, FImageError> {
        let base_url = self.base_url.trim().trim_end_matches('/').to_string();
        url::Url::parse(&base_url)?;

        let https_client = match self.https_client {
            Some(client) => client,
            None => reqwest::Client::builder().build()?,
        };

        Ok(Client::from_api_client(ApiClient::new(
            base_url,
            self.api_token,
            self.user_agent,
            self.timeout,
            https_client,
        )))
    }
}

fn default_user_agent() -> String {
    format!("f-image-rust/{}", env!("CARGO_PKG_VERSION"))
}
