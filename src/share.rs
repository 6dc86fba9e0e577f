/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::api::{ApiClient, MessageResponse};
use crate::errors::{FImageError, require_id};
use crate::parsers::{from_null_to_default, from_shared_content_type, is_none_or_empty_str};
use crate::properties::{PageOptions, SharedContentType};
use crate::{Album, File};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A share link to a single file or album.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ShareLink {
    pub id: i64,

    pub token: String,

    /// Public URL of the share
    pub share_url: String,

    pub file_id: Option<i64>,

    pub album_id: Option<i64>,

    pub file_name: Option<String>,

    pub album_name: Option<String>,

    pub has_password: bool,

    pub expires_at: Option<DateTime<Utc>>,

    pub max_views: Option<i64>,

    pub view_count: i64,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}

/// A page of share links
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SharesListResponse {
    #[serde(deserialize_with = "from_null_to_default")]
    pub shares: Vec<ShareLink>,

    pub total: Option<u64>,

    pub page: u32,

    pub limit: u32,
}

/// Content reached through a share token
#[derive(Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SharedContent {
    #[serde(rename = "type", deserialize_with = "from_shared_content_type")]
    pub content_type: SharedContentType,

    /// Set for file shares
    pub file: Option<File>,

    /// Set for album shares
    pub album: Option<Album>,

    /// Files of a shared album
    #[serde(deserialize_with = "from_null_to_default")]
    pub files: Vec<File>,

    /// The share is protected; use [`ShareService::verify_password`]
    pub requires_password: bool,
}

/// Options for [`ShareService::create`]. Exactly one of `file_id` and `album_id` must be set.
///
/// ```rust
/// use fimage::CreateShareOptions;
///
/// let opts = CreateShareOptions::file(123)
///     .with_password("secret123")
///     .with_expiration(24)
///     .with_max_views(100);
/// assert_eq!(opts.file_id, Some(123));
/// ```
#[derive(Serialize, Default, Debug, Clone)]
pub struct CreateShareOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_id: Option<i64>,

    #[serde(skip_serializing_if = "is_none_or_empty_str")]
    pub password: Option<String>,

    /// Hours until the link expires; `None` never expires
    #[serde(rename = "expires_in", skip_serializing_if = "Option::is_none")]
    pub expires_in_hours: Option<u32>,

    /// `None` allows unlimited views
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_views: Option<u32>,
}

impl CreateShareOptions {
    /// Share a single file
    pub fn file(file_id: i64) -> Self {
        Self {
            file_id: Some(file_id),
            ..Default::default()
        }
    }

    /// Share a whole album
    pub fn album(album_id: i64) -> Self {
        Self {
            album_id: Some(album_id),
            ..Default::default()
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Expire the link after `hours`; zero removes the expiration
    pub fn with_expiration(mut self, hours: u32) -> Self {
        self.expires_in_hours = (hours > 0).then_some(hours);
        self
    }

    /// Limit the number of views; zero removes the limit
    pub fn with_max_views(mut self, max_views: u32) -> Self {
        self.max_views = (max_views > 0).then_some(max_views);
        self
    }

    /// Absolute expiry if the link were created now
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_in_hours
            .map(|hours| Utc::now() + Duration::hours(i64::from(hours)))
    }

    fn validate(&self) -> Result<(), FImageError> {
        match (self.file_id, self.album_id) {
            (Some(id), None) => require_id(id, "file id"),
            (None, Some(id)) => require_id(id, "album id"),
            (None, None) => Err(FImageError::invalid_argument(
                "either a file id or an album id is required",
            )),
            (Some(_), Some(_)) => Err(FImageError::invalid_argument(
                "a share targets either a file or an album, not both",
            )),
        }
    }
}

/// Options for [`ShareService::update`]. At least one field must be set.
#[derive(Serialize, Default, Debug, Clone)]
pub struct UpdateShareOptions {
    /// New password; an empty string removes the password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_views: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UpdateShareOptions {
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn clear_password(mut self) -> Self {
        self.password = Some(String::new());
        self
    }

    pub fn with_max_views(mut self, max_views: i64) -> Self {
        self.max_views = Some(max_views);
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    fn is_empty(&self) -> bool {
        self.password.is_none() && self.max_views.is_none() && self.is_active.is_none()
    }
}

#[derive(Serialize, Debug)]
struct VerifyPasswordRequest<'a> {
    password: &'a str,
}

/// Create and manage share links, and open shared content.
#[derive(Debug, Clone)]
pub struct ShareService {
    api_client: Arc<ApiClient>,
}

impl ShareService {
    const BASE_URI: &'static str = "/api/shares";

    pub(crate) fn new(api_client: Arc<ApiClient>) -> Self {
        Self { api_client }
    }

    /// Returns one page of the user's share links
    pub async fn list(&self, page: PageOptions) -> Result<SharesListResponse, FImageError> {
        Ok(self
            .api_client
            .get_with_query::<SharesListResponse>(Self::BASE_URI, &page.to_params())
            .await?
            .unwrap_or_default())
    }

    /// Creates a share link
    pub async fn create(&self, opts: CreateShareOptions) -> Result<ShareLink, FImageError> {
        opts.validate()?;
        self.api_client
            .post::<_, ShareLink>(Self::BASE_URI, Some(&opts))
            .await?
            .ok_or(FImageError::ResponseMissing())
    }

    /// Changes the password, view limit or active flag of a share link
    pub async fn update(
        &self,
        share_id: i64,
        opts: UpdateShareOptions,
    ) -> Result<ShareLink, FImageError> {
        require_id(share_id, "share id")?;
        if opts.is_empty() {
            return Err(FImageError::invalid_argument("update options are required"));
        }
        self.api_client
            .put::<_, ShareLink>(&Self::share_uri(share_id), Some(&opts))
            .await?
            .ok_or(FImageError::ResponseMissing())
    }

    pub async fn delete(&self, share_id: i64) -> Result<MessageResponse, FImageError> {
        require_id(share_id, "share id")?;
        Ok(self
            .api_client
            .delete::<MessageResponse>(&Self::share_uri(share_id))
            .await?
            .unwrap_or_default())
    }

    /// Opens a share link. The endpoint is public; the token is still sent.
    pub async fn access(&self, token: &str) -> Result<SharedContent, FImageError> {
        let path = Self::public_uri(token)?;
        self.api_client
            .get::<SharedContent>(&path)
            .await?
            .ok_or(FImageError::ResponseMissing())
    }

    /// Opens a password protected share link
    pub async fn verify_password(
        &self,
        token: &str,
        password: &str,
    ) -> Result<SharedContent, FImageError> {
        let path = format!("{}/verify", Self::public_uri(token)?);
        if password.is_empty() {
            return Err(FImageError::invalid_argument("password is required"));
        }
        let req = VerifyPasswordRequest { password };
        self.api_client
            .post::<_, SharedContent>(&path, Some(&req))
            .await?
            .ok_or(FImageError::ResponseMissing())
    }

    fn share_uri(share_id: i64) -> String {
        format!("{}/{}", Self::BASE_URI, share_id)
    }

    fn public_uri(token: &str) -> Result<String, FImageError> {
        if token.trim().is_empty() {
            return Err(FImageError::invalid_argument("share token is required"));
        }
        Ok(format!("/api/s/{}", urlencoding::encode(token)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_body_only_carries_set_fields() {
        let body = serde_json::to_value(CreateShareOptions::album(9).with_max_views(0)).unwrap();
        assert_eq!(body, json!({"album_id": 9}));

        let body = serde_json::to_value(
            CreateShareOptions::file(4)
                .with_password("pw")
                .with_expiration(24)
                .with_max_views(3),
        )
        .unwrap();
        assert_eq!(
            body,
            json!({"file_id": 4, "password": "pw", "expires_in": 24, "max_views": 3})
        );
    }

    #[test]
    fn share_needs_exactly_one_target() {
        assert!(CreateShareOptions::default().validate().is_err());
        let both = CreateShareOptions {
            file_id: Some(1),
            album_id: Some(2),
            ..Default::default()
        };
        assert!(both.validate().is_err());
        assert!(CreateShareOptions::file(1).validate().is_ok());
    }

    #[test]
    fn expiry_is_relative_to_now() {
        assert_eq!(CreateShareOptions::file(1).expires_at(), None);
        let expires = CreateShareOptions::file(1).with_expiration(2).expires_at().unwrap();
        let delta = expires - Utc::now();
        assert!(delta > Duration::minutes(119) && delta <= Duration::hours(2));
    }

    #[test]
    fn clearing_password_sends_empty_string() {
        let body = serde_json::to_value(UpdateShareOptions::default().clear_password()).unwrap();
        assert_eq!(body, json!({"password": ""}));
    }

    #[test]
    fn token_is_path_encoded() {
        assert_eq!(ShareService::public_uri("a b/c").unwrap(), "/api/s/a%20b%2Fc");
        assert!(ShareService::public_uri("").is_err());
    }

    #[test]
    fn null_or_unknown_type_is_tolerated() {
        let content: SharedContent =
            serde_json::from_value(json!({"type": null, "requires_password": true})).unwrap();
        assert_eq!(content.content_type, SharedContentType::Unknown);
        assert!(content.requires_password);

        let content: SharedContent = serde_json::from_value(json!({"type": "video"})).unwrap();
        assert_eq!(content.content_type, SharedContentType::Unknown);
    }

    #[test]
    fn shared_album_decodes() {
        let content: SharedContent = serde_json::from_value(json!({
            "type": "album",
            "album": {"id": 5, "name": "Trip", "description": "", "file_count": 1, "created_at": "2024-01-01"},
            "files": [{"id": 8, "original_name": "x.png"}],
            "requires_password": false
        }))
        .unwrap();
        assert_eq!(content.content_type, SharedContentType::Album);
        assert_eq!(content.album.unwrap().name, "Trip");
        assert_eq!(content.files.len(), 1);
    }
}
