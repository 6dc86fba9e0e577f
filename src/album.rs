/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::api::{ApiClient, MessageResponse};
use crate::errors::{FImageError, require_id};
use crate::parsers::{from_null_to_default, is_none_or_empty_str};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Holds information returned from the Albums API.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Album {
    pub id: i64,

    pub name: String,

    pub description: String,

    pub file_count: i64,

    pub created_at: String,
}

/// Properties used to create or rename an Album
#[derive(Serialize, Default, Debug, Clone)]
pub struct AlbumProps {
    /// Album name (required)
    pub name: String,

    #[serde(skip_serializing_if = "is_none_or_empty_str")]
    pub description: Option<String>,
}

impl AlbumProps {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn validate(&self) -> Result<(), FImageError> {
        if self.name.is_empty() {
            return Err(FImageError::invalid_argument("album name is required"));
        }
        Ok(())
    }
}

// Expected response for the album list
#[derive(Deserialize, Default, Debug)]
struct AlbumsResponse {
    #[serde(default, deserialize_with = "from_null_to_default")]
    albums: Vec<Album>,
}

/// Create, rename and remove albums.
#[derive(Debug, Clone)]
pub struct AlbumsService {
    api_client: Arc<ApiClient>,
}

impl AlbumsService {
    const BASE_URI: &'static str = "/api/albums";

    pub(crate) fn new(api_client: Arc<ApiClient>) -> Self {
        Self { api_client }
    }

    /// Returns all albums of the authenticated user
    pub async fn list(&self) -> Result<Vec<Album>, FImageError> {
        Ok(self
            .api_client
            .get::<AlbumsResponse>(Self::BASE_URI)
            .await?
            .unwrap_or_default()
            .albums)
    }

    /// Returns the album with the given id
    pub async fn get(&self, album_id: i64) -> Result<Album, FImageError> {
        require_id(album_id, "album id")?;
        self.api_client
            .get::<Album>(&Self::album_uri(album_id))
            .await?
            .ok_or(FImageError::ResponseMissing())
    }

    /// Creates a new album
    pub async fn create(&self, props: AlbumProps) -> Result<Album, FImageError> {
        props.validate()?;
        self.api_client
            .post::<_, Album>(Self::BASE_URI, Some(&props))
            .await?
            .ok_or(FImageError::ResponseMissing())
    }

    /// Renames an album and replaces its description
    pub async fn update(&self, album_id: i64, props: AlbumProps) -> Result<Album, FImageError> {
        require_id(album_id, "album id")?;
        props.validate()?;
        self.api_client
            .put::<_, Album>(&Self::album_uri(album_id), Some(&props))
            .await?
            .ok_or(FImageError::ResponseMissing())
    }

    /// Deletes an album. Its files are kept and end up without an album.
    pub async fn delete(&self, album_id: i64) -> Result<MessageResponse, FImageError> {
        require_id(album_id, "album id")?;
        Ok(self
            .api_client
            .delete::<MessageResponse>(&Self::album_uri(album_id))
            .await?
            .unwrap_or_default())
    }

    fn album_uri(album_id: i64) -> String {
        format!("{}/{}", Self::BASE_URI, album_id)
    }
}
