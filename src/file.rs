/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::api::{ApiClient, BatchDeleteResponse, MessageResponse, with_query};
use crate::errors::{FImageError, require_id, require_ids};
use crate::macros::stream_pages;
use crate::parsers::{from_empty_str_to_none, from_null_to_default};
use async_stream::try_stream;
use bytes::Bytes;
use futures::{Stream, TryStream};
use log::debug;
use reqwest::Body;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio_util::io::ReaderStream;

/// Filename sent when the caller does not provide one
pub const DEFAULT_UPLOAD_FILENAME: &str = "image.jpg";

/// Page size used by [`FilesService::list_stream`] when no limit is given
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// A file in the user's library (or in the trash).
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct File {
    pub id: i64,

    pub album_id: Option<i64>,

    pub album_name: Option<String>,

    pub original_name: String,

    pub description: String,

    /// Direct URL to the original image
    pub url: String,

    #[serde(deserialize_with = "from_empty_str_to_none")]
    pub medium_url: Option<String>,

    #[serde(deserialize_with = "from_empty_str_to_none")]
    pub thumbnail_url: Option<String>,

    /// Size in bytes
    pub size: i64,

    pub width: u32,

    pub height: u32,

    pub mime_type: String,

    pub created_at: String,

    /// Set only for files in the trash
    pub deleted_at: Option<String>,
}

/// Envelope returned by the upload endpoints
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct UploadResponse {
    pub success: bool,

    pub status: u16,

    pub data: Option<UploadData>,
}

/// Details of an uploaded file
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct UploadData {
    pub id: i64,

    pub url: String,

    #[serde(deserialize_with = "from_empty_str_to_none")]
    pub medium_url: Option<String>,

    #[serde(deserialize_with = "from_empty_str_to_none")]
    pub thumbnail_url: Option<String>,

    pub original_name: String,

    pub description: String,

    pub size: i64,

    pub width: u32,

    pub height: u32,

    pub mime_type: String,

    /// The content already existed on the server and was deduplicated
    pub is_flash: bool,
}

/// A page of files from list, search and tag queries
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FilesListResponse {
    #[serde(deserialize_with = "from_null_to_default")]
    pub files: Vec<File>,

    /// Matching items across all pages; `None` when the server leaves it out
    pub total: Option<u64>,

    pub page: u32,

    pub limit: u32,

    pub album_id: Option<i64>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub query: String,
}

/// Options for [`FilesService::upload`]
#[derive(Debug, Default, Clone)]
pub struct UploadOptions {
    /// Name of the uploaded file, [`DEFAULT_UPLOAD_FILENAME`] when unset
    pub filename: Option<String>,

    pub description: Option<String>,

    /// Album to place the file in
    pub album_id: Option<i64>,
}

impl UploadOptions {
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_album(mut self, album_id: i64) -> Self {
        self.album_id = Some(album_id);
        self
    }

    // Extra form fields; empty values are left out
    fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = Vec::new();
        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            fields.push(("description".to_string(), description.to_string()));
        }
        if let Some(album_id) = self.album_id {
            fields.push(("album_id".to_string(), album_id.to_string()));
        }
        fields
    }
}

/// Options for [`FilesService::list`]
#[derive(Debug, Default, Clone, Copy)]
pub struct ListOptions {
    pub page: u32,

    /// Items per page (max 100)
    pub limit: u32,

    /// Only files of this album; `Some(0)` selects files without an album
    pub album_id: Option<i64>,
}

impl ListOptions {
    fn filter_params(&self) -> Vec<(&'static str, String)> {
        self.album_id
            .map(|id| vec![("album_id", id.to_string())])
            .unwrap_or_default()
    }
}

/// Options for [`FilesService::search`]
#[derive(Debug, Default, Clone)]
pub struct SearchOptions {
    /// Text matched against file names and descriptions (required)
    pub query: String,

    pub page: u32,

    pub limit: u32,
}

impl SearchOptions {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }
}

#[derive(Serialize, Debug)]
struct UploadFromUrlRequest<'a> {
    url: &'a str,
}

#[derive(Serialize, Debug)]
pub(crate) struct FileIdsRequest<'a> {
    pub(crate) file_ids: &'a [i64],
}

#[derive(Serialize, Debug)]
struct MoveFilesRequest<'a> {
    file_ids: &'a [i64],

    #[serde(skip_serializing_if = "Option::is_none")]
    album_id: Option<i64>,
}

/// Upload, list, search and organize files.
#[derive(Debug, Clone)]
pub struct FilesService {
    api_client: Arc<ApiClient>,
}

impl FilesService {
    const BASE_URI: &'static str = "/api/files";

    pub(crate) fn new(api_client: Arc<ApiClient>) -> Self {
        Self { api_client }
    }

    /// Uploads an image read from a stream of byte chunks.
    ///
    /// The stream is consumed once, in order, straight into the request body.
    pub async fn upload<S>(&self, stream: S, opts: UploadOptions) -> Result<UploadResponse, FImageError>
    where
        S: TryStream + Send + 'static,
        S::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
        Bytes: From<S::Ok>,
    {
        self.upload_body(Body::wrap_stream(stream), opts).await
    }

    /// Uploads an image held in memory
    pub async fn upload_bytes(
        &self,
        data: impl Into<Bytes>,
        opts: UploadOptions,
    ) -> Result<UploadResponse, FImageError> {
        self.upload_body(Body::from(data.into()), opts).await
    }

    /// Uploads the image at `path`, naming it after the file unless a filename is set
    pub async fn upload_file(
        &self,
        path: impl AsRef<Path>,
        mut opts: UploadOptions,
    ) -> Result<UploadResponse, FImageError> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path).await?;
        if opts.filename.is_none() {
            opts.filename = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string);
        }
        self.upload(ReaderStream::new(file), opts).await
    }

    async fn upload_body(&self, body: Body, opts: UploadOptions) -> Result<UploadResponse, FImageError> {
        let filename = opts
            .filename
            .as_deref()
            .filter(|f| !f.is_empty())
            .unwrap_or(DEFAULT_UPLOAD_FILENAME);
        debug!("uploading {filename}");

        let data = self
            .api_client
            .upload_multipart("/api/files/upload", body, filename, &opts.form_fields())
            .await?;
        if data.is_empty() {
            return Err(FImageError::ResponseMissing());
        }
        serde_json::from_slice(&data).map_err(FImageError::ApiResponseMalformed)
    }

    /// Has the server fetch and store the image at a public URL
    pub async fn upload_from_url(&self, image_url: &str) -> Result<UploadResponse, FImageError> {
        if image_url.trim().is_empty() {
            return Err(FImageError::invalid_argument("image URL is required"));
        }
        url::Url::parse(image_url)?;

        let req = UploadFromUrlRequest { url: image_url };
        self.api_client
            .post::<_, UploadResponse>("/api/files/upload_from_url", Some(&req))
            .await?
            .ok_or(FImageError::ResponseMissing())
    }

    /// Returns one page of files
    pub async fn list(&self, opts: ListOptions) -> Result<FilesListResponse, FImageError> {
        let mut params = Vec::new();
        crate::properties::PageOptions::new(opts.page, opts.limit).append_to(&mut params);
        params.extend(opts.filter_params());

        Ok(self
            .api_client
            .get_with_query::<FilesListResponse>(Self::BASE_URI, &params)
            .await?
            .unwrap_or_default())
    }

    /// Streams every file matching `opts.album_id`, fetching pages of `opts.limit`
    /// (or [`DEFAULT_PAGE_SIZE`]) as needed. `opts.page` is ignored.
    pub fn list_stream(&self, opts: ListOptions) -> impl Stream<Item = Result<File, FImageError>> + '_ {
        let page_size = if opts.limit > 0 { opts.limit } else { DEFAULT_PAGE_SIZE };
        stream_pages!(
            self.api_client,
            Self::BASE_URI.to_string(),
            opts.filter_params(),
            page_size,
            FilesListResponse,
            files
        )
    }

    /// Searches files by name or description
    pub async fn search(&self, opts: SearchOptions) -> Result<FilesListResponse, FImageError> {
        if opts.query.trim().is_empty() {
            return Err(FImageError::invalid_argument("search query is required"));
        }

        let mut params = vec![("q", opts.query.clone())];
        crate::properties::PageOptions::new(opts.page, opts.limit).append_to(&mut params);

        Ok(self
            .api_client
            .get_with_query::<FilesListResponse>("/api/files/search", &params)
            .await?
            .unwrap_or_default())
    }

    /// Moves a file to the trash (soft delete)
    pub async fn delete(&self, file_id: i64) -> Result<MessageResponse, FImageError> {
        require_id(file_id, "file id")?;
        let path = format!("{}/{}", Self::BASE_URI, file_id);
        Ok(self
            .api_client
            .delete::<MessageResponse>(&path)
            .await?
            .unwrap_or_default())
    }

    /// Moves several files to the trash. Per-file failures are counted in the response.
    pub async fn batch_delete(&self, file_ids: &[i64]) -> Result<BatchDeleteResponse, FImageError> {
        require_ids(file_ids)?;
        let req = FileIdsRequest { file_ids };
        Ok(self
            .api_client
            .post::<_, BatchDeleteResponse>("/api/files/batch-delete", Some(&req))
            .await?
            .unwrap_or_default())
    }

    /// Moves a file into an album; `None` takes it out of its current album
    pub async fn move_to_album(
        &self,
        file_id: i64,
        album_id: Option<i64>,
    ) -> Result<MessageResponse, FImageError> {
        require_id(file_id, "file id")?;
        let params: Vec<(&str, String)> = album_id
            .map(|id| vec![("album_id", id.to_string())])
            .unwrap_or_default();
        let path = with_query(&format!("{}/{}/move", Self::BASE_URI, file_id), &params);

        Ok(self
            .api_client
            .put::<(), MessageResponse>(&path, None)
            .await?
            .unwrap_or_default())
    }

    /// Moves several files into an album; `None` takes them out of their albums
    pub async fn move_many(
        &self,
        file_ids: &[i64],
        album_id: Option<i64>,
    ) -> Result<MessageResponse, FImageError> {
        require_ids(file_ids)?;
        let req = MoveFilesRequest { file_ids, album_id };
        Ok(self
            .api_client
            .put::<_, MessageResponse>("/api/files/move", Some(&req))
            .await?
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn upload_fields_skip_empty_values() {
        let opts = UploadOptions::default().with_description("");
        assert!(opts.form_fields().is_empty());

        let opts = UploadOptions::default()
            .with_description("sunset")
            .with_album(7);
        assert_eq!(
            opts.form_fields(),
            vec![
                ("description".to_string(), "sunset".to_string()),
                ("album_id".to_string(), "7".to_string()),
            ]
        );
    }

    #[test]
    fn move_request_omits_missing_album() {
        let ids = [1, 2];
        let body = serde_json::to_value(MoveFilesRequest { file_ids: &ids, album_id: None }).unwrap();
        assert_eq!(body, json!({"file_ids": [1, 2]}));
    }

    #[test]
    fn file_tolerates_empty_variant_urls() {
        let file: File = serde_json::from_value(json!({
            "id": 3,
            "original_name": "a.jpg",
            "url": "https://f-image.com/i/a.jpg",
            "medium_url": "",
            "thumbnail_url": null,
            "album_id": null
        }))
        .unwrap();
        assert_eq!(file.medium_url, None);
        assert_eq!(file.thumbnail_url, None);
        assert_eq!(file.album_id, None);
    }

    #[test]
    fn null_file_list_decodes_as_empty() {
        let resp: FilesListResponse =
            serde_json::from_value(json!({"files": null, "total": 0, "page": 1, "limit": 20})).unwrap();
        assert!(resp.files.is_empty());
        assert_eq!(resp.total, Some(0));

        let resp: FilesListResponse = serde_json::from_value(json!({"files": []})).unwrap();
        assert_eq!(resp.total, None);
    }
}
