/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::api::{ApiClient, MessageResponse};
use crate::errors::{FImageError, require_id};
use crate::file::DEFAULT_PAGE_SIZE;
use crate::macros::stream_pages;
use crate::parsers::is_none_or_empty_str;
use crate::properties::PageOptions;
use crate::{File, FilesListResponse};
use async_stream::try_stream;
use futures::{Stream, StreamExt, future, stream};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Holds information returned from the Tags API.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Tag {
    pub id: i64,

    pub name: String,

    /// Hex color such as `#4CAF50`
    pub color: String,

    pub file_count: i64,
}

/// Properties used to create or update a Tag.
///
/// `name` is required on create; on update any unset field is left unchanged.
#[derive(Serialize, Default, Debug, Clone)]
pub struct TagProps {
    #[serde(skip_serializing_if = "is_none_or_empty_str")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "is_none_or_empty_str")]
    pub color: Option<String>,
}

impl TagProps {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            color: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

#[derive(Serialize, Debug)]
struct FileTagRequest {
    file_id: i64,
    tag_id: i64,
}

impl FileTagRequest {
    fn new(file_id: i64, tag_id: i64) -> Result<Self, FImageError> {
        require_id(file_id, "file id")?;
        require_id(tag_id, "tag id")?;
        Ok(Self { file_id, tag_id })
    }
}

/// Tag files and look them up by tag.
#[derive(Debug, Clone)]
pub struct TagsService {
    api_client: Arc<ApiClient>,
}

impl TagsService {
    const BASE_URI: &'static str = "/api/tags";

    pub(crate) fn new(api_client: Arc<ApiClient>) -> Self {
        Self { api_client }
    }

    /// Returns all tags of the authenticated user
    pub async fn list(&self) -> Result<Vec<Tag>, FImageError> {
        Ok(self
            .api_client
            .get::<Option<Vec<Tag>>>(Self::BASE_URI)
            .await?
            .flatten()
            .unwrap_or_default())
    }

    pub async fn create(&self, props: TagProps) -> Result<Tag, FImageError> {
        if is_none_or_empty_str(&props.name) {
            return Err(FImageError::invalid_argument("tag name is required"));
        }
        self.api_client
            .post::<_, Tag>(Self::BASE_URI, Some(&props))
            .await?
            .ok_or(FImageError::ResponseMissing())
    }

    pub async fn update(&self, tag_id: i64, props: TagProps) -> Result<Tag, FImageError> {
        require_id(tag_id, "tag id")?;
        if is_none_or_empty_str(&props.name) && is_none_or_empty_str(&props.color) {
            return Err(FImageError::invalid_argument("update options are required"));
        }
        self.api_client
            .put::<_, Tag>(&Self::tag_uri(tag_id), Some(&props))
            .await?
            .ok_or(FImageError::ResponseMissing())
    }

    /// Deletes a tag and removes it from every file
    pub async fn delete(&self, tag_id: i64) -> Result<MessageResponse, FImageError> {
        require_id(tag_id, "tag id")?;
        Ok(self
            .api_client
            .delete::<MessageResponse>(&Self::tag_uri(tag_id))
            .await?
            .unwrap_or_default())
    }

    /// Adds a tag to a file
    pub async fn tag_file(&self, file_id: i64, tag_id: i64) -> Result<MessageResponse, FImageError> {
        let req = FileTagRequest::new(file_id, tag_id)?;
        Ok(self
            .api_client
            .post::<_, MessageResponse>("/api/tags/file", Some(&req))
            .await?
            .unwrap_or_default())
    }

    /// Removes a tag from a file
    pub async fn untag_file(&self, file_id: i64, tag_id: i64) -> Result<MessageResponse, FImageError> {
        let req = FileTagRequest::new(file_id, tag_id)?;
        Ok(self
            .api_client
            .delete_with_body::<_, MessageResponse>("/api/tags/file", &req)
            .await?
            .unwrap_or_default())
    }

    /// Returns one page of the files carrying a tag
    pub async fn get_files(
        &self,
        tag_id: i64,
        page: PageOptions,
    ) -> Result<FilesListResponse, FImageError> {
        require_id(tag_id, "tag id")?;
        Ok(self
            .api_client
            .get_with_query::<FilesListResponse>(&Self::files_uri(tag_id), &page.to_params())
            .await?
            .unwrap_or_default())
    }

    /// Streams every file carrying a tag.
    ///
    /// An invalid tag id yields a single error without touching the network.
    pub fn files_stream(
        &self,
        tag_id: i64,
        page_size: Option<u32>,
    ) -> impl Stream<Item = Result<File, FImageError>> + '_ {
        if let Err(err) = require_id(tag_id, "tag id") {
            return stream::once(future::ready(Err(err))).left_stream();
        }
        stream_pages!(
            self.api_client,
            Self::files_uri(tag_id),
            Vec::new(),
            page_size.filter(|s| *s > 0).unwrap_or(DEFAULT_PAGE_SIZE),
            FilesListResponse,
            files
        )
        .right_stream()
    }

    fn tag_uri(tag_id: i64) -> String {
        format!("{}/{}", Self::BASE_URI, tag_id)
    }

    fn files_uri(tag_id: i64) -> String {
        format!("{}/{}/files", Self::BASE_URI, tag_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_props_only_carry_set_fields() {
        let body = serde_json::to_value(TagProps::default().with_color("#2196F3")).unwrap();
        assert_eq!(body, json!({"color": "#2196F3"}));
    }

    #[test]
    fn file_tag_requires_both_ids() {
        assert!(FileTagRequest::new(0, 3).is_err());
        assert!(FileTagRequest::new(3, 0).is_err());
        assert!(FileTagRequest::new(3, 4).is_ok());
    }
}
