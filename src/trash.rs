/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::api::ApiClient;
use crate::errors::{FImageError, require_id, require_ids};
use crate::file::{DEFAULT_PAGE_SIZE, FileIdsRequest};
use crate::macros::stream_pages;
use crate::parsers::from_null_to_default;
use crate::properties::PageOptions;
use crate::{File, ShareLink};
use async_stream::try_stream;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A page of soft-deleted files
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TrashListResponse {
    #[serde(deserialize_with = "from_null_to_default")]
    pub files: Vec<File>,

    /// Matching items across all pages; `None` when the server leaves it out
    pub total: Option<u64>,

    pub page: u32,

    pub limit: u32,
}

/// Outcome of a permanent delete. Failures are reported per file, not as errors.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DeleteResult {
    pub success: bool,

    pub message: String,

    pub deleted_count: u64,

    pub failed_count: u64,

    #[serde(deserialize_with = "from_null_to_default")]
    pub failed_deletions: Vec<FailedDeletion>,
}

/// A file that could not be deleted
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FailedDeletion {
    pub file_id: i64,

    pub file_name: String,

    pub reason: String,

    /// Active share links that block the deletion
    #[serde(deserialize_with = "from_null_to_default")]
    pub share_links: Vec<ShareLink>,
}

/// Outcome of a restore
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RestoreResponse {
    pub message: String,

    /// Restored files (batch restore only)
    pub restored: u64,

    pub failed: u64,
}

/// Restore or permanently remove soft-deleted files.
#[derive(Debug, Clone)]
pub struct TrashService {
    api_client: Arc<ApiClient>,
}

impl TrashService {
    const BASE_URI: &'static str = "/api/trash";

    pub(crate) fn new(api_client: Arc<ApiClient>) -> Self {
        Self { api_client }
    }

    /// Returns one page of the trash
    pub async fn list(&self, page: PageOptions) -> Result<TrashListResponse, FImageError> {
        Ok(self
            .api_client
            .get_with_query::<TrashListResponse>(Self::BASE_URI, &page.to_params())
            .await?
            .unwrap_or_default())
    }

    /// Streams every file in the trash
    pub fn list_stream(
        &self,
        page_size: Option<u32>,
    ) -> impl Stream<Item = Result<File, FImageError>> + '_ {
        stream_pages!(
            self.api_client,
            Self::BASE_URI.to_string(),
            Vec::new(),
            page_size.filter(|s| *s > 0).unwrap_or(DEFAULT_PAGE_SIZE),
            TrashListResponse,
            files
        )
    }

    pub async fn restore(&self, file_id: i64) -> Result<RestoreResponse, FImageError> {
        require_id(file_id, "file id")?;
        let path = format!("{}/{}/restore", Self::BASE_URI, file_id);
        Ok(self
            .api_client
            .post::<(), RestoreResponse>(&path, None)
            .await?
            .unwrap_or_default())
    }

    pub async fn restore_many(&self, file_ids: &[i64]) -> Result<RestoreResponse, FImageError> {
        require_ids(file_ids)?;
        let req = FileIdsRequest { file_ids };
        Ok(self
            .api_client
            .post::<_, RestoreResponse>("/api/trash/restore", Some(&req))
            .await?
            .unwrap_or_default())
    }

    /// Deletes a trashed file for good. This cannot be undone.
    pub async fn permanent_delete(&self, file_id: i64) -> Result<DeleteResult, FImageError> {
        require_id(file_id, "file id")?;
        let path = format!("{}/{}", Self::BASE_URI, file_id);
        Ok(self
            .api_client
            .delete::<DeleteResult>(&path)
            .await?
            .unwrap_or_default())
    }

    /// Deletes everything in the trash for good.
    ///
    /// Files with active share links are skipped and counted in `failed_count`.
    pub async fn empty(&self) -> Result<DeleteResult, FImageError> {
        Ok(self
            .api_client
            .delete::<DeleteResult>("/api/trash/empty")
            .await?
            .unwrap_or_default())
    }
}
