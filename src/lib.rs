/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! # F-Image
//!
//! This library was created for working with the [F-Image](https://f-image.com) image hosting API.
//!
//! ## Features
//!
//! - Files
//!     - Upload from a stream, bytes, a local path or a public URL
//!     - List, search, move between albums, soft delete
//! - Albums: create, rename, list, delete
//! - Share links for files and albums, with password, expiry and view limits
//! - Tags: create, assign to files, list files by tag
//! - Trash: list, restore, permanently delete, empty
//! - Lower level interface for handling the raw communication ([`ApiClient`])
//!
//! *Every request is authenticated with the API token given to the [`Client`]. Tokens are
//! created in the F-Image dashboard at <https://f-image.com/dashboard/settings/api>.*
//!
//! ## Errors
//!
//! All operations return [`FImageError`]. Non-2xx responses become [`FImageError::Api`] and
//! can be checked with [`FImageError::is_not_found`], [`FImageError::is_unauthorized`] and
//! friends. Nothing is retried.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fimage::{Client, PageOptions, UploadOptions};
//!
//! async fn upload_and_share(api_token: &str) -> anyhow::Result<()> {
//!     let client = Client::new(api_token)?;
//!
//!     // Upload a local image
//!     let uploaded = client
//!         .files()
//!         .upload_file("photo.jpg", UploadOptions::default().with_description("My photo"))
//!         .await?;
//!     let file = uploaded.data.ok_or_else(|| anyhow::anyhow!("upload returned no data"))?;
//!     println!("Uploaded: {}", file.url);
//!
//!     // Share it for a day
//!     let share = client
//!         .share()
//!         .create(fimage::CreateShareOptions::file(file.id).with_expiration(24))
//!         .await?;
//!     println!("Share URL: {}", share.share_url);
//!
//!     // Look at what is in the trash
//!     let trash = client.trash().list(PageOptions::new(1, 20)).await?;
//!     println!("{} files in the trash", trash.total.unwrap_or_default());
//!     Ok(())
//! }
//! ```
//!
//! Dropping an operation's future aborts its request. A request that runs past the
//! configured timeout fails with [`FImageError::Timeout`].
//!
mod macros;
mod parsers;

pub mod album;
pub mod api;
pub mod client;
pub mod errors;
pub mod file;
pub mod properties;
pub mod share;
pub mod tag;
pub mod trash;

pub use album::*;
pub use api::*;
pub use client::*;
pub use errors::*;
pub use file::*;
pub use properties::*;
pub use share::*;
pub use tag::*;
pub use trash::*;
