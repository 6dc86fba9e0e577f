/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

extern crate fimage;

use anyhow::{Result, anyhow};
use dotenvy::dotenv;
use fimage::{AlbumProps, Client, ClientBuilder, CreateShareOptions, TagProps, UploadOptions};

const ALBUM_NAME: &str = "Uploads";

// Finds the album used for uploads, creating it on first use.
async fn find_or_create_album(client: &Client) -> Result<i64> {
    let albums = client.albums().list().await?;
    if let Some(album) = albums.into_iter().find(|a| a.name == ALBUM_NAME) {
        return Ok(album.id);
    }
    let album = client
        .albums()
        .create(AlbumProps::new(ALBUM_NAME).with_description("Created by the upload demo"))
        .await?;
    println!("Created album: {} ({})", album.name, album.id);
    Ok(album.id)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("usage: upload_photo <image path> [tag]"))?;
    let tag_name = std::env::args().nth(2);

    // FIMAGE_API_TOKEN is required, FIMAGE_BASE_URL and FIMAGE_TIMEOUT_SECS are optional
    let client = ClientBuilder::from_env()?.build()?;

    let album_id = find_or_create_album(&client).await?;
    let uploaded = client
        .files()
        .upload_file(&path, UploadOptions::default().with_album(album_id))
        .await?;
    let file = uploaded
        .data
        .ok_or_else(|| anyhow!("upload succeeded without file data"))?;
    println!(
        "Uploaded {} ({}x{}, {} bytes){}",
        file.original_name,
        file.width,
        file.height,
        file.size,
        if file.is_flash { " [deduplicated]" } else { "" }
    );
    println!("URL: {}", file.url);

    if let Some(tag_name) = tag_name {
        let tags = client.tags().list().await?;
        let tag = match tags.into_iter().find(|t| t.name == tag_name) {
            Some(tag) => tag,
            None => client.tags().create(TagProps::new(tag_name)).await?,
        };
        client.tags().tag_file(file.id, tag.id).await?;
        println!("Tagged with: {}", tag.name);
    }

    // Hand out a link that stops working after a day or 10 views
    let share = client
        .share()
        .create(
            CreateShareOptions::file(file.id)
                .with_expiration(24)
                .with_max_views(10),
        )
        .await?;
    println!("Share URL: {}", share.share_url);

    Ok(())
}
