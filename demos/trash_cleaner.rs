/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

extern crate fimage;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use dotenvy::dotenv;
use fimage::{ClientBuilder, File};
use futures::{StreamExt, pin_mut};

// Files that have been in the trash longer than this are deleted for good
const KEEP_DAYS: i64 = 30;

fn trashed_before(file: &File, cutoff: DateTime<Utc>) -> bool {
    file.deleted_at
        .as_deref()
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .is_some_and(|deleted| deleted < cutoff)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let client = ClientBuilder::from_env()?.build()?;
    let cutoff = Utc::now() - Duration::days(KEEP_DAYS);

    // Collect first; deleting while paging would shift the pages
    let mut expired = Vec::new();
    let trash = client.trash().list_stream(None);
    pin_mut!(trash);
    while let Some(file) = trash.next().await {
        let file = file?;
        if trashed_before(&file, cutoff) {
            expired.push(file);
        }
    }

    for file in expired {
        let result = client.trash().permanent_delete(file.id).await?;
        if result.failed_count > 0 {
            for failed in result.failed_deletions {
                println!(
                    "Kept {}: {} ({} active share links)",
                    failed.file_name,
                    failed.reason,
                    failed.share_links.len()
                );
            }
        } else {
            println!("Deleted {} (trashed {:?})", file.original_name, file.deleted_at);
        }
    }

    Ok(())
}
