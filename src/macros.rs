/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

// Walks a page/limit endpoint and yields every item of the `$r` list.
// Stops once `total` items were yielded (when the server reports it) or a
// page comes back empty.
macro_rules! stream_pages {
    ( $api:expr, $path:expr, $params:expr, $page_size:expr, $rt:ty, $r:ident) => {{
        let path: String = $path;
        let base_params: Vec<(&'static str, String)> = $params;
        let page_size: u32 = $page_size;

        try_stream! {
            let mut page: u32 = 1;
            let mut yielded: u64 = 0;
            loop {
                let mut params = base_params.clone();
                params.push(("page", page.to_string()));
                params.push(("limit", page_size.to_string()));

                let resp = $api
                    .get_with_query::<$rt>(&path, &params)
                    .await?
                    .ok_or(FImageError::ResponseMissing())?;

                let total = resp.total;
                let is_done = resp.$r.is_empty();
                for item in resp.$r {
                    yielded += 1;
                    yield item
                }

                if is_done || total.is_some_and(|t| yielded >= t) {
                    break;
                }
                page += 1;
            }
        }
    }};
}

pub(crate) use stream_pages;
