/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use serde::Serialize;
use strum_macros::{EnumString, IntoStaticStr};

/// What a share link points at
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, EnumString, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SharedContentType {
    #[default]
    Unknown,
    File,
    Album,
}

/// Page selection shared by the paginated list endpoints. Zero means "server default".
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    /// Page number, starting at 1
    pub page: u32,

    /// Items per page (the API caps this at 100)
    pub limit: u32,
}

impl PageOptions {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    pub(crate) fn append_to(&self, params: &mut Vec<(&'static str, String)>) {
        if self.page > 0 {
            params.push(("page", self.page.to_string()));
        }
        if self.limit > 0 {
            params.push(("limit", self.limit.to_string()));
        }
    }

    pub(crate) fn to_params(self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        self.append_to(&mut params);
        params
    }
}
