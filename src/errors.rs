/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use num_enum::TryFromPrimitive;
use serde::Deserialize;
use std::io;
use thiserror::Error;

/// Error conditions that can be returned
///
/// Failures fall in three groups:
/// - local construction errors, raised before anything is sent
///   ([`FImageError::InvalidArgument`], [`FImageError::JsonSerialization`],
///   [`FImageError::UrlParsing`], [`FImageError::Config`], [`FImageError::Io`])
/// - local transport errors ([`FImageError::Request`], [`FImageError::Timeout`],
///   [`FImageError::ApiResponseMalformed`], [`FImageError::ResponseMissing`])
/// - classified API errors ([`FImageError::Api`]) for any non-2xx response
///
/// Use the `is_*` predicates first and fall back to [`FImageError::status`] or the
/// [`ApiError`] message for anything else.
#[derive(Error, Debug)]
pub enum FImageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Request network error: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("URL Parse error: {0}")]
    UrlParsing(#[from] url::ParseError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Expected response missing")]
    ResponseMissing(),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("API Response is malformed: {0}")]
    ApiResponseMalformed(#[source] serde_json::Error),

    #[error("Failed serializing to JSON: {0}")]
    JsonSerialization(#[source] serde_json::Error),
}

impl From<reqwest::Error> for FImageError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FImageError::Timeout(err)
        } else {
            FImageError::Request(err)
        }
    }
}

impl FImageError {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        FImageError::InvalidArgument(msg.into())
    }

    /// The classified API error, if this is one
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            FImageError::Api(err) => Some(err),
            _ => None,
        }
    }

    /// True if the server answered with a non-2xx status
    pub fn is_api_error(&self) -> bool {
        self.api_error().is_some()
    }

    /// HTTP status of a classified API error
    pub fn status(&self) -> Option<u16> {
        self.api_error().map(|e| e.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_unauthorized)
    }

    pub fn is_forbidden(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_forbidden)
    }

    pub fn is_not_found(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_not_found)
    }

    pub fn is_bad_request(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_bad_request)
    }

    pub fn is_quota_exceeded(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_quota_exceeded)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FImageError::Timeout(_))
    }
}

// Identifiers are assigned by the server and always positive
pub(crate) fn require_id(id: i64, what: &str) -> Result<(), FImageError> {
    if id <= 0 {
        return Err(FImageError::invalid_argument(format!("{what} is required")));
    }
    Ok(())
}

pub(crate) fn require_ids(ids: &[i64]) -> Result<(), FImageError> {
    if ids.is_empty() {
        return Err(FImageError::invalid_argument("at least one file id is required"));
    }
    ids.iter().try_for_each(|id| require_id(*id, "file id"))
}

/// Failure reported by the F-Image API for a non-2xx response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("f-image API error (status {status}): {message}")]
pub struct ApiError {
    /// HTTP status code exactly as received
    pub status: u16,

    /// Message from the error body, or the standard reason phrase
    pub message: String,
}

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    /// Storage quota reached (402) or upload too large (413)
    QuotaExceeded,
    Other,
}

impl ApiError {
    pub fn kind(&self) -> ApiErrorKind {
        use ClassifiedStatus as S;
        match ClassifiedStatus::try_from(self.status) {
            Ok(S::BadRequest) => ApiErrorKind::BadRequest,
            Ok(S::Unauthorized) => ApiErrorKind::Unauthorized,
            Ok(S::Forbidden) => ApiErrorKind::Forbidden,
            Ok(S::NotFound) => ApiErrorKind::NotFound,
            Ok(S::PaymentRequired | S::PayloadTooLarge) => ApiErrorKind::QuotaExceeded,
            Err(_) => ApiErrorKind::Other,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind() == ApiErrorKind::Unauthorized
    }

    pub fn is_forbidden(&self) -> bool {
        self.kind() == ApiErrorKind::Forbidden
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ApiErrorKind::NotFound
    }

    pub fn is_bad_request(&self) -> bool {
        self.kind() == ApiErrorKind::BadRequest
    }

    pub fn is_quota_exceeded(&self) -> bool {
        self.kind() == ApiErrorKind::QuotaExceeded
    }
}

/// Status codes that get a dedicated [`ApiErrorKind`]
#[derive(Debug, TryFromPrimitive)]
#[repr(u16)]
enum ClassifiedStatus {
    BadRequest = 400,
    Unauthorized = 401,
    PaymentRequired = 402,
    Forbidden = 403,
    NotFound = 404,
    PayloadTooLarge = 413,
}

// Error body shape returned by the API
#[derive(Deserialize, Debug, Default)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,

    #[serde(default)]
    message: Option<String>,
}

/// Turns a non-2xx status and its raw body into an [`ApiError`].
///
/// The message is the body's `error` field, then its `message` field, then the
/// standard reason phrase for the status. A body that is not a JSON object is
/// used verbatim, so an empty body gives an empty message.
pub fn classify_api_error(status: u16, body: &[u8]) -> ApiError {
    let reason = || {
        reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or_default()
            .to_string()
    };

    let message = match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) => parsed
            .error
            .filter(|s| !s.is_empty())
            .or(parsed.message.filter(|s| !s.is_empty()))
            .unwrap_or_else(reason),
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    };

    ApiError { status, message }
}
