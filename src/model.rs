//! Data models for the link shortener
//!
//! This module defines the stored link record, its expiration policy,
//! and the request/response shapes of the `POST /create` endpoint.

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Field, LinkError};

/// How a link expires
///
/// Serialized with a `type` tag so a stored record reads
/// `{"type":"CLICKS","maxClicks":3,...}` or
/// `{"type":"DAYS","expirationDate":"2026-10-26T23:59:59.999Z",...}`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpirationPolicy {
    /// Link is consumed once it has been followed `max_clicks` times
    #[serde(rename_all = "camelCase")]
    Clicks { max_clicks: u64 },

    /// Link stops resolving at an absolute point in time
    #[serde(rename_all = "camelCase")]
    Days { expiration_date: DateTime<Utc> },
}

/// A link record stored in the database
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    /// Store-assigned identifier, immutable
    pub id: String,

    /// Shareable identifier, the last 6 characters of `id`
    ///
    /// `None` between the insert and the second write that assigns it.
    #[serde(default)]
    pub short_id: Option<String>,

    /// Destination URL
    pub redirect_to: String,

    #[serde(flatten)]
    pub policy: ExpirationPolicy,

    /// Number of successful visits so far
    #[serde(default)]
    pub clicks: u64,
}

/// A validated link, ready to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub redirect_to: String,
    pub policy: ExpirationPolicy,
}

/// Request payload for `POST /create`
///
/// Fields are kept as raw JSON so that missing, null or wrongly typed values
/// are all reported through [`CreateRequest::validate`] with a field-specific
/// message, in field order, instead of a generic deserialization error.
///
/// # Example
/// ```json
/// {
///   "redirectTo": "https://example.com",
///   "type": "CLICKS",
///   "maxClicks": 10,
///   "expirationDate": null
/// }
/// ```
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub redirect_to: Option<Value>,

    #[serde(rename = "type")]
    pub link_type: Option<Value>,

    pub max_clicks: Option<Value>,

    /// ISO-8601 timestamp, usually end-of-day N days from now
    pub expiration_date: Option<Value>,
}

fn as_text(value: &Option<Value>) -> Option<&str> {
    value.as_ref().and_then(Value::as_str)
}

/// A click limit of at least 1; fractional limits round up
fn click_limit(value: &Option<Value>) -> Option<u64> {
    let value = value.as_ref()?;
    if let Some(max) = value.as_u64() {
        return (max >= 1).then_some(max);
    }
    let max = value.as_f64()?;
    (max.is_finite() && max >= 1.0).then(|| max.ceil() as u64)
}

impl CreateRequest {
    /// Checks the request and turns it into a [`NewLink`]
    ///
    /// Stops at the first failing field, checked in the order
    /// `redirectTo`, `type`, `maxClicks`, `expirationDate`.
    pub fn validate(self) -> Result<NewLink, LinkError> {
        // The destination ends up in a `Location` header.
        let redirect_to = as_text(&self.redirect_to)
            .filter(|url| !url.trim().is_empty())
            .filter(|url| HeaderValue::from_str(url).is_ok())
            .ok_or(LinkError::InvalidField(Field::RedirectTo))?
            .to_string();

        let policy = match as_text(&self.link_type) {
            Some("CLICKS") => {
                let max_clicks = click_limit(&self.max_clicks)
                    .ok_or(LinkError::InvalidField(Field::MaxClicks))?;
                ExpirationPolicy::Clicks { max_clicks }
            }
            Some("DAYS") => {
                let expiration_date = as_text(&self.expiration_date)
                    .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
                    .ok_or(LinkError::InvalidField(Field::ExpirationDate))?;
                ExpirationPolicy::Days {
                    expiration_date: expiration_date.with_timezone(&Utc),
                }
            }
            _ => return Err(LinkError::InvalidField(Field::Type)),
        };

        Ok(NewLink {
            redirect_to,
            policy,
        })
    }
}

/// JSON envelope returned by `POST /create`
///
/// ```json
/// {"type":"success","statusCode":200,"message":"...","data":"http://localhost:8000/abc123"}
/// {"type":"error","statusCode":400,"message":"Invalid value for `redirectTo` field."}
/// ```
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ApiResponse {
    #[serde(rename_all = "camelCase")]
    Success {
        status_code: u16,
        message: String,
        data: String,
    },
    #[serde(rename_all = "camelCase")]
    Error { status_code: u16, message: String },
}

impl ApiResponse {
    pub fn success(message: impl Into<String>, data: impl Into<String>) -> Self {
        ApiResponse::Success {
            status_code: StatusCode::OK.as_u16(),
            message: message.into(),
            data: data.into(),
        }
    }

    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        ApiResponse::Error {
            status_code: status.as_u16(),
            message: message.into(),
        }
    }

    fn status(&self) -> StatusCode {
        let code = match self {
            ApiResponse::Success { status_code, .. } | ApiResponse::Error { status_code, .. } => {
                *status_code
            }
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}
