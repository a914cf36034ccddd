//! Error types for the link store and the create/redirect flows

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::model::ApiResponse;

/// Request fields that can fail validation on `POST /create`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    RedirectTo,
    Type,
    MaxClicks,
    ExpirationDate,
}

impl Field {
    /// Wire name of the field, as it appears in the JSON body
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::RedirectTo => "redirectTo",
            Field::Type => "type",
            Field::MaxClicks => "maxClicks",
            Field::ExpirationDate => "expirationDate",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures raised by a [`crate::database::LinkStore`]
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] redb::Error),

    #[error("malformed link record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("link {0} does not exist")]
    MissingRecord(String),
}

// redb reports each stage (open, transaction, table, commit) with its own type.
macro_rules! impl_from_redb {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for StoreError {
                fn from(err: $ty) -> Self {
                    StoreError::Database(err.into())
                }
            }
        )*
    };
}

impl_from_redb!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

/// Errors surfaced to clients by the create and redirect flows
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("Invalid value for `{0}` field.")]
    InvalidField(Field),

    #[error("Invalid request body: {0}")]
    MalformedBody(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl LinkError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            LinkError::InvalidField(_) | LinkError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            LinkError::Store(_) | LinkError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for LinkError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        ApiResponse::error(status, self.to_string()).into_response()
    }
}
