//! # Error Handling for the list action
//!
//! Errors fall into three groups:
//! - **Client input** (`DisallowedSort`): raised before the data store is touched,
//!   returned to the caller as 400 with the offending columns.
//! - **Configuration** (`InvalidConfig`): raised while loading a `ResourceConfig`.
//! - **Store failure** (`Store`): the awaited query failed. Details are logged, the
//!   client only sees a generic message.
//!
//! Value coercion never produces an error; unparsable values fall back to the raw
//! string and simply match nothing.
//!
//! ## Logging
//!
//! Internal errors are logged with `tracing` when converted into a response. Set up a
//! subscriber in the host application to see them:
//!
//! ```rust,ignore
//! tracing_subscriber::fmt().with_target(false).compact().init();
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;

#[derive(Debug)]
pub enum ListError {
    /// 400 Bad Request - sort requested on columns outside the allow-list
    DisallowedSort {
        /// Columns that may not be sorted on
        columns: Vec<String>,
    },

    /// 500 Internal Server Error - resource configuration could not be loaded
    InvalidConfig {
        /// Parser or validation message
        message: String,
    },

    /// 500 Internal Server Error - the data store rejected the query (details logged, not exposed)
    Store(DbErr),
}

impl ListError {
    pub fn disallowed_sort(columns: Vec<String>) -> Self {
        Self::DisallowedSort { columns }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DisallowedSort { .. } => StatusCode::BAD_REQUEST,
            Self::InvalidConfig { .. } | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Sanitized message safe to return to clients.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::DisallowedSort { .. } => "Sorting not allowed on given attributes".to_string(),
            Self::InvalidConfig { .. } => "Resource is misconfigured".to_string(),
            Self::Store(_) => "A database error occurred".to_string(),
        }
    }

    /// Extra client-facing details, if any.
    #[must_use]
    pub fn details(&self) -> Option<&[String]> {
        match self {
            Self::DisallowedSort { columns } => Some(columns),
            _ => None,
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Store(internal) => {
                tracing::error!(error = ?internal, "Database error occurred");
            }
            Self::InvalidConfig { message } => {
                tracing::error!(details = %message, "Invalid resource configuration");
            }
            Self::DisallowedSort { columns } => {
                tracing::debug!(
                    columns = ?columns,
                    status = %self.status_code(),
                    "Rejected sort request"
                );
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<String>>,
}

impl IntoResponse for ListError {
    fn into_response(self) -> Response {
        self.log_internal();

        let body = ErrorResponse {
            error: self.user_message(),
            details: self.details().map(<[String]>::to_vec),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DisallowedSort { columns } => {
                write!(f, "{}: {}", self.user_message(), columns.join(", "))
            }
            Self::InvalidConfig { message } => write!(f, "invalid resource configuration: {message}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ListError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbErr> for ListError {
    fn from(err: DbErr) -> Self {
        Self::Store(err)
    }
}
