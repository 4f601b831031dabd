//! Pocket Ledger is a web app for tracking personal income and expenses.
//!
//! Users sign up and log in with an email and password, record transactions,
//! and see their totals, where their money comes from and goes, and how the
//! last few months compare. The library serves HTML pages directly.
//!
//! Identity and persistence sit behind two traits, [AuthProvider] and
//! [DocumentStore], with SQLite-backed implementations. The dashboard numbers
//! come from the pure functions [compute_totals],
//! [compute_category_breakdown] and [compute_monthly_series].

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod landing;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod store;
mod theme;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{
    AuthError, AuthProvider, PasswordHash, SQLiteAuthProvider, User, UserID, ValidatedPassword,
    get_user_by_email, update_password,
};
pub use dashboard::{
    CategoryShare, MONTHLY_WINDOW, MonthlySummary, Totals, compute_category_breakdown,
    compute_monthly_series, compute_totals,
};
pub use database_id::TransactionId;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use store::{DocumentStore, Profile, SQLiteDocumentStore};
pub use theme::Theme;
pub use transaction::{NewTransaction, Transaction, TransactionType, insert_transaction};

use crate::{
    alert::Alert, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// Wait for ctrl+c or SIGTERM, then give in-flight requests one second to
/// finish before `handle`'s server stops.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// Everything that can go wrong outside of the authentication provider.
///
/// [AuthError] is separate because sign-in and sign-up failures become form
/// messages, while these become error pages or htmx alerts.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request has no session cookie.
    #[error("no auth cookie in the cookie jar")]
    CookieMissing,

    /// The session cookie did not hold a readable token.
    #[error("invalid auth token: {0}")]
    InvalidToken(String),

    /// The session token is past its expiry time.
    #[error("the auth token has expired")]
    TokenExpired,

    /// zxcvbn scored the password below three. Holds its suggestions.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// bcrypt failed. Only for the server logs.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// A user with the same email already exists.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// A lookup by ID or email matched nothing.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Any SQLite error without a more specific variant.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// The configured timezone is not a canonical timezone name.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The session token could not be written as JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// The database mutex is poisoned.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// No transaction with the given ID belongs to the user.
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Render the error as an alert fragment for htmx requests.
    fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidTimezoneError(timezone) => Alert::error(
                "Invalid Timezone Settings",
                &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            )
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR),
            Error::DeleteMissingTransaction => Alert::error(
                "Failed to delete transaction",
                "The transaction could not be found. \
                Try refreshing the page to see if the transaction has already been deleted.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::DatabaseLockError => Alert::error(
                "Something went wrong",
                "The database is busy or unavailable, try again later.",
            )
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                Alert::error(
                    "Something went wrong",
                    "An unexpected error occurred, check the server logs for more details.",
                )
                .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}
