//! SmartSpend is a web app for tracking your spending across accounts and
//! keeping monthly budgets honest.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod account;
mod alert;
mod app_state;
mod budget;
mod dashboard;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod pagination;
mod routing;
mod shared_templates;
mod smart_budget;
mod timezone;
mod transaction;

pub use account::{Account, AccountId, AccountKind, create_account};
pub use app_state::AppState;
pub use budget::{Budget, upsert_budget};
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use routing::build_router;
pub use smart_budget::RecommendationClient;
pub use transaction::{
    RecurringInterval, Transaction, TransactionKind, create_transaction,
};

use crate::{
    alert::AlertTemplate,
    internal_server_error::{InternalServerErrorPageTemplate, render_internal_server_error},
    not_found::get_404_not_found_response,
    shared_templates::render,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
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

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// A transaction was given a negative or non-finite amount.
    ///
    /// Amounts record magnitudes only. Whether money came in or went out is
    /// carried by the transaction kind, never by the sign of the amount.
    #[error("{0} is not a valid transaction amount")]
    InvalidAmount(f64),

    /// A recurring transaction was missing its interval or next occurrence,
    /// or a stored interval did not match a known value.
    ///
    /// Records like this are rejected when they enter the system rather than
    /// patched up with a guessed default.
    #[error("invalid recurrence: {0}")]
    InvalidRecurrence(String),

    /// The user submitted a budget amount that is not a positive number.
    #[error("invalid budget amount: {0}")]
    InvalidBudgetAmount(String),

    /// A bulk delete was requested with no transactions selected.
    #[error("no transactions were selected")]
    EmptySelection,

    /// Tried to update an account that does not exist
    #[error("tried to update an account that is not in the database")]
    UpdateMissingAccount,

    /// The budget recommendation service could not produce a usable answer.
    ///
    /// The string is already phrased for display to the user; the underlying
    /// cause (network error, bad status, malformed body) is logged where the
    /// failure was observed.
    #[error("{0}")]
    RecommendationFailed(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
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
            Error::InvalidTimezoneError(timezone) => {
                render_internal_server_error(InternalServerErrorPageTemplate {
                    description: "Invalid Timezone Settings",
                    fix: &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                })
            }
            Error::DatabaseLockError => render_internal_server_error(Default::default()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(Default::default())
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidTimezoneError(timezone) => render(
                StatusCode::INTERNAL_SERVER_ERROR,
                AlertTemplate::error(
                    "Invalid Timezone Settings",
                    &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                )
                .into_html(),
            ),
            Error::InvalidBudgetAmount(details) => render(
                StatusCode::BAD_REQUEST,
                AlertTemplate::error("Invalid budget amount", &details).into_html(),
            ),
            Error::EmptySelection => render(
                StatusCode::BAD_REQUEST,
                AlertTemplate::error(
                    "Nothing to delete",
                    "Select at least one transaction first.",
                )
                .into_html(),
            ),
            Error::UpdateMissingAccount => render(
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not update account",
                    "The account could not be found.",
                )
                .into_html(),
            ),
            Error::RecommendationFailed(details) => render(
                StatusCode::BAD_GATEWAY,
                AlertTemplate::error("Smart budget unavailable", &details).into_html(),
            ),
            _ => render(
                StatusCode::INTERNAL_SERVER_ERROR,
                AlertTemplate::error(
                    "Something went wrong",
                    "An unexpected error occurred, check the server logs for more details.",
                )
                .into_html(),
            ),
        }
    }
}
