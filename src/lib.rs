//! Centsible is a web app for tracking your accounts, transactions and
//! budgets.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use time::Date;
use tokio::signal;

mod account;
mod alert;
mod app_state;
mod budget;
mod category;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod pagination;
mod routing;
mod timezone;
mod transaction;

pub use account::{AccountForm, AccountKind, create_account};
pub use app_state::AppState;
pub use budget::set_budget;
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use transaction::{
    RecurringInterval, Transaction, TransactionKind, create_transaction, next_occurrence,
};

use crate::{
    alert::Alert,
    database_id::AccountId,
    internal_server_error::{InternalServerErrorPageTemplate, render_internal_server_error},
    not_found::get_404_not_found_response,
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
    /// A date in the future was used to create or update a transaction.
    ///
    /// Transactions record events that have already happened, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// A zero or negative amount was used to create or update a transaction.
    ///
    /// Amounts are stored as positive magnitudes; the transaction kind
    /// records the direction the money moved.
    #[error("transaction amounts must be greater than zero")]
    NonPositiveAmount,

    /// The category key on a transaction form did not match any known
    /// category for the selected transaction type.
    #[error("\"{0}\" is not a valid category")]
    InvalidCategory(String),

    /// A transaction was marked as recurring without a repeat interval.
    #[error("a recurring transaction must have a repeat interval")]
    MissingRecurringInterval,

    /// The account ID used to create a transaction did not match a valid
    /// account.
    #[error("the account ID does not refer to a valid account")]
    InvalidAccount(Option<AccountId>),

    /// The specified account name already exists in the database.
    #[error("the account \"{0}\" already exists in the database")]
    DuplicateAccountName(String),

    /// The user tried to unset their only default account.
    ///
    /// There must always be one default account so the dashboard and the new
    /// transaction form have an account to fall back to.
    #[error("at least one account must be the default account")]
    DefaultAccountRequired,

    /// A bulk action was submitted with no transactions selected.
    #[error("no transactions were selected")]
    NoTransactionsSelected,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete an account that does not exist
    #[error("tried to delete an account that is not in the database")]
    DeleteMissingAccount,

    /// Tried to update an account that does not exist
    #[error("tried to update an account that is not in the database")]
    UpdateMissingAccount,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
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
            Error::FutureDate(date) => Alert::error(
                "Invalid transaction date",
                &format!("{date} is a date in the future, which is not allowed."),
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::NonPositiveAmount => Alert::error(
                "Invalid amount",
                "Transaction amounts must be greater than zero.",
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::InvalidCategory(category) => Alert::error(
                "Invalid category",
                &format!("\"{category}\" is not a valid category for this transaction type."),
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::MissingRecurringInterval => Alert::error(
                "Missing repeat interval",
                "Choose how often this transaction repeats, or turn off the recurring option.",
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::InvalidAccount(account_id) => Alert::error(
                "Invalid account",
                &format!("Could not find an account with the ID {account_id:?}"),
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::DuplicateAccountName(name) => Alert::error(
                "Duplicate Account Name",
                &format!(
                    "The account {name} already exists in the database. \
                        Choose a different account name, or edit or delete the existing account.",
                ),
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::DefaultAccountRequired => Alert::error(
                "Default account required",
                "You need at least one default account. \
                    Mark another account as the default first.",
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::NoTransactionsSelected => {
                Alert::error("Nothing selected", "Select one or more transactions first.")
                    .into_response_with_status(StatusCode::BAD_REQUEST)
            }
            Error::UpdateMissingTransaction => Alert::error(
                "Could not update transaction",
                "The transaction could not be found.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::DeleteMissingTransaction => Alert::error(
                "Could not delete transaction",
                "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::UpdateMissingAccount => Alert::error(
                "Could not update account",
                "The account could not be found.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::DeleteMissingAccount => Alert::error(
                "Could not delete account",
                "The account could not be found. \
                    Try refreshing the page to see if the account has already been deleted.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            _ => Alert::error(
                "Something went wrong",
                "An unexpected error occurred, check the server logs for more details.",
            )
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}
