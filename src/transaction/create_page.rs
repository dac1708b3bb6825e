//! Defines the route handler for the page for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    account::{get_all_accounts, get_default_account},
    database_id::AccountId,
    endpoints,
    html::{PAGE_CONTAINER_STYLE, base, dollar_input_styles, link},
    navigation::NavBar,
    timezone::current_local_date,
};

use super::form::{FormAction, TransactionFormValues, transaction_form};

/// The state needed for the new transaction page.
#[derive(Debug, Clone)]
pub struct NewTransactionPageState {
    /// The database connection for listing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for NewTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Optional query parameters for preselecting an account.
#[derive(Debug, Deserialize)]
pub struct NewTransactionQuery {
    /// The account to preselect in the form.
    pub account_id: Option<AccountId>,
}

/// Render the page for creating a transaction.
///
/// The form preselects the account from the query string, falling back to
/// the default account.
pub async fn get_new_transaction_page(
    State(state): State<NewTransactionPageState>,
    Query(query): Query<NewTransactionQuery>,
) -> Result<Response, Error> {
    let today = current_local_date(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let accounts = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("could not get accounts: {error}"))?;

    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();

    if accounts.is_empty() {
        let content = html!(
            (nav_bar)

            main class=(PAGE_CONTAINER_STYLE)
            {
                h1 class="text-xl font-bold" { "New Transaction" }

                p class="my-4"
                {
                    "You need an account before you can record transactions. "
                    (link(endpoints::NEW_ACCOUNT_VIEW, "Create an account"))
                    "."
                }
            }
        );

        return Ok(base("New Transaction", &[], &content).into_response());
    }

    let selected_account = query
        .account_id
        .filter(|id| accounts.iter().any(|account| account.id == *id));
    let account_id = match selected_account {
        Some(id) => id,
        None => {
            let default_account = get_default_account(&connection)
                .inspect_err(|error| tracing::error!("could not get default account: {error}"))?;
            // `accounts` is non-empty, so a default always exists.
            default_account.map_or(accounts[0].id, |account| account.id)
        }
    };

    let values = TransactionFormValues::new(account_id, today);
    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold" { "New Transaction" }

            (transaction_form(&accounts, &values, FormAction::Create))
        }
    );

    Ok(base("New Transaction", &[dollar_input_styles()], &content).into_response())
}
