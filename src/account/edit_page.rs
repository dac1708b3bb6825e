//! Defines the route handler for the page for editing an account.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::AccountId,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, base,
    },
    navigation::NavBar,
};

use super::core::{Account, AccountKind, get_account};

/// The state needed for the edit account page.
#[derive(Debug, Clone)]
pub struct EditAccountPageState {
    /// The database connection for reading the account.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditAccountPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn edit_account_form(account: &Account) -> Markup {
    let update_url = endpoints::format_endpoint(endpoints::ACCOUNT_API, account.id);

    html!(
        form
            class=(FORM_CONTAINER_STYLE)
            hx-put=(update_url)
            hx-target-error="#alert-container"
            hx-swap="innerHTML"
        {
            div class="w-full space-y-4"
            {
                div
                {
                    label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                    input
                        type="text"
                        name="name"
                        id="name"
                        required
                        value=(account.name)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="kind" class=(FORM_LABEL_STYLE) { "Type" }

                    select name="kind" id="kind" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option
                            value=(AccountKind::Current.as_str())
                            selected[account.kind == AccountKind::Current]
                        {
                            "Current"
                        }
                        option
                            value=(AccountKind::Savings.as_str())
                            selected[account.kind == AccountKind::Savings]
                        {
                            "Savings"
                        }
                    }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update Account" }
            }
        }
    )
}

/// Render the page for editing the account `account_id`.
pub async fn get_edit_account_page(
    State(state): State<EditAccountPageState>,
    Path(account_id): Path<AccountId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let account = get_account(account_id, &connection)
        .inspect_err(|error| tracing::error!("could not get account {account_id}: {error}"))?;

    let nav_bar = NavBar::new(endpoints::EDIT_ACCOUNT_VIEW).into_html();
    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold" { "Edit Account" }

            (edit_account_form(&account))
        }
    );

    Ok(base("Edit Account", &[], &content).into_response())
}
