//! Displays accounts and their balances.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links, format_currency,
    },
    navigation::NavBar,
};

use super::core::{Account, AccountKind, get_all_accounts};

/// The state needed for the [get_accounts_page](crate::account::get_accounts_page) route handler.
#[derive(Debug, Clone)]
pub struct AccountsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The account data to display in the view
#[derive(Debug, PartialEq)]
struct AccountTableRow {
    name: String,
    kind: AccountKind,
    balance: f64,
    is_default: bool,
    account_url: String,
    edit_url: String,
    delete_url: String,
}

impl AccountTableRow {
    fn new_from_account(account: Account) -> Self {
        Self {
            account_url: format_endpoint(endpoints::ACCOUNT_VIEW, account.id),
            edit_url: format_endpoint(endpoints::EDIT_ACCOUNT_VIEW, account.id),
            delete_url: format_endpoint(endpoints::ACCOUNT_API, account.id),
            name: account.name,
            kind: account.kind,
            balance: account.balance,
            is_default: account.is_default,
        }
    }
}

fn accounts_view(accounts: &[AccountTableRow]) -> Markup {
    let create_account_page_url = endpoints::NEW_ACCOUNT_VIEW;
    let nav_bar = NavBar::new(endpoints::ACCOUNTS_VIEW).into_html();

    let table_row = |account: &AccountTableRow| {
        let balance_str = format_currency(account.balance);
        let action_links = edit_delete_action_links(
            &account.edit_url,
            &account.delete_url,
            &format!(
                "Are you sure you want to delete the account '{}' and all of its transactions? This cannot be undone.",
                account.name
            ),
            "closest tr",
            "delete",
        );

        html!(
            tr class=(TABLE_ROW_STYLE) data-account-row="true"
            {
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    a href=(account.account_url) class=(LINK_STYLE) { (account.name) }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (account.kind.label())
                }

                td class="px-6 py-4 text-right"
                {
                    (balance_str)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    @if account.is_default {
                        span class="px-2 py-0.5 text-xs font-medium rounded-full bg-blue-100 text-blue-700 dark:bg-blue-900 dark:text-blue-300"
                        {
                            "Default"
                        }
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (action_links)
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Accounts" }

                    a href=(create_account_page_url) class=(LINK_STYLE)
                    {
                        "Add Account"
                    }
                }

                section class="w-full overflow-x-auto dark:bg-gray-800 lg:max-w-5xl lg:w-full lg:mx-auto"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Name"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Type"
                                }
                                th scope="col" class="px-6 py-3 text-right"
                                {
                                    "Balance"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Default"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Actions"
                                }
                            }
                        }

                        tbody
                        {
                            @for account in accounts {
                                (table_row(account))
                            }

                            @if accounts.is_empty() {
                                tr
                                {
                                    td
                                        colspan="5"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No accounts found. Create an account "
                                        a href=(create_account_page_url) class=(LINK_STYLE)
                                        {
                                            "here"
                                        }
                                        "."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Accounts", &[], &content)
}

/// Render an overview of the user's accounts.
pub async fn get_accounts_page(State(state): State<AccountsPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let accounts = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("could not get accounts: {error}"))?;

    let rows: Vec<AccountTableRow> = accounts
        .into_iter()
        .map(AccountTableRow::new_from_account)
        .collect();

    Ok(accounts_view(&rows).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, response::Response};
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{
        account::{AccountForm, AccountKind, create_account},
        db::initialize,
    };

    use super::{AccountsPageState, get_accounts_page};

    async fn parse_html(response: Response) -> Html {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Could not get response body");

        Html::parse_document(&String::from_utf8_lossy(&body))
    }

    #[tokio::test]
    async fn accounts_page_lists_accounts_with_default_badge() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_account(
            &AccountForm {
                name: "Everyday".to_owned(),
                kind: AccountKind::Current,
                balance: 123.45,
                is_default: None,
            },
            &conn,
        )
        .unwrap();
        create_account(
            &AccountForm {
                name: "Rainy Day".to_owned(),
                kind: AccountKind::Savings,
                balance: 5_000.0,
                is_default: None,
            },
            &conn,
        )
        .unwrap();

        let state = AccountsPageState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = get_accounts_page(State(state)).await.unwrap();
        let html = parse_html(response).await;

        let rows: Vec<_> = html
            .select(&Selector::parse("tr[data-account-row='true']").unwrap())
            .collect();
        assert_eq!(rows.len(), 2);

        let first_row_text = rows[0].text().collect::<String>();
        assert!(first_row_text.contains("Everyday"));
        assert!(first_row_text.contains("Default"));

        let second_row_text = rows[1].text().collect::<String>();
        assert!(second_row_text.contains("Rainy Day"));
        assert!(!second_row_text.contains("Default"));
    }

    #[tokio::test]
    async fn accounts_page_shows_empty_state() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let state = AccountsPageState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = get_accounts_page(State(state)).await.unwrap();
        let html = parse_html(response).await;
        let text = html.root_element().text().collect::<String>();

        assert!(text.contains("No accounts found"));
    }
}
