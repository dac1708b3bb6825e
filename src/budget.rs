//! Monthly budget tracking for the default account.
//!
//! A budget is a single monthly amount attached to an account. Spend against
//! the budget is derived on demand from the account's expenses in the
//! current calendar month.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::{Connection, params};
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    account::{Account, get_default_account},
    database_id::AccountId,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, base, dollar_input_styles, format_currency, link,
    },
    navigation::NavBar,
    timezone::current_local_date,
};

/// A monthly spending budget for an account.
#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    /// The account the budget applies to.
    pub account_id: AccountId,
    /// The monthly budget amount in dollars.
    pub amount: f64,
}

/// A budget with the current month's spend against it.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetProgress {
    /// The monthly budget amount.
    pub amount: f64,
    /// The sum of this month's expenses for the account.
    pub spent: f64,
}

impl BudgetProgress {
    /// How much of the budget has been used, as a percentage.
    ///
    /// May exceed 100 when the account is over budget.
    pub fn percent_used(&self) -> f64 {
        if self.amount <= 0.0 {
            return 0.0;
        }

        self.spent / self.amount * 100.0
    }
}

pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY,
            account_id INTEGER NOT NULL UNIQUE,
            amount REAL NOT NULL,
            FOREIGN KEY(account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    Ok(())
}

/// Retrieve the budget for `account_id`, if one has been set.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_budget(account_id: AccountId, connection: &Connection) -> Result<Option<Budget>, Error> {
    let budget = connection
        .prepare("SELECT account_id, amount FROM budget WHERE account_id = :account_id")?
        .query_map(&[(":account_id", &account_id)], |row| {
            Ok(Budget {
                account_id: row.get(0)?,
                amount: row.get(1)?,
            })
        })?
        .next()
        .transpose()?;

    Ok(budget)
}

/// Set or replace the monthly budget for `account_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAccount] if `account_id` does not refer to a real account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn set_budget(
    account_id: AccountId,
    amount: f64,
    connection: &Connection,
) -> Result<Budget, Error> {
    connection
        .execute(
            "INSERT INTO budget (account_id, amount) VALUES (?1, ?2)
             ON CONFLICT(account_id) DO UPDATE SET amount = excluded.amount",
            params![account_id, amount],
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidAccount(Some(account_id)),
            error => error.into(),
        })?;

    Ok(Budget { account_id, amount })
}

/// Sum the expenses recorded against `account_id` in the calendar month
/// containing `today`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_month_expenses(
    account_id: AccountId,
    today: Date,
    connection: &Connection,
) -> Result<f64, Error> {
    let (month_start, month_end) = month_bounds(today);

    let total: f64 = connection.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM \"transaction\"
         WHERE account_id = ?1 AND kind = 'expense' AND date BETWEEN ?2 AND ?3",
        params![account_id, month_start, month_end],
        |row| row.get(0),
    )?;

    Ok(total)
}

/// The budget and current spend for `account_id`, if a budget is set.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_budget_progress(
    account_id: AccountId,
    today: Date,
    connection: &Connection,
) -> Result<Option<BudgetProgress>, Error> {
    let Some(budget) = get_budget(account_id, connection)? else {
        return Ok(None);
    };

    let spent = get_month_expenses(account_id, today, connection)?;

    Ok(Some(BudgetProgress {
        amount: budget.amount,
        spent,
    }))
}

/// The first and last day of the month containing `date`.
fn month_bounds(date: Date) -> (Date, Date) {
    let month_start = date.replace_day(1).unwrap_or(date);
    let last_day = time::util::days_in_month(date.month(), date.year());
    let month_end = date.replace_day(last_day).unwrap_or(date);

    (month_start, month_end)
}

/// Renders the budget progress bar shown on the dashboard and budget page.
pub fn budget_progress_card(account: &Account, progress: &BudgetProgress) -> Markup {
    let percent_used = progress.percent_used();
    let bar_width = percent_used.clamp(0.0, 100.0);
    let bar_color = if percent_used >= 100.0 {
        "bg-red-600"
    } else if percent_used >= 80.0 {
        "bg-yellow-400"
    } else {
        "bg-green-500"
    };
    let remaining = progress.amount - progress.spent;

    html!(
        section
            class="rounded bg-gray-50 dark:bg-gray-800 p-4 space-y-2"
            data-budget-progress="true"
        {
            header class="flex justify-between items-baseline"
            {
                h2 class="font-semibold" { "Monthly Budget (" (account.name) ")" }

                span class="text-sm text-gray-500 dark:text-gray-400"
                {
                    (format_currency(progress.spent))
                    " of "
                    (format_currency(progress.amount))
                    " spent"
                }
            }

            div class="w-full bg-gray-200 rounded-full h-2.5 dark:bg-gray-700"
            {
                div
                    class=(format!("h-2.5 rounded-full {bar_color}"))
                    style=(format!("width: {bar_width:.0}%"))
                {}
            }

            p class="text-sm text-gray-500 dark:text-gray-400"
            {
                @if remaining >= 0.0 {
                    (format_currency(remaining)) " remaining this month"
                } @else {
                    (format_currency(-remaining)) " over budget this month"
                }
            }
        }
    )
}

// ============================================================================
// HTTP HANDLERS
// ============================================================================

/// The state needed for the budget page and endpoint.
#[derive(Debug, Clone)]
pub struct BudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for BudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the page for viewing and setting the default account's budget.
pub async fn get_budget_page(State(state): State<BudgetState>) -> Result<Response, Error> {
    let today = current_local_date(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let nav_bar = NavBar::new(endpoints::EDIT_BUDGET_VIEW).into_html();

    let Some(account) = get_default_account(&connection)
        .inspect_err(|error| tracing::error!("could not get default account: {error}"))?
    else {
        let content = html!(
            (nav_bar)

            main class=(PAGE_CONTAINER_STYLE)
            {
                h1 class="text-xl font-bold" { "Budget" }

                p class="my-4"
                {
                    "Budgets are tracked against your default account. "
                    (link(endpoints::NEW_ACCOUNT_VIEW, "Create an account"))
                    " first."
                }
            }
        );

        return Ok(base("Budget", &[], &content).into_response());
    };

    let progress = get_budget_progress(account.id, today, &connection)
        .inspect_err(|error| tracing::error!("could not get budget progress: {error}"))?;

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full max-w-md"
            {
                h1 class="text-xl font-bold" { "Budget" }

                @if let Some(progress) = &progress {
                    (budget_progress_card(&account, progress))
                } @else {
                    p class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        "No budget set for " (account.name) " yet."
                    }
                }

                form
                    class=(FORM_CONTAINER_STYLE)
                    hx-post=(endpoints::BUDGET_API)
                    hx-target-error="#alert-container"
                    hx-swap="innerHTML"
                {
                    div class="w-full space-y-4"
                    {
                        div
                        {
                            label for="amount" class=(FORM_LABEL_STYLE) { "Monthly budget amount" }

                            div class="input-wrapper w-full"
                            {
                                input
                                    type="number"
                                    name="amount"
                                    id="amount"
                                    step="0.01"
                                    min="0.01"
                                    required
                                    value=[progress.as_ref().map(|progress| progress.amount)]
                                    class=(FORM_TEXT_INPUT_STYLE);
                            }
                        }

                        button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Budget" }
                    }
                }
            }
        }
    );

    Ok(base("Budget", &[dollar_input_styles()], &content).into_response())
}

/// The form data for setting the monthly budget.
#[derive(Debug, Deserialize)]
pub struct BudgetForm {
    /// The monthly budget amount in dollars.
    pub amount: f64,
}

/// A route handler for setting the default account's budget, redirects back
/// to the budget page on success.
pub async fn set_budget_endpoint(
    State(state): State<BudgetState>,
    Form(form): Form<BudgetForm>,
) -> Response {
    if !form.amount.is_finite() || form.amount <= 0.0 {
        return Error::NonPositiveAmount.into_alert_response();
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let account = match get_default_account(&connection) {
        Ok(Some(account)) => account,
        Ok(None) => return Error::InvalidAccount(None).into_alert_response(),
        Err(error) => {
            tracing::error!("could not get default account: {error}");
            return error.into_alert_response();
        }
    };

    match set_budget(account.id, form.amount, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::EDIT_BUDGET_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not set budget for account {}: {error}", account.id);
            error.into_alert_response()
        }
    }
}
