//! The dashboard page handler and view.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    account::{Account, get_all_accounts},
    budget::{BudgetProgress, budget_progress_card, get_budget_progress},
    dashboard::{
        cards::{
            RECENT_TRANSACTION_COUNT, RecentTransactionRow, accounts_grid,
            recent_transactions_card,
        },
        charts::{DashboardChart, charts_script, expense_breakdown_chart, month_expense_slices},
    },
    database_id::AccountId,
    endpoints,
    html::{CARD_STYLE, HeadElement, PAGE_CONTAINER_STYLE, base, link},
    navigation::NavBar,
    timezone::current_local_date,
    transaction::get_transactions_for_account,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading accounts, transactions and
    /// budgets.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query string for the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// The account whose recent transactions and expense breakdown are
    /// shown. Defaults to the default account.
    pub account: Option<AccountId>,
}

/// Display a page with an overview of the user's accounts, recent
/// transactions, budget and monthly spending.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let today = current_local_date(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let accounts = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("could not get accounts: {error}"))?;

    let Some(first_account) = accounts.first() else {
        return Ok(dashboard_no_accounts_view(nav_bar).into_response());
    };

    let default_account = accounts
        .iter()
        .find(|account| account.is_default)
        .unwrap_or(first_account);

    let budget_progress = get_budget_progress(default_account.id, today, &connection)
        .inspect_err(|error| tracing::error!("could not get budget progress: {error}"))?;

    let selected_account = query
        .account
        .and_then(|id| accounts.iter().find(|account| account.id == id))
        .unwrap_or(default_account);

    let transactions = get_transactions_for_account(selected_account.id, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    // The query returns most recent first, so the card is the head of the
    // list.
    let recent_rows: Vec<RecentTransactionRow> = transactions
        .iter()
        .take(RECENT_TRANSACTION_COUNT)
        .map(RecentTransactionRow::new_from_transaction)
        .collect();

    let expense_slices = month_expense_slices(&transactions, today);
    let chart = (!expense_slices.is_empty()).then(|| DashboardChart {
        id: "expense-breakdown-chart",
        options: expense_breakdown_chart(&expense_slices).to_string(),
    });

    Ok(dashboard_view(
        nav_bar,
        default_account,
        budget_progress.as_ref(),
        &accounts,
        selected_account,
        &recent_rows,
        chart.as_ref(),
    )
    .into_response())
}

/// Renders the dashboard page when no accounts exist yet.
fn dashboard_no_accounts_view(nav_bar: Markup) -> Markup {
    let new_account_link = link(endpoints::NEW_ACCOUNT_VIEW, "Create an account");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Your budget, recent transactions and spending breakdown will
                show up here once you have an account. "
                (new_account_link)
                " to get started."
            }
        }
    );

    base("Dashboard", &[], &content)
}

fn dashboard_view(
    nav_bar: Markup,
    default_account: &Account,
    budget_progress: Option<&BudgetProgress>,
    accounts: &[Account],
    selected_account: &Account,
    recent_rows: &[RecentTransactionRow],
    chart: Option<&DashboardChart>,
) -> Markup {
    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl mx-auto space-y-6"
            {
                @if let Some(progress) = budget_progress {
                    (budget_progress_card(default_account, progress))
                }

                div class="grid gap-6 lg:grid-cols-2"
                {
                    (recent_transactions_card(accounts, selected_account, recent_rows))

                    (expense_breakdown_card(chart))
                }

                (accounts_grid(accounts))
            }
        }
    );

    let scripts = match chart {
        Some(chart) => vec![
            HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
            charts_script(std::slice::from_ref(chart)),
        ],
        None => Vec::new(),
    };

    base("Dashboard", &scripts, &content)
}

fn expense_breakdown_card(chart: Option<&DashboardChart>) -> Markup {
    html!(
        section class=(CARD_STYLE) data-expense-breakdown="true"
        {
            @match chart {
                Some(chart) => {
                    div id=(chart.id) class="min-h-[380px]" {}
                }
                None => {
                    h2 class="text-lg font-semibold pb-4" { "Monthly Expense Breakdown" }

                    p class="py-8 text-center text-gray-500 dark:text-gray-400"
                    {
                        "No expenses this month. Track your spending to see insights."
                    }
                }
            }
        }
    )
}
