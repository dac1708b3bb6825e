//! The dashboard's recent transactions card and accounts grid.

use maud::{Markup, html};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    account::{Account, AccountKind},
    endpoints::{self, format_endpoint},
    html::{CARD_STYLE, LINK_STYLE, format_currency},
    transaction::{Transaction, TransactionKind, signed_amount},
};

/// How many transactions the recent transactions card shows.
pub(super) const RECENT_TRANSACTION_COUNT: usize = 5;

const RECENT_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[month repr:short] [day], [year]");

/// The placeholder shown for transactions saved without a description.
const UNTITLED_DESCRIPTION: &str = "Untitled transaction";

/// A transaction rendered in the recent transactions card.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct RecentTransactionRow {
    description: String,
    date_label: String,
    amount_label: String,
    kind: TransactionKind,
}

impl RecentTransactionRow {
    pub(super) fn new_from_transaction(transaction: &Transaction) -> Self {
        let description = if transaction.description.trim().is_empty() {
            UNTITLED_DESCRIPTION.to_owned()
        } else {
            transaction.description.clone()
        };

        Self {
            description,
            date_label: format_recent_date(transaction.date),
            amount_label: format_currency(signed_amount(transaction.kind, transaction.amount)),
            kind: transaction.kind,
        }
    }
}

fn format_recent_date(date: Date) -> String {
    date.format(RECENT_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Renders the recent transactions card with the account switcher.
///
/// Switching accounts reloads the dashboard with the chosen account in the
/// query string.
pub(super) fn recent_transactions_card(
    accounts: &[Account],
    selected_account: &Account,
    rows: &[RecentTransactionRow],
) -> Markup {
    let amount_style = |kind: TransactionKind| match kind {
        TransactionKind::Expense => {
            "text-sm font-semibold px-2 py-1 rounded text-red-700 bg-red-50 \
            dark:text-red-300 dark:bg-red-950"
        }
        TransactionKind::Income => {
            "text-sm font-semibold px-2 py-1 rounded text-green-700 bg-green-50 \
            dark:text-green-300 dark:bg-green-950"
        }
    };

    html!(
        section class=(CARD_STYLE) data-recent-transactions="true"
        {
            header class="flex justify-between items-center gap-4 pb-4"
            {
                h2 class="text-lg font-semibold" { "Recent Transactions" }

                form method="get" action=(endpoints::DASHBOARD_VIEW)
                {
                    select
                        name="account"
                        aria-label="Select account"
                        onchange="this.form.submit()"
                        class="p-2 rounded text-sm text-gray-900 dark:text-white bg-gray-50
                            dark:bg-gray-700 border border-gray-300 dark:border-gray-600"
                    {
                        @for account in accounts {
                            option
                                value=(account.id)
                                selected[account.id == selected_account.id]
                            {
                                (account.name)
                            }
                        }
                    }
                }
            }

            @if rows.is_empty() {
                p class="py-8 text-center text-gray-500 dark:text-gray-400"
                {
                    "No recent transactions. Start by adding your first transaction."
                }
            } @else {
                ul class="divide-y divide-gray-100 dark:divide-gray-700"
                {
                    @for row in rows {
                        li class="flex justify-between items-center py-3"
                        {
                            div
                            {
                                p class="text-sm font-medium" { (row.description) }

                                p class="text-xs text-gray-500 dark:text-gray-400"
                                {
                                    (row.date_label)
                                }
                            }

                            span class=(amount_style(row.kind)) { (row.amount_label) }
                        }
                    }
                }
            }
        }
    )
}

/// Renders the accounts grid: a card per account plus a link for adding a
/// new one.
pub(super) fn accounts_grid(accounts: &[Account]) -> Markup {
    let kind_label = |kind: AccountKind| match kind {
        AccountKind::Current => "Current Account",
        AccountKind::Savings => "Savings Account",
    };

    html!(
        section class="grid gap-4 md:grid-cols-2 lg:grid-cols-3"
        {
            @for account in accounts {
                a
                    href=(format_endpoint(endpoints::ACCOUNT_VIEW, account.id))
                    class=(format!("{CARD_STYLE} block hover:border-blue-400"))
                    data-account-card="true"
                {
                    header class="flex justify-between items-center"
                    {
                        h3 class="font-semibold" { (account.name) }

                        @if account.is_default {
                            span class="px-2 py-0.5 text-xs font-medium rounded-full
                                bg-blue-100 text-blue-700 dark:bg-blue-900 dark:text-blue-300"
                            {
                                "Default"
                            }
                        }
                    }

                    p class="text-2xl font-bold mt-2" { (format_currency(account.balance)) }

                    p class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        (kind_label(account.kind))
                    }
                }
            }

            a
                href=(endpoints::NEW_ACCOUNT_VIEW)
                class=(format!(
                    "{LINK_STYLE} flex flex-col items-center justify-center rounded \
                    border-2 border-dashed border-gray-300 dark:border-gray-600 p-6 no-underline"
                ))
            {
                span class="text-3xl" { "+" }
                span class="text-sm font-medium" { "Add New Account" }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        account::{Account, AccountKind},
        transaction::{Transaction, TransactionKind},
    };

    use super::{RecentTransactionRow, accounts_grid, recent_transactions_card};

    fn make_account(id: i64, name: &str, is_default: bool) -> Account {
        Account {
            id,
            name: name.to_owned(),
            balance: 100.0,
            kind: AccountKind::Current,
            is_default,
        }
    }

    fn make_transaction(description: &str, kind: TransactionKind) -> Transaction {
        Transaction {
            id: 1,
            account_id: 1,
            amount: 45.99,
            kind,
            date: date!(2025 - 10 - 05),
            description: description.to_owned(),
            category: "food".to_owned(),
            is_recurring: false,
            recurring_interval: None,
            next_recurring_date: None,
        }
    }

    #[test]
    fn recent_row_formats_date_and_amount() {
        let transaction = make_transaction("Dinner", TransactionKind::Expense);

        let row = RecentTransactionRow::new_from_transaction(&transaction);

        assert_eq!(row.description, "Dinner");
        assert_eq!(row.date_label, "Oct 05, 2025");
        assert_eq!(row.amount_label, "-$45.99");
    }

    #[test]
    fn recent_row_uses_placeholder_description() {
        let transaction = make_transaction("  ", TransactionKind::Income);

        let row = RecentTransactionRow::new_from_transaction(&transaction);

        assert_eq!(row.description, "Untitled transaction");
        assert_eq!(row.amount_label, "$45.99");
    }

    #[test]
    fn card_marks_selected_account_in_switcher() {
        let accounts = vec![make_account(1, "Everyday", true), make_account(2, "Savings", false)];

        let markup = recent_transactions_card(&accounts, &accounts[1], &[]);

        let html = Html::parse_fragment(&markup.into_string());
        let selected = html
            .select(&Selector::parse("option[selected]").unwrap())
            .next()
            .expect("No selected option found");
        assert_eq!(selected.value().attr("value"), Some("2"));
    }

    #[test]
    fn card_shows_empty_state_without_rows() {
        let accounts = vec![make_account(1, "Everyday", true)];

        let markup = recent_transactions_card(&accounts, &accounts[0], &[]);

        let text = Html::parse_fragment(&markup.into_string())
            .root_element()
            .text()
            .collect::<String>();
        assert!(text.contains("No recent transactions"));
    }

    #[test]
    fn grid_renders_a_card_per_account_with_default_badge() {
        let accounts = vec![make_account(1, "Everyday", true), make_account(2, "Savings", false)];

        let markup = accounts_grid(&accounts);

        let html = Html::parse_fragment(&markup.into_string());
        let cards: Vec<_> = html
            .select(&Selector::parse("a[data-account-card='true']").unwrap())
            .collect();
        assert_eq!(cards.len(), 2);

        let first_text = cards[0].text().collect::<String>();
        assert!(first_text.contains("Everyday"));
        assert!(first_text.contains("Default"));

        let second_text = cards[1].text().collect::<String>();
        assert!(!second_text.contains("Default"));
    }
}
