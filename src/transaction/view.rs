//! HTML rendering for the account page's transaction list.

use std::collections::HashSet;

use maud::{Markup, html};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    account::{Account, AccountKind},
    category::{category_color, category_name},
    database_id::TransactionId,
    endpoints,
    html::{
        BADGE_STYLE, BUTTON_DELETE_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        RECURRING_BADGE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        edit_delete_action_links, format_currency,
    },
    navigation::NavBar,
    pagination::PaginationIndicator,
};

use super::{
    core::{Transaction, TransactionKind, signed_amount},
    transactions_page::ListQuery,
    view_model::{RecurringBadge, SortDirection, SortField, recurring_badge},
};

/// The max number of graphemes to display in the transaction table rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

const DATE_ATTR_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The placeholder shown for transactions saved without a description.
const UNTITLED_DESCRIPTION: &str = "Untitled transaction";

fn amount_class(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Expense => "text-red-700 dark:text-red-300",
        TransactionKind::Income => "text-green-700 dark:text-green-300",
    }
}

fn date_datetime_attr(date: Date) -> String {
    date.format(DATE_ATTR_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Renders a transaction as a table row.
#[derive(Debug, PartialEq, Clone)]
pub(crate) struct TransactionTableRow {
    /// The ID of the transaction, used to select it for bulk actions.
    pub(crate) id: TransactionId,
    /// The signed display amount, e.g. "-$45.99".
    pub(crate) amount_label: String,
    /// Whether the transaction is income or an expense.
    pub(crate) kind: TransactionKind,
    /// When the transaction happened.
    pub(crate) date: Date,
    /// The display description, with a placeholder for empty descriptions.
    pub(crate) description: String,
    /// The display name of the transaction's category.
    pub(crate) category_name: &'static str,
    /// The badge color of the transaction's category.
    pub(crate) category_color: &'static str,
    /// The recurring badge derived from the stored schedule.
    pub(crate) badge: RecurringBadge,
    /// Whether the row's checkbox starts checked.
    pub(crate) is_selected: bool,
    /// The page path to edit this transaction
    pub(crate) edit_url: String,
    /// The API path to delete this transaction
    pub(crate) delete_url: String,
}

impl TransactionTableRow {
    pub(crate) fn new_from_transaction(
        transaction: &Transaction,
        selected_ids: &HashSet<TransactionId>,
    ) -> Self {
        let description = if transaction.description.trim().is_empty() {
            UNTITLED_DESCRIPTION.to_owned()
        } else {
            transaction.description.clone()
        };

        Self {
            id: transaction.id,
            amount_label: format_currency(signed_amount(transaction.kind, transaction.amount)),
            kind: transaction.kind,
            date: transaction.date,
            description,
            category_name: category_name(&transaction.category),
            category_color: category_color(&transaction.category),
            badge: recurring_badge(transaction),
            is_selected: selected_ids.contains(&transaction.id),
            edit_url: endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id),
            delete_url: endpoints::format_endpoint(endpoints::TRANSACTION_API, transaction.id),
        }
    }
}

/// Renders the full account page: header card, filter controls and the
/// transaction table.
pub(crate) fn account_page(
    account: &Account,
    transaction_count: u32,
    list_section: Markup,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::ACCOUNTS_VIEW).into_html();
    let kind_label = match account.kind {
        AccountKind::Current => "Current Account",
        AccountKind::Savings => "Savings Account",
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl lg:mx-auto"
            {
                header class="rounded bg-gray-50 dark:bg-gray-800 p-6 flex flex-wrap justify-between items-end gap-4"
                {
                    div
                    {
                        h1 class="text-2xl font-bold" { (account.name) }

                        p class="text-sm text-gray-500 dark:text-gray-400"
                        {
                            (kind_label)

                            @if account.is_default {
                                span class="ml-2 px-2 py-0.5 text-xs font-medium rounded-full bg-blue-100 text-blue-700 dark:bg-blue-900 dark:text-blue-300"
                                {
                                    "Default"
                                }
                            }
                        }
                    }

                    div class="text-right"
                    {
                        p class="text-3xl font-bold" { (format_currency(account.balance)) }

                        p class="text-sm text-gray-500 dark:text-gray-400"
                        {
                            (transaction_count) " transactions"
                        }
                    }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "Create Transaction"
                    }
                }

                (list_section)
            }
        }
    );

    base(&account.name, &[], &content)
}

/// Renders the filter controls, transaction table and pagination as one
/// swappable section.
///
/// The section carries its own element ID so the bulk delete endpoint can
/// re-render it with an htmx swap.
pub(crate) fn transaction_list_section(
    rows: &[TransactionTableRow],
    query: &ListQuery,
    indicators: &[PaginationIndicator],
) -> Markup {
    html!(
        section id="transaction-list" class="space-y-4"
        {
            (filter_controls(query))

            section class="rounded bg-gray-50 dark:bg-gray-800 overflow-x-auto"
            {
                form
                    id="bulk-delete-form"
                    hx-delete=(endpoints::TRANSACTIONS_API)
                    hx-target="#transaction-list"
                    hx-swap="outerHTML"
                    hx-confirm="Delete the selected transactions? This cannot be undone."
                {
                    (bulk_form_state(query))

                    div class="flex justify-between items-center px-6 py-3"
                    {
                        span
                            class="text-sm text-gray-500 dark:text-gray-400"
                            data-selection-count="true"
                        {}

                        button
                            type="submit"
                            class=(BUTTON_DELETE_STYLE)
                            data-bulk-delete="true"
                        {
                            "Delete Selected"
                        }
                    }

                    table class="w-full my-2 text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class="px-6 py-3 w-4"
                                {
                                    input
                                        type="checkbox"
                                        aria-label="Select all transactions on this page"
                                        data-select-all="true";
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    (sort_link(query, SortField::Date, "Date"))
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    (sort_link(query, SortField::Category, "Category"))
                                }
                                th scope="col" class="px-6 py-3 text-right"
                                {
                                    (sort_link(query, SortField::Amount, "Amount"))
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Recurring"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Description"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Actions"
                                }
                            }
                        }

                        tbody
                        {
                            @for row in rows {
                                (transaction_row_view(row))
                            }

                            @if rows.is_empty() {
                                tr
                                {
                                    td
                                        colspan="7"
                                        data-empty-state="true"
                                        class="px-6 py-4 text-center"
                                    {
                                        "No transactions found"
                                    }
                                }
                            }
                        }
                    }
                }
            }

            @if !indicators.is_empty() {
                (pagination_nav(query, indicators))
            }
        }
    )
}

/// Hidden inputs carrying the current list query so the bulk delete endpoint
/// can re-render the same projection.
fn bulk_form_state(query: &ListQuery) -> Markup {
    html!(
        input type="hidden" name="account_id" value=(query.account_id);

        @if let Some(search) = query.search.as_deref().filter(|search| !search.is_empty()) {
            input type="hidden" name="search" value=(search);
        }

        @if let Some(kind) = query.kind {
            input type="hidden" name="type" value=(kind.as_str());
        }

        @if let Some(recurring) = query.recurring {
            input type="hidden" name="recurring" value=(recurring.as_query_value());
        }

        input type="hidden" name="sort" value=(query.sort_field().as_query_value());
        input type="hidden" name="direction" value=(query.sort_direction().as_query_value());
        input type="hidden" name="page" value=(query.page_or_default());
    )
}

fn filter_controls(query: &ListQuery) -> Markup {
    let account_url = endpoints::format_endpoint(endpoints::ACCOUNT_VIEW, query.account_id);
    let select_style = "p-2.5 rounded text-sm text-gray-900 dark:text-white bg-gray-50 \
        dark:bg-gray-700 border border-gray-300 dark:border-gray-600";

    html!(
        form
            method="get"
            action=(account_url)
            class="flex flex-wrap items-center gap-3 rounded bg-gray-50 dark:bg-gray-800 p-4"
        {
            input
                type="search"
                name="search"
                placeholder="Search transactions"
                aria-label="Search transactions"
                value=(query.search.as_deref().unwrap_or_default())
                class=(FORM_TEXT_INPUT_STYLE)
                style="max-width: 16rem";

            select name="type" aria-label="Filter by type" class=(select_style)
            {
                option value="" { "All Types" }
                option value="income" selected[query.kind == Some(TransactionKind::Income)]
                {
                    "Income"
                }
                option value="expense" selected[query.kind == Some(TransactionKind::Expense)]
                {
                    "Expense"
                }
            }

            select name="recurring" aria-label="Filter by recurring" class=(select_style)
            {
                option value="" { "All Transactions" }
                option
                    value="recurring"
                    selected[query.recurring == Some(super::view_model::RecurringFilter::Recurring)]
                {
                    "Recurring Only"
                }
                option
                    value="non-recurring"
                    selected[query.recurring == Some(super::view_model::RecurringFilter::NonRecurring)]
                {
                    "Non-recurring Only"
                }
            }

            input type="hidden" name="sort" value=(query.sort_field().as_query_value());
            input type="hidden" name="direction" value=(query.sort_direction().as_query_value());

            button
                type="submit"
                class="px-4 py-2 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600 text-white rounded text-sm"
            {
                "Apply"
            }
        }
    )
}

fn sort_link(query: &ListQuery, field: SortField, title: &str) -> Markup {
    let url = query.with_sort(field).to_url();
    let indicator = if query.sort_field() == field {
        match query.sort_direction() {
            SortDirection::Asc => " ↑",
            SortDirection::Desc => " ↓",
        }
    } else {
        ""
    };

    html!(
        a href=(url) class="hover:underline"
        {
            (title) (indicator)
        }
    )
}

fn transaction_row_view(row: &TransactionTableRow) -> Markup {
    let truncated_description = truncate_description(&row.description);
    let action_links = edit_delete_action_links(
        &row.edit_url,
        &row.delete_url,
        &format!(
            "Are you sure you want to delete '{}'? This cannot be undone.",
            truncated_description
        ),
        "closest tr",
        "delete",
    );

    html!(
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class="px-6 py-4 w-4"
            {
                input
                    type="checkbox"
                    name="transaction_ids"
                    value=(row.id)
                    form="bulk-delete-form"
                    checked[row.is_selected]
                    aria-label="Select transaction"
                    data-row-select="true";
            }

            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(date_datetime_attr(row.date)) { (row.date) }
            }

            td class=(TABLE_CELL_STYLE)
            {
                span
                    class="px-2 py-1 rounded-2xl text-white text-xs font-medium"
                    style=(format!("background: {}", row.category_color))
                {
                    (row.category_name)
                }
            }

            td class=(format!("px-6 py-4 text-right font-semibold {}", amount_class(row.kind)))
            {
                (row.amount_label)
            }

            td class=(TABLE_CELL_STYLE)
            {
                (recurring_badge_view(row.badge))
            }

            td class=(TABLE_CELL_STYLE)
            {
                (truncated_description)
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
}

fn recurring_badge_view(badge: RecurringBadge) -> Markup {
    match badge {
        RecurringBadge::OneTime => html!(
            span class=(BADGE_STYLE) { "One-time" }
        ),
        RecurringBadge::Recurring { label, next_date } => html!(
            span
                class=(RECURRING_BADGE_STYLE)
                title=[next_date.map(|date| format!("Next date: {date}"))]
                data-recurring-badge="true"
            {
                (label)
            }
        ),
    }
}

fn pagination_nav(query: &ListQuery, indicators: &[PaginationIndicator]) -> Markup {
    let page_link_style = "px-3 py-2 leading-tight text-gray-500 bg-white border \
        border-gray-300 hover:bg-gray-100 hover:text-gray-700 dark:bg-gray-800 \
        dark:border-gray-700 dark:text-gray-400 dark:hover:bg-gray-700 \
        dark:hover:text-white";
    let current_page_style = "px-3 py-2 leading-tight text-blue-600 bg-blue-50 border \
        border-gray-300 dark:bg-gray-700 dark:border-gray-700 dark:text-white";

    html!(
        nav class="pagination flex justify-center" aria-label="Transaction pages"
        {
            ul class="pagination inline-flex -space-x-px text-sm"
            {
                @for indicator in indicators {
                    li
                    {
                        @match indicator {
                            PaginationIndicator::BackButton(page) => {
                                a href=(query.with_page(*page).to_url()) class=(page_link_style)
                                {
                                    "Previous"
                                }
                            }
                            PaginationIndicator::NextButton(page) => {
                                a href=(query.with_page(*page).to_url()) class=(page_link_style)
                                {
                                    "Next"
                                }
                            }
                            PaginationIndicator::Page(page) => {
                                a href=(query.with_page(*page).to_url()) class=(page_link_style)
                                {
                                    (page)
                                }
                            }
                            PaginationIndicator::CurrPage(page) => {
                                span class=(current_page_style) aria-current="page"
                                {
                                    (page)
                                }
                            }
                            PaginationIndicator::Ellipsis => {
                                span class=(page_link_style) { "…" }
                            }
                        }
                    }
                }
            }
        }
    )
}

fn truncate_description(description: &str) -> String {
    let graphemes: Vec<&str> = description.graphemes(true).collect();

    if graphemes.len() <= MAX_DESCRIPTION_GRAPHEMES {
        description.to_owned()
    } else {
        format!("{}…", graphemes[..MAX_DESCRIPTION_GRAPHEMES].concat())
    }
}
