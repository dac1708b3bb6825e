//! The pure view-model for the transaction list.
//!
//! Everything in this module is a function of the transaction collection and
//! the current [ViewState]: no I/O, no clock, no hidden state. The account
//! page rebuilds the projection from scratch on every request, which is cheap
//! at the list sizes this app sees (low thousands).

use std::{cmp::Ordering, collections::HashSet};

use serde::Deserialize;
use time::Date;

use crate::database_id::TransactionId;

use super::core::{Transaction, TransactionKind};

/// The field the transaction list is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    /// Sort chronologically.
    #[default]
    Date,
    /// Sort by the transaction amount.
    Amount,
    /// Sort by the category key.
    Category,
}

impl SortField {
    /// The value used in query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::Amount => "amount",
            SortField::Category => "category",
        }
    }
}

/// The direction the transaction list is sorted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest (or earliest) values first.
    Asc,
    /// Largest (or latest) values first. Matches the default list order of
    /// most recent transactions at the top.
    #[default]
    Desc,
}

impl SortDirection {
    /// The value used in query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// The opposite direction, used by the sortable column headers.
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Filter transactions by whether they repeat on a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecurringFilter {
    /// Keep only recurring transactions.
    Recurring,
    /// Keep only one-time transactions.
    NonRecurring,
}

impl RecurringFilter {
    /// The value used in query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            RecurringFilter::Recurring => "recurring",
            RecurringFilter::NonRecurring => "non-recurring",
        }
    }

    fn matches(self, transaction: &Transaction) -> bool {
        match self {
            RecurringFilter::Recurring => transaction.is_recurring,
            RecurringFilter::NonRecurring => !transaction.is_recurring,
        }
    }
}

/// The ephemeral filter/sort/pagination/selection state driving the list
/// projection.
///
/// The account page decodes one of these from the request's query string and
/// bulk-action form, so the projection can be unit tested without a server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    /// Free text matched against descriptions and categories.
    pub search_term: String,
    /// Keep only income or only expenses when set.
    pub type_filter: Option<TransactionKind>,
    /// Keep only recurring or only one-time transactions when set.
    pub recurring_filter: Option<RecurringFilter>,
    /// The field to sort by.
    pub sort_field: SortField,
    /// The direction to sort in.
    pub sort_direction: SortDirection,
    /// The 1-indexed page to display.
    pub current_page: u64,
    /// The transactions selected for bulk actions, across all pages.
    pub selected_ids: HashSet<TransactionId>,
}

/// One page of the filtered, sorted transaction list.
#[derive(Debug, PartialEq)]
pub struct TransactionListPage<'a> {
    /// The transactions on the current page, at most one page size of them.
    pub rows: Vec<&'a Transaction>,
    /// The page actually displayed, clamped to the valid range.
    pub current_page: u64,
    /// The total number of pages; zero when nothing survives the filters.
    pub page_count: u64,
    /// How many transactions survived the filters, across all pages.
    pub filtered_count: usize,
}

/// Run the full filter → sort → paginate pipeline.
///
/// The pipeline is a pure function: calling it twice with the same inputs
/// yields the same projection. Sorting is stable, so transactions with equal
/// keys keep their relative order from the input collection.
///
/// `current_page` is clamped to `[1, page_count]` (or page 1 when the
/// filtered set is empty), so narrowing a filter while on a late page lands
/// on the last valid page rather than an empty one.
pub fn project_transactions<'a>(
    transactions: &'a [Transaction],
    state: &ViewState,
    page_size: u64,
) -> TransactionListPage<'a> {
    let mut filtered: Vec<&Transaction> = transactions
        .iter()
        .filter(|transaction| matches_search(transaction, &state.search_term))
        .filter(|transaction| {
            state
                .type_filter
                .is_none_or(|kind| transaction.kind == kind)
        })
        .filter(|transaction| {
            state
                .recurring_filter
                .is_none_or(|filter| filter.matches(transaction))
        })
        .collect();

    filtered.sort_by(|a, b| {
        let ordering = match state.sort_field {
            SortField::Date => a.date.cmp(&b.date),
            SortField::Amount => a.amount.total_cmp(&b.amount),
            SortField::Category => a
                .category
                .to_lowercase()
                .cmp(&b.category.to_lowercase()),
        };

        match state.sort_direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    let filtered_count = filtered.len();
    let page_size = page_size.max(1);
    let page_count = (filtered_count as u64).div_ceil(page_size);
    let current_page = state.current_page.clamp(1, page_count.max(1));

    let start = ((current_page - 1) * page_size) as usize;
    let end = (start + page_size as usize).min(filtered_count);
    let rows = if start < filtered_count {
        filtered[start..end].to_vec()
    } else {
        Vec::new()
    };

    TransactionListPage {
        rows,
        current_page,
        page_count,
        filtered_count,
    }
}

fn matches_search(transaction: &Transaction, search_term: &str) -> bool {
    let search_term = search_term.trim().to_lowercase();
    if search_term.is_empty() {
        return true;
    }

    transaction
        .description
        .to_lowercase()
        .contains(&search_term)
        || transaction.category.to_lowercase().contains(&search_term)
}

/// Toggle the "select all" checkbox for the transactions visible on the
/// current page.
///
/// Selecting all is a per-page operation: when every visible transaction is
/// already selected, exactly those are removed and selections made on other
/// pages are left untouched. Otherwise all visible transactions are added to
/// the selection.
pub fn toggle_select_all(selected_ids: &mut HashSet<TransactionId>, visible_ids: &[TransactionId]) {
    let all_selected =
        !visible_ids.is_empty() && visible_ids.iter().all(|id| selected_ids.contains(id));

    if all_selected {
        for id in visible_ids {
            selected_ids.remove(id);
        }
    } else {
        selected_ids.extend(visible_ids.iter().copied());
    }
}

/// The badge shown in the "Recurring" column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurringBadge {
    /// The transaction does not repeat.
    OneTime,
    /// The transaction repeats on a schedule.
    Recurring {
        /// The interval name, e.g. "Monthly".
        label: &'static str,
        /// The externally maintained next occurrence, shown as a tooltip.
        /// `None` when the stored row is missing the date.
        next_date: Option<Date>,
    },
}

/// Derive the recurring badge for a transaction.
///
/// Purely presentational: the next occurrence is displayed verbatim, never
/// computed here. A row that claims to be recurring but has no interval is
/// treated as one-time rather than rendering a broken badge.
pub fn recurring_badge(transaction: &Transaction) -> RecurringBadge {
    match (transaction.is_recurring, transaction.recurring_interval) {
        (true, Some(interval)) => RecurringBadge::Recurring {
            label: interval.label(),
            next_date: transaction.next_recurring_date,
        },
        _ => RecurringBadge::OneTime,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use time::{Duration, macros::date};

    use crate::transaction::{
        RecurringInterval, Transaction, TransactionKind,
        core::TransactionBuilder,
    };

    use super::{
        RecurringBadge, RecurringFilter, SortDirection, SortField, ViewState, project_transactions,
        recurring_badge, toggle_select_all,
    };

    const PAGE_SIZE: u64 = 10;

    fn make_transaction(id: i64, builder: TransactionBuilder) -> Transaction {
        let (recurring_interval, next_recurring_date) = match builder.recurring {
            Some((interval, next_date)) => (Some(interval), Some(next_date)),
            None => (None, None),
        };

        Transaction {
            id,
            account_id: builder.account_id,
            amount: builder.amount,
            kind: builder.kind,
            date: builder.date,
            description: builder.description,
            category: builder.category,
            is_recurring: builder.recurring.is_some(),
            recurring_interval,
            next_recurring_date,
        }
    }

    fn sample_transactions(count: usize) -> Vec<Transaction> {
        let start = date!(2025 - 01 - 01);

        (0..count)
            .map(|i| {
                let kind = if i % 2 == 0 {
                    TransactionKind::Expense
                } else {
                    TransactionKind::Income
                };

                make_transaction(
                    (i + 1) as i64,
                    Transaction::build(1, (i + 1) as f64, kind, start + Duration::days(i as i64))
                        .description(&format!("transaction #{i}"))
                        .category("groceries"),
                )
            })
            .collect()
    }

    #[test]
    fn row_count_across_pages_equals_filtered_count() {
        let transactions = sample_transactions(37);
        let mut state = ViewState {
            type_filter: Some(TransactionKind::Expense),
            ..Default::default()
        };

        let first_page = project_transactions(&transactions, &state, PAGE_SIZE);
        let mut total_rows = 0;
        for page in 1..=first_page.page_count {
            state.current_page = page;
            let projection = project_transactions(&transactions, &state, PAGE_SIZE);
            assert!(projection.rows.len() as u64 <= PAGE_SIZE);
            total_rows += projection.rows.len();
        }

        assert_eq!(total_rows, first_page.filtered_count);
    }

    #[test]
    fn pipeline_is_idempotent() {
        let transactions = sample_transactions(23);
        let state = ViewState {
            search_term: "transaction".to_owned(),
            sort_field: SortField::Amount,
            sort_direction: SortDirection::Asc,
            current_page: 2,
            ..Default::default()
        };

        let first = project_transactions(&transactions, &state, PAGE_SIZE);
        let second = project_transactions(&transactions, &state, PAGE_SIZE);

        assert_eq!(first, second);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        // Four transactions on the same date: sorting by date must keep the
        // input order, in both directions.
        let shared_date = date!(2025 - 06 - 15);
        let transactions: Vec<_> = (1..=4)
            .map(|id| {
                make_transaction(
                    id,
                    Transaction::build(1, id as f64, TransactionKind::Expense, shared_date)
                        .category("food"),
                )
            })
            .collect();

        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let state = ViewState {
                sort_field: SortField::Date,
                sort_direction: direction,
                ..Default::default()
            };

            let projection = project_transactions(&transactions, &state, PAGE_SIZE);
            let got_ids: Vec<_> = projection.rows.iter().map(|row| row.id).collect();

            assert_eq!(got_ids, vec![1, 2, 3, 4], "unstable sort for {direction:?}");
        }
    }

    #[test]
    fn search_is_case_insensitive() {
        let transactions = vec![
            make_transaction(
                1,
                Transaction::build(1, 10.0, TransactionKind::Expense, date!(2025 - 01 - 01))
                    .description("Grocery run")
                    .category("groceries"),
            ),
            make_transaction(
                2,
                Transaction::build(1, 20.0, TransactionKind::Expense, date!(2025 - 01 - 02))
                    .description("Petrol")
                    .category("transportation"),
            ),
        ];

        let uppercase = ViewState {
            search_term: "Grocery".to_owned(),
            ..Default::default()
        };
        let lowercase = ViewState {
            search_term: "grocery".to_owned(),
            ..Default::default()
        };

        let got_upper = project_transactions(&transactions, &uppercase, PAGE_SIZE);
        let got_lower = project_transactions(&transactions, &lowercase, PAGE_SIZE);

        assert_eq!(got_upper, got_lower);
        assert_eq!(got_upper.filtered_count, 1);
        assert_eq!(got_upper.rows[0].id, 1);
    }

    #[test]
    fn search_matches_category_as_well_as_description() {
        let transactions = vec![make_transaction(
            1,
            Transaction::build(1, 10.0, TransactionKind::Expense, date!(2025 - 01 - 01))
                .description("Weekly shop")
                .category("groceries"),
        )];

        let state = ViewState {
            search_term: "grocer".to_owned(),
            ..Default::default()
        };

        let projection = project_transactions(&transactions, &state, PAGE_SIZE);

        assert_eq!(projection.filtered_count, 1);
    }

    #[test]
    fn type_filter_keeps_only_expenses() {
        // 12 transactions, 5 expenses and 7 income.
        let transactions: Vec<_> = (0..12)
            .map(|i| {
                let kind = if i < 5 {
                    TransactionKind::Expense
                } else {
                    TransactionKind::Income
                };
                make_transaction(
                    (i + 1) as i64,
                    Transaction::build(1, 1.0, kind, date!(2025 - 01 - 01)).category("food"),
                )
            })
            .collect();

        let state = ViewState {
            type_filter: Some(TransactionKind::Expense),
            ..Default::default()
        };

        let projection = project_transactions(&transactions, &state, PAGE_SIZE);

        assert_eq!(projection.filtered_count, 5);
        assert_eq!(projection.rows.len(), 5);
        assert_eq!(projection.page_count, 1);
    }

    #[test]
    fn recurring_filter_partitions_transactions() {
        let transactions = vec![
            make_transaction(
                1,
                Transaction::build(1, 10.0, TransactionKind::Expense, date!(2025 - 01 - 01))
                    .category("bills")
                    .recurring(RecurringInterval::Monthly, date!(2025 - 02 - 01)),
            ),
            make_transaction(
                2,
                Transaction::build(1, 20.0, TransactionKind::Expense, date!(2025 - 01 - 02))
                    .category("food"),
            ),
        ];

        let recurring = ViewState {
            recurring_filter: Some(RecurringFilter::Recurring),
            ..Default::default()
        };
        let one_time = ViewState {
            recurring_filter: Some(RecurringFilter::NonRecurring),
            ..Default::default()
        };

        let got_recurring = project_transactions(&transactions, &recurring, PAGE_SIZE);
        let got_one_time = project_transactions(&transactions, &one_time, PAGE_SIZE);

        assert_eq!(got_recurring.filtered_count, 1);
        assert_eq!(got_recurring.rows[0].id, 1);
        assert_eq!(got_one_time.filtered_count, 1);
        assert_eq!(got_one_time.rows[0].id, 2);
    }

    #[test]
    fn amount_sort_ascending_orders_pages() {
        // 25 transactions with shuffled amounts: page 1 holds the 10 smallest
        // amounts, page 3 the 5 largest.
        let amounts: Vec<f64> = (1..=25).map(|i| ((i * 7) % 26) as f64).collect();
        let transactions: Vec<_> = amounts
            .iter()
            .enumerate()
            .map(|(i, &amount)| {
                make_transaction(
                    (i + 1) as i64,
                    Transaction::build(1, amount, TransactionKind::Expense, date!(2025 - 01 - 01))
                        .category("shopping"),
                )
            })
            .collect();

        let mut state = ViewState {
            sort_field: SortField::Amount,
            sort_direction: SortDirection::Asc,
            current_page: 1,
            ..Default::default()
        };

        let mut all_amounts = Vec::new();
        let first_page = project_transactions(&transactions, &state, PAGE_SIZE);
        assert_eq!(first_page.page_count, 3);
        for page in 1..=first_page.page_count {
            state.current_page = page;
            let projection = project_transactions(&transactions, &state, PAGE_SIZE);
            all_amounts.extend(projection.rows.iter().map(|row| row.amount));
        }

        assert_eq!(all_amounts.len(), 25);
        assert!(
            all_amounts.windows(2).all(|pair| pair[0] <= pair[1]),
            "amounts are not in ascending order: {all_amounts:?}"
        );

        state.current_page = 3;
        let last_page = project_transactions(&transactions, &state, PAGE_SIZE);
        assert_eq!(last_page.rows.len(), 5);
    }

    #[test]
    fn empty_filtered_set_has_zero_pages() {
        let transactions = sample_transactions(5);
        let state = ViewState {
            search_term: "no such transaction".to_owned(),
            ..Default::default()
        };

        let projection = project_transactions(&transactions, &state, PAGE_SIZE);

        assert_eq!(projection.filtered_count, 0);
        assert_eq!(projection.page_count, 0);
        assert_eq!(projection.current_page, 1);
        assert!(projection.rows.is_empty());
    }

    #[test]
    fn current_page_clamps_after_filter_narrows_results() {
        let transactions = sample_transactions(30);
        let state = ViewState {
            // 15 expenses survive the filter, so there are only 2 pages.
            type_filter: Some(TransactionKind::Expense),
            current_page: 5,
            ..Default::default()
        };

        let projection = project_transactions(&transactions, &state, PAGE_SIZE);

        assert_eq!(projection.page_count, 2);
        assert_eq!(projection.current_page, 2);
        assert_eq!(projection.rows.len(), 5);
    }

    #[test]
    fn select_all_toggle_clears_only_current_page() {
        // 15 transactions over 2 pages. Selecting all of page 1 then toggling
        // again clears exactly those 10 ids.
        let transactions = sample_transactions(15);
        let state = ViewState {
            sort_direction: SortDirection::Asc,
            ..Default::default()
        };
        let projection = project_transactions(&transactions, &state, PAGE_SIZE);
        let visible_ids: Vec<_> = projection.rows.iter().map(|row| row.id).collect();
        assert_eq!(visible_ids.len(), 10);

        let mut selected_ids = HashSet::new();

        toggle_select_all(&mut selected_ids, &visible_ids);
        assert_eq!(selected_ids.len(), 10);

        toggle_select_all(&mut selected_ids, &visible_ids);
        assert!(selected_ids.is_empty());
    }

    #[test]
    fn select_all_toggle_preserves_other_pages() {
        let mut selected_ids: HashSet<i64> = HashSet::from([11, 12]);
        let visible_ids = vec![1, 2, 3];

        toggle_select_all(&mut selected_ids, &visible_ids);
        assert_eq!(selected_ids.len(), 5);

        toggle_select_all(&mut selected_ids, &visible_ids);
        assert_eq!(selected_ids, HashSet::from([11, 12]));
    }

    #[test]
    fn partially_selected_page_selects_the_rest() {
        let mut selected_ids: HashSet<i64> = HashSet::from([1]);
        let visible_ids = vec![1, 2, 3];

        toggle_select_all(&mut selected_ids, &visible_ids);

        assert_eq!(selected_ids, HashSet::from([1, 2, 3]));
    }

    #[test]
    fn one_time_transaction_never_exposes_recurring_state() {
        let transaction = make_transaction(
            1,
            Transaction::build(1, 10.0, TransactionKind::Expense, date!(2025 - 01 - 01))
                .category("food"),
        );

        assert_eq!(recurring_badge(&transaction), RecurringBadge::OneTime);
    }

    #[test]
    fn recurring_badge_shows_interval_and_next_date() {
        let transaction = make_transaction(
            1,
            Transaction::build(1, 10.0, TransactionKind::Expense, date!(2025 - 01 - 01))
                .category("bills")
                .recurring(RecurringInterval::Weekly, date!(2025 - 01 - 08)),
        );

        assert_eq!(
            recurring_badge(&transaction),
            RecurringBadge::Recurring {
                label: "Weekly",
                next_date: Some(date!(2025 - 01 - 08)),
            }
        );
    }

    #[test]
    fn recurring_flag_without_interval_renders_one_time() {
        // Defensive: a hand-edited row can claim to recur without saying how.
        let mut transaction = make_transaction(
            1,
            Transaction::build(1, 10.0, TransactionKind::Expense, date!(2025 - 01 - 01))
                .category("bills"),
        );
        transaction.is_recurring = true;

        assert_eq!(recurring_badge(&transaction), RecurringBadge::OneTime);
    }
}
