//! Defines the route handler for the account page that displays transactions
//! as a filterable, sortable, paginated table.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::Markup;
use rusqlite::Connection;
use serde::{Deserialize, Deserializer, de::IntoDeserializer};

use crate::{
    AppState, Error,
    account::get_account,
    database_id::AccountId,
    endpoints,
    pagination::{PaginationConfig, create_pagination_indicators},
};

use super::{
    core::{TransactionKind, count_transactions_for_account, get_transactions_for_account},
    view::{TransactionTableRow, account_page, transaction_list_section},
    view_model::{RecurringFilter, SortDirection, SortField, ViewState, project_transactions},
};

/// The state needed for the account page.
#[derive(Debug, Clone)]
pub struct TransactionListState {
    /// The database connection for reading accounts and transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls how to display pages of transactions.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The decoded query string for the account page.
///
/// Selects with an "all" option submit empty strings, which decode to `None`
/// rather than failing the request.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ListQuery {
    /// The account whose transactions are listed. Not part of the query
    /// string; the handler fills it in from the URL path.
    #[serde(default)]
    pub(crate) account_id: AccountId,
    /// Free text matched against descriptions and categories.
    pub(crate) search: Option<String>,
    /// Keep only income or only expenses when set.
    #[serde(rename = "type", default, deserialize_with = "empty_string_as_none")]
    pub(crate) kind: Option<TransactionKind>,
    /// Keep only recurring or only one-time transactions when set.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) recurring: Option<RecurringFilter>,
    /// The field to sort by. Defaults to the transaction date.
    pub(crate) sort: Option<SortField>,
    /// The direction to sort in. Defaults to most recent first.
    pub(crate) direction: Option<SortDirection>,
    /// The 1-indexed page to display.
    pub(crate) page: Option<u64>,
}

impl ListQuery {
    pub(crate) fn sort_field(&self) -> SortField {
        self.sort.unwrap_or_default()
    }

    pub(crate) fn sort_direction(&self) -> SortDirection {
        self.direction.unwrap_or_default()
    }

    pub(crate) fn page_or_default(&self) -> u64 {
        self.page.unwrap_or(1)
    }

    /// The query with the sort column changed.
    ///
    /// Clicking the active column flips the direction; switching columns
    /// starts ascending. Either way the page resets to 1.
    pub(crate) fn with_sort(&self, field: SortField) -> Self {
        let direction = if self.sort_field() == field {
            self.sort_direction().toggled()
        } else {
            SortDirection::Asc
        };

        Self {
            sort: Some(field),
            direction: Some(direction),
            page: None,
            ..self.clone()
        }
    }

    /// The query with the page changed.
    pub(crate) fn with_page(&self, page: u64) -> Self {
        Self {
            page: Some(page),
            ..self.clone()
        }
    }

    /// The URL for the account page with this query applied.
    pub(crate) fn to_url(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();

        if let Some(search) = self.search.as_deref().filter(|search| !search.is_empty()) {
            pairs.push(("search", search.to_owned()));
        }
        if let Some(kind) = self.kind {
            pairs.push(("type", kind.as_str().to_owned()));
        }
        if let Some(recurring) = self.recurring {
            pairs.push(("recurring", recurring.as_query_value().to_owned()));
        }
        pairs.push(("sort", self.sort_field().as_query_value().to_owned()));
        pairs.push((
            "direction",
            self.sort_direction().as_query_value().to_owned(),
        ));
        pairs.push(("page", self.page_or_default().to_string()));

        let route = endpoints::format_endpoint(endpoints::ACCOUNT_VIEW, self.account_id);
        match serde_urlencoded::to_string(&pairs) {
            Ok(query_string) => format!("{route}?{query_string}"),
            Err(error) => {
                tracing::error!("Could not encode list query: {error}");
                route
            }
        }
    }

    fn into_view_state(self) -> ViewState {
        ViewState {
            search_term: self.search.unwrap_or_default(),
            type_filter: self.kind,
            recurring_filter: self.recurring,
            sort_field: self.sort.unwrap_or_default(),
            sort_direction: self.direction.unwrap_or_default(),
            current_page: self.page.unwrap_or(1),
            selected_ids: Default::default(),
        }
    }
}

fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;

    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(text) => {
            let text_deserializer: serde::de::value::StrDeserializer<serde::de::value::Error> =
                text.into_deserializer();
            T::deserialize(text_deserializer)
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}

/// Render an account with its filtered, sorted and paginated transactions.
pub async fn get_account_page(
    State(state): State<TransactionListState>,
    Path(account_id): Path<AccountId>,
    Query(mut query): Query<ListQuery>,
) -> Result<Response, Error> {
    query.account_id = account_id;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let account = get_account(account_id, &connection)
        .inspect_err(|error| tracing::error!("could not get account {account_id}: {error}"))?;
    let transaction_count = count_transactions_for_account(account_id, &connection)
        .inspect_err(|error| tracing::error!("could not count transactions: {error}"))?;

    let list_section = build_list_section(&query, &state.pagination_config, &connection)?;

    Ok(account_page(&account, transaction_count, list_section).into_response())
}

/// Fetch the account's transactions, run the list pipeline and render the
/// swappable list section.
///
/// Shared between the page handler and the bulk delete endpoint, which
/// re-renders the section after removing the selected rows.
pub(crate) fn build_list_section(
    query: &ListQuery,
    pagination_config: &PaginationConfig,
    connection: &Connection,
) -> Result<Markup, Error> {
    let transactions = get_transactions_for_account(query.account_id, connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    let view_state = query.clone().into_view_state();
    let projection = project_transactions(&transactions, &view_state, pagination_config.page_size);

    let rows: Vec<TransactionTableRow> = projection
        .rows
        .iter()
        .map(|transaction| {
            TransactionTableRow::new_from_transaction(transaction, &view_state.selected_ids)
        })
        .collect();

    let indicators = if projection.page_count > 1 {
        create_pagination_indicators(
            projection.current_page,
            projection.page_count,
            pagination_config.max_pages,
        )
    } else {
        Vec::new()
    };

    let clamped_query = query.with_page(projection.current_page);

    Ok(transaction_list_section(&rows, &clamped_query, &indicators))
}
