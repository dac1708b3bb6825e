//! Defines the endpoints for deleting transactions, one at a time or in
//! bulk.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::html;
use serde::Deserialize;

use crate::{
    Error,
    alert::Alert,
    database_id::{AccountId, TransactionId},
};

use super::{
    core::{delete_transaction, delete_transactions},
    form::empty_string_as_none,
    transactions_page::{ListQuery, TransactionListState, build_list_section},
    view_model::{RecurringFilter, SortDirection, SortField},
};

/// A route handler for deleting a single transaction, responds with an alert.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionListState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_transaction(transaction_id, &connection) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(rows_affected) if rows_affected != 0 => Alert::SuccessSimple {
            message: "Transaction deleted successfully".to_owned(),
        }
        .into_response(),
        Ok(_) => Error::DeleteMissingTransaction.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

/// The form data for bulk deleting the selected transactions.
///
/// Carries the current list query so the endpoint can re-render the same
/// projection after the rows are gone.
#[derive(Debug, Deserialize)]
pub struct BulkDeleteForm {
    /// The account whose page submitted the form.
    pub account_id: AccountId,
    /// The selected transaction IDs.
    #[serde(default)]
    pub transaction_ids: Vec<TransactionId>,
    /// The active search term.
    pub search: Option<String>,
    /// The active type filter.
    #[serde(rename = "type", default, deserialize_with = "empty_string_as_none")]
    pub kind: Option<super::core::TransactionKind>,
    /// The active recurring filter.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub recurring: Option<RecurringFilter>,
    /// The active sort field.
    pub sort: Option<SortField>,
    /// The active sort direction.
    pub direction: Option<SortDirection>,
    /// The page that was displayed.
    pub page: Option<u64>,
}

impl BulkDeleteForm {
    fn list_query(&self) -> ListQuery {
        ListQuery {
            account_id: self.account_id,
            search: self.search.clone(),
            kind: self.kind,
            recurring: self.recurring,
            sort: self.sort,
            direction: self.direction,
            page: self.page,
        }
    }
}

/// A route handler for deleting the selected transactions as one
/// all-or-nothing operation.
///
/// On success the response swaps a freshly rendered list section in place of
/// the old one, which also clears the selection, and raises a success alert
/// out of band. On failure only an error alert is raised and the selection
/// is left as it was, so the user can retry.
pub async fn bulk_delete_transactions_endpoint(
    State(state): State<TransactionListState>,
    Form(form): Form<BulkDeleteForm>,
) -> Response {
    if form.transaction_ids.is_empty() {
        return Error::NoTransactionsSelected.into_alert_response();
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let rows_affected = match delete_transactions(&form.transaction_ids, &connection) {
        Ok(rows_affected) => rows_affected,
        Err(error) => {
            tracing::error!(
                "Could not bulk delete {} transactions: {error}",
                form.transaction_ids.len()
            );
            return error.into_alert_response();
        }
    };

    let list_section =
        match build_list_section(&form.list_query(), &state.pagination_config, &connection) {
            Ok(list_section) => list_section,
            Err(error) => {
                tracing::error!("Could not re-render transaction list: {error}");
                return error.into_alert_response();
            }
        };

    let alert = Alert::SuccessSimple {
        message: format!(
            "Deleted {rows_affected} transaction{}",
            if rows_affected == 1 { "" } else { "s" }
        ),
    };

    html!(
        (list_section)
        (alert.into_markup())
    )
    .into_response()
}
