//! Defines the endpoint for updating an existing transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, database_id::TransactionId, endpoints, timezone::current_local_date,
};

use super::{core::update_transaction, form::TransactionForm};

/// The state needed to update a transaction.
#[derive(Debug, Clone)]
pub struct UpdateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for UpdateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for updating a transaction, redirects to the owning
/// account's page on success.
///
/// The recurring schedule is recomputed from the submitted date and
/// interval, and account balances are reconciled when the amount, kind or
/// account changed.
pub async fn update_transaction_endpoint(
    State(state): State<UpdateTransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let today = match current_local_date(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let builder = match form.into_builder(today) {
        Ok(builder) => builder,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_transaction(transaction_id, builder, &connection) {
        Ok(transaction) => {
            let account_url =
                endpoints::format_endpoint(endpoints::ACCOUNT_VIEW, transaction.account_id);
            (HxRedirect(account_url), StatusCode::SEE_OTHER).into_response()
        }
        Err(error) => {
            tracing::error!("Could not update transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        account::{AccountForm, AccountKind, create_account, get_account},
        db::initialize,
        transaction::{
            Transaction, TransactionKind, core::get_transaction, create_transaction,
            form::TransactionForm,
        },
    };

    use super::{UpdateTransactionState, update_transaction_endpoint};

    #[tokio::test]
    async fn updates_amount_and_reconciles_balance() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let account = create_account(
            &AccountForm {
                name: "Everyday".to_owned(),
                kind: AccountKind::Current,
                balance: 100.0,
                is_default: None,
            },
            &conn,
        )
        .unwrap();
        let transaction = create_transaction(
            Transaction::build(
                account.id,
                40.0,
                TransactionKind::Expense,
                date!(2020 - 01 - 01),
            )
            .category("food"),
            &conn,
        )
        .unwrap();

        let state = UpdateTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let form = TransactionForm {
            account_id: account.id,
            amount: 10.0,
            kind: TransactionKind::Expense,
            date: date!(2020 - 01 - 01),
            description: String::new(),
            category: "food".to_owned(),
            is_recurring: false,
            recurring_interval: None,
        };

        let response =
            update_transaction_endpoint(State(state.clone()), Path(transaction.id), Form(form))
                .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let connection = state.db_connection.lock().unwrap();
        let got = get_transaction(transaction.id, &connection).unwrap();
        assert_eq!(got.amount, 10.0);
        assert_eq!(get_account(account.id, &connection).unwrap().balance, 90.0);
    }

    #[tokio::test]
    async fn updating_missing_transaction_returns_not_found_alert() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let account = create_account(
            &AccountForm {
                name: "Everyday".to_owned(),
                kind: AccountKind::Current,
                balance: 100.0,
                is_default: None,
            },
            &conn,
        )
        .unwrap();

        let state = UpdateTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let form = TransactionForm {
            account_id: account.id,
            amount: 10.0,
            kind: TransactionKind::Expense,
            date: date!(2020 - 01 - 01),
            description: String::new(),
            category: "food".to_owned(),
            is_recurring: false,
            recurring_interval: None,
        };

        let response = update_transaction_endpoint(State(state), Path(1337), Form(form)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
