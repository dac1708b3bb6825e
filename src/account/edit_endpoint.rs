//! Defines the endpoint for updating an account's name and type.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{AppState, Error, database_id::AccountId, endpoints};

use super::core::{AccountKind, update_account};

/// The state needed to update an account.
#[derive(Debug, Clone)]
pub struct UpdateAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for renaming or rekinding an account.
///
/// The balance is not editable: it is maintained by transaction mutations.
#[derive(Debug, Deserialize)]
pub struct EditAccountForm {
    /// The new account name.
    pub name: String,
    /// The new account type.
    pub kind: AccountKind,
}

/// A route handler for updating an account, redirects to the accounts view on
/// success.
pub async fn update_account_endpoint(
    State(state): State<UpdateAccountState>,
    Path(account_id): Path<AccountId>,
    Form(form): Form<EditAccountForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_account(account_id, &form.name, form.kind, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::ACCOUNTS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not update account {account_id}: {error}");
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

    use crate::{
        account::{AccountForm, AccountKind, create_account, get_account},
        db::initialize,
    };

    use super::{EditAccountForm, UpdateAccountState, update_account_endpoint};

    #[tokio::test]
    async fn renames_account() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let account = create_account(
            &AccountForm {
                name: "Everyday".to_owned(),
                kind: AccountKind::Current,
                balance: 0.0,
                is_default: None,
            },
            &conn,
        )
        .unwrap();
        let state = UpdateAccountState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = update_account_endpoint(
            State(state.clone()),
            Path(account.id),
            Form(EditAccountForm {
                name: "Spending".to_owned(),
                kind: AccountKind::Savings,
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let connection = state.db_connection.lock().unwrap();
        let got = get_account(account.id, &connection).unwrap();
        assert_eq!(got.name, "Spending");
        assert_eq!(got.kind, AccountKind::Savings);
    }

    #[tokio::test]
    async fn updating_missing_account_returns_not_found_alert() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let state = UpdateAccountState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = update_account_endpoint(
            State(state),
            Path(42),
            Form(EditAccountForm {
                name: "Spending".to_owned(),
                kind: AccountKind::Current,
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
