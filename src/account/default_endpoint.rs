//! Defines the endpoint for marking an account as the default account.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_htmx::HxRefresh;
use rusqlite::Connection;

use crate::{AppState, Error, database_id::AccountId};

use super::core::{get_account, set_default_account};

/// The state needed to change the default account.
#[derive(Debug, Clone)]
pub struct DefaultAccountState {
    /// The database connection for managing accounts.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DefaultAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for marking an account as the default account.
///
/// There must always be one default account, so toggling the switch on the
/// account that is already the default is rejected with a warning instead of
/// clearing the flag. On success the page refreshes to show the moved flag.
pub async fn set_default_account_endpoint(
    State(state): State<DefaultAccountState>,
    Path(account_id): Path<AccountId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let account = match get_account(account_id, &connection) {
        Ok(account) => account,
        Err(Error::NotFound) => return Error::UpdateMissingAccount.into_alert_response(),
        Err(error) => {
            tracing::error!("could not get account {account_id}: {error}");
            return error.into_alert_response();
        }
    };

    if account.is_default {
        return Error::DefaultAccountRequired.into_alert_response();
    }

    match set_default_account(account_id, &connection) {
        Ok(()) => (HxRefresh(true), ()).into_response(),
        Err(error) => {
            tracing::error!("Could not set default account {account_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;

    use crate::{
        account::{AccountForm, AccountKind, create_account, get_account},
        db::initialize,
    };

    use super::{DefaultAccountState, set_default_account_endpoint};

    fn make_state_with_two_accounts() -> (DefaultAccountState, i64, i64) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let first = create_account(
            &AccountForm {
                name: "Everyday".to_owned(),
                kind: AccountKind::Current,
                balance: 0.0,
                is_default: None,
            },
            &conn,
        )
        .unwrap();
        let second = create_account(
            &AccountForm {
                name: "Savings".to_owned(),
                kind: AccountKind::Savings,
                balance: 0.0,
                is_default: None,
            },
            &conn,
        )
        .unwrap();

        (
            DefaultAccountState {
                db_connection: Arc::new(Mutex::new(conn)),
            },
            first.id,
            second.id,
        )
    }

    #[tokio::test]
    async fn moves_default_flag_and_refreshes() {
        let (state, first_id, second_id) = make_state_with_two_accounts();

        let response = set_default_account_endpoint(State(state.clone()), Path(second_id)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("hx-refresh"));

        let connection = state.db_connection.lock().unwrap();
        assert!(!get_account(first_id, &connection).unwrap().is_default);
        assert!(get_account(second_id, &connection).unwrap().is_default);
    }

    #[tokio::test]
    async fn unsetting_only_default_is_rejected() {
        let (state, first_id, _) = make_state_with_two_accounts();

        let response = set_default_account_endpoint(State(state.clone()), Path(first_id)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let connection = state.db_connection.lock().unwrap();
        assert!(
            get_account(first_id, &connection).unwrap().is_default,
            "the default flag should be unchanged"
        );
    }

    #[tokio::test]
    async fn missing_account_returns_not_found_alert() {
        let (state, _, _) = make_state_with_two_accounts();

        let response = set_default_account_endpoint(State(state), Path(42)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
