//! Defines the endpoint for creating a new account.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{AppState, Error, endpoints};

use super::core::{AccountForm, create_account};

/// The state needed to create an account.
#[derive(Debug, Clone)]
pub struct CreateAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new account, redirects to the accounts view
/// on success.
pub async fn create_account_endpoint(
    State(state): State<CreateAccountState>,
    Form(form): Form<AccountForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_account(&form, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::ACCOUNTS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not create account {:?}: {error}", form.name);
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode};
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;

    use crate::{
        account::{AccountForm, AccountKind, get_all_accounts},
        db::initialize,
        endpoints,
    };

    use super::{CreateAccountState, create_account_endpoint};

    fn make_state() -> CreateAccountState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        CreateAccountState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn creates_account_and_redirects() {
        let state = make_state();
        let form = AccountForm {
            name: "Everyday".to_owned(),
            kind: AccountKind::Current,
            balance: 123.45,
            is_default: None,
        };

        let response = create_account_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response
            .headers()
            .get(HX_REDIRECT)
            .expect("expected response to have the header hx-redirect");
        assert_eq!(location, endpoints::ACCOUNTS_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let accounts = get_all_accounts(&connection).unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].name, "Everyday");
    }

    #[tokio::test]
    async fn duplicate_name_returns_alert() {
        let state = make_state();
        let form = || AccountForm {
            name: "Everyday".to_owned(),
            kind: AccountKind::Current,
            balance: 0.0,
            is_default: None,
        };

        create_account_endpoint(State(state.clone()), Form(form())).await;
        let response = create_account_endpoint(State(state), Form(form())).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
